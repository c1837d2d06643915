use bytes::Bytes;
use std::fmt::Debug;

use super::request::AuditReportRequest;
use crate::domain::RagError;

const AUDIT_REPORT_TITLE: &str = "Mining Safety Audit Report";

/// Renderer-independent report content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    /// Label/value lines printed under the title
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    /// Audit report for the given filters
    pub fn audit(request: &AuditReportRequest, body: impl Into<String>) -> Self {
        Self::new(AUDIT_REPORT_TITLE, body)
            .with_field("State", &request.state)
            .with_field("Year", &request.year)
            .with_field("Hazard Type", &request.hazard_type)
    }
}

/// Renders a report into a downloadable document
pub trait ReportComposer: Send + Sync + Debug {
    fn compose(&self, document: &ReportDocument) -> Result<Bytes, RagError>;

    /// MIME type of the produced bytes
    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;
}
