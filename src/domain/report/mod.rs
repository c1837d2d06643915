//! Report domain - audit report parameters and document rendering

mod composer;
mod request;

pub use composer::{ReportComposer, ReportDocument};
pub use request::AuditReportRequest;

#[cfg(test)]
pub use composer::mock::MockReportComposer;
