use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::AuditReportRequest;

/// POST /audit_report_pdf
pub async fn audit_report(
    State(state): State<AppState>,
    Json(request): Json<AuditReportRequest>,
) -> Result<Response, ApiError> {
    info!(
        state = %request.state,
        year = %request.year,
        hazard_type = %request.hazard_type,
        "Building audit report"
    );

    let report = state.safety.build_audit_report(&request).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&report.file_name)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::internal(format!("Invalid file name header: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(report.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}

/// Replaces characters that cannot appear inside a quoted header parameter
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
