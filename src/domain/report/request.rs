use serde::{Deserialize, Serialize};

const ALL_STATES: &str = "All States";
const ALL_YEARS: &str = "All Years";
const ALL_HAZARDS: &str = "All Hazards";

/// Filters for a mining safety audit report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReportRequest {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_year")]
    pub year: String,
    #[serde(default = "default_hazard_type")]
    pub hazard_type: String,
}

fn default_state() -> String {
    ALL_STATES.to_string()
}

fn default_year() -> String {
    ALL_YEARS.to_string()
}

fn default_hazard_type() -> String {
    ALL_HAZARDS.to_string()
}

impl Default for AuditReportRequest {
    fn default() -> Self {
        Self {
            state: default_state(),
            year: default_year(),
            hazard_type: default_hazard_type(),
        }
    }
}

impl AuditReportRequest {
    pub fn new(
        state: impl Into<String>,
        year: impl Into<String>,
        hazard_type: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            year: year.into(),
            hazard_type: hazard_type.into(),
        }
    }

    /// Prompt resolved through the cache; identical filters share one report
    pub fn prompt(&self) -> String {
        format!(
            "You are a mining safety audit assistant. Using the DGMS mining accident data, \
             generate a detailed safety audit report for:\n\n\
             State: {}\nYear: {}\nHazard Type: {}\n\n\
             Provide insights on:\n\
             - Total number of reported incidents\n\
             - Distribution of accidents by category (gas leak, collapse, fire, machinery, etc.)\n\
             - Severity levels (High / Medium / Low)\n\
             - Common root causes\n\
             - Recommendations to improve safety\n\
             - Year-over-year or state-wise trend if applicable\n\n\
             Return the report as plain text (not JSON).",
            self.state, self.year, self.hazard_type
        )
    }

    /// Download file name for the rendered report
    pub fn file_name(&self, extension: &str) -> String {
        format!("Audit_Report_{}_{}.{}", self.state, self.year, extension)
    }
}
