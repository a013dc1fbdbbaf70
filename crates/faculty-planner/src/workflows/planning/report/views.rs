use serde::Serialize;

/// Message body returned when the caller has no plans on file.
pub const NO_PLANS_MESSAGE: &str = "no plans registered";

/// Fixed-shape workload summary. The wire keys are the institutional Spanish
/// names the downstream reporting templates expect; they are part of the
/// contract and never change with the field names here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    #[serde(rename = "docencia")]
    pub teaching_hours: u32,
    #[serde(rename = "investigacion")]
    pub research_hours: u32,
    #[serde(rename = "vinculacion")]
    pub outreach_hours: u32,
    #[serde(rename = "gestion")]
    pub management_hours: u32,
    pub total: u32,
    #[serde(rename = "docente")]
    pub faculty_name: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(rename = "escuela")]
    pub school: String,
    #[serde(rename = "periodo")]
    pub period_name: String,
    #[serde(rename = "numero_semanas")]
    pub period_weeks: u32,
    #[serde(rename = "observaciones")]
    pub remarks: String,
}

/// Informational body for users without plans; deliberately not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyNotice {
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl EmptyNotice {
    pub fn no_plans() -> Self {
        Self {
            message: NO_PLANS_MESSAGE.to_string(),
        }
    }
}

/// Either a full summary or the empty notice; serializes as whichever body applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SummaryOutcome {
    Summary(WorkloadSummary),
    Empty(EmptyNotice),
}

impl SummaryOutcome {
    pub fn as_summary(&self) -> Option<&WorkloadSummary> {
        match self {
            SummaryOutcome::Summary(summary) => Some(summary),
            SummaryOutcome::Empty(_) => None,
        }
    }
}
