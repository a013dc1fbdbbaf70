use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for directory-managed users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identifier wrapper for academic periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodId(pub u64);

/// Identifier wrapper for workload plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(pub u64);

/// Identifier wrapper for catalog activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(pub u64);

/// Identifier wrapper for plan details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetailId(pub u64);

/// Identifier wrapper for uploaded evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvidenceId(pub u64);

/// Identifier wrapper for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

/// The four substantive functions faculty hours are reported against.
///
/// The wire tokens are the institutional Spanish names so exports line up with
/// the reporting templates the schools already use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum FunctionalCategory {
    #[serde(rename = "docencia")]
    Teaching,
    #[serde(rename = "investigacion")]
    Research,
    #[serde(rename = "vinculacion")]
    Outreach,
    #[serde(rename = "gestion")]
    Management,
}

impl FunctionalCategory {
    pub const fn label(self) -> &'static str {
        match self {
            FunctionalCategory::Teaching => "docencia",
            FunctionalCategory::Research => "investigacion",
            FunctionalCategory::Outreach => "vinculacion",
            FunctionalCategory::Management => "gestion",
        }
    }

    pub const fn ordered() -> [FunctionalCategory; 4] {
        [
            FunctionalCategory::Teaching,
            FunctionalCategory::Research,
            FunctionalCategory::Outreach,
            FunctionalCategory::Management,
        ]
    }
}

/// An academic period (e.g. "2025-2026 Term I") plans are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub id: PeriodId,
    pub name: String,
    pub weeks: u32,
}

/// Draft payload for registering an academic period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAcademicPeriod {
    pub name: String,
    pub weeks: u32,
}

/// A faculty member's workload plan for one period.
///
/// `active` marks the plan the summary report speaks for; at most one plan per
/// owner carries the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub owner: UserId,
    pub period: PeriodId,
    pub active: bool,
    pub dean_comment: Option<String>,
}

/// Draft payload for opening a plan; the owner comes from the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlan {
    pub period: PeriodId,
    #[serde(default)]
    pub active: bool,
}

/// Mutable plan fields exposed through the update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub active: bool,
}

/// Dean feedback attached to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAnnotation {
    pub comment: String,
}

/// Catalog entry describing an activity faculty can plan hours against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub code: String,
    pub category: FunctionalCategory,
    pub description: Option<String>,
    pub max_period_hours: Option<u32>,
    pub max_weekly_hours: Option<u32>,
    pub evidence_required: bool,
}

/// Draft payload for a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub code: String,
    pub category: FunctionalCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_period_hours: Option<u32>,
    #[serde(default)]
    pub max_weekly_hours: Option<u32>,
    #[serde(default)]
    pub evidence_required: bool,
}

/// One line of a plan: hours assigned to a catalog activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetail {
    pub id: DetailId,
    pub plan: PlanId,
    pub activity: ActivityId,
    pub assigned_hours: u32,
    pub period_hours: u32,
    pub expected_product: Option<String>,
    pub justification: Option<String>,
}

/// Draft payload for a plan detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivityDetail {
    pub plan: PlanId,
    pub activity: ActivityId,
    pub assigned_hours: u32,
    pub period_hours: u32,
    #[serde(default)]
    pub expected_product: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
}

/// Supporting evidence a faculty member uploaded, optionally tied to a detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub owner: UserId,
    pub detail: Option<DetailId>,
    pub file_name: Option<String>,
    pub url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Draft payload for registering evidence; the owner comes from the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvidence {
    #[serde(default)]
    pub detail: Option<DetailId>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Message delivered to a user's in-application inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
