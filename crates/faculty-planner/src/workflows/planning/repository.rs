use chrono::{DateTime, Utc};

use super::domain::{
    AcademicPeriod, Activity, ActivityDetail, ActivityId, DetailId, Evidence, EvidenceId,
    NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence, NewPlan, Notification,
    NotificationId, PeriodId, Plan, PlanId, UserId,
};

/// Record-level storage abstraction so the service module can be exercised in
/// isolation. Identifiers are assigned by the store; listings come back in id
/// order.
///
/// Uniqueness the store enforces (the relational unique-index analogs):
/// period names, activity codes, and one plan per `(owner, period)` pair.
pub trait PlanningStore: Send + Sync {
    fn insert_period(&self, draft: NewAcademicPeriod) -> Result<AcademicPeriod, StoreError>;
    fn fetch_period(&self, id: PeriodId) -> Result<Option<AcademicPeriod>, StoreError>;
    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError>;

    fn insert_activity(&self, draft: NewActivity) -> Result<Activity, StoreError>;
    fn fetch_activity(&self, id: ActivityId) -> Result<Option<Activity>, StoreError>;
    fn activities(&self) -> Result<Vec<Activity>, StoreError>;
    fn remove_activity(&self, id: ActivityId) -> Result<(), StoreError>;

    fn insert_plan(&self, owner: UserId, draft: NewPlan) -> Result<Plan, StoreError>;
    fn fetch_plan(&self, id: PlanId) -> Result<Option<Plan>, StoreError>;
    fn update_plan(&self, plan: Plan) -> Result<(), StoreError>;
    /// Removes the plan together with its detail lines; evidence pointing at
    /// those lines is kept but unlinked.
    fn remove_plan(&self, id: PlanId) -> Result<(), StoreError>;
    fn plans(&self) -> Result<Vec<Plan>, StoreError>;
    fn plans_for(&self, owner: UserId) -> Result<Vec<Plan>, StoreError>;

    fn insert_detail(&self, draft: NewActivityDetail) -> Result<ActivityDetail, StoreError>;
    fn fetch_detail(&self, id: DetailId) -> Result<Option<ActivityDetail>, StoreError>;
    /// Removes the detail line; evidence pointing at it is kept but unlinked.
    fn remove_detail(&self, id: DetailId) -> Result<(), StoreError>;
    fn details(&self) -> Result<Vec<ActivityDetail>, StoreError>;
    fn details_for_plan(&self, plan: PlanId) -> Result<Vec<ActivityDetail>, StoreError>;
    fn details_for_activity(&self, activity: ActivityId)
        -> Result<Vec<ActivityDetail>, StoreError>;

    fn insert_evidence(
        &self,
        owner: UserId,
        draft: NewEvidence,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Evidence, StoreError>;
    fn fetch_evidence(&self, id: EvidenceId) -> Result<Option<Evidence>, StoreError>;
    fn remove_evidence(&self, id: EvidenceId) -> Result<(), StoreError>;
    fn evidence(&self) -> Result<Vec<Evidence>, StoreError>;
    fn evidence_for(&self, owner: UserId) -> Result<Vec<Evidence>, StoreError>;

    fn insert_notification(
        &self,
        recipient: UserId,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Result<Notification, StoreError>;
    fn fetch_notification(&self, id: NotificationId) -> Result<Option<Notification>, StoreError>;
    fn update_notification(&self, notification: Notification) -> Result<(), StoreError>;
    fn notifications(&self) -> Result<Vec<Notification>, StoreError>;
    fn notifications_for(&self, recipient: UserId) -> Result<Vec<Notification>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the outbound notification hook the dean-annotation flow
/// posts through (in-app inbox today, e-mail adapters later).
pub trait Notifier: Send + Sync {
    fn notify(&self, recipient: UserId, message: &str) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}
