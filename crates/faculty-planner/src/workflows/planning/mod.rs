//! Faculty workload planning: plans scoped to their owners, activity details
//! drawing hours from a shared catalog, supporting evidence, dean annotations,
//! and the per-user workload summary report.

pub mod domain;
pub mod identity;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicPeriod, Activity, ActivityDetail, ActivityId, DetailId, Evidence, EvidenceId,
    FunctionalCategory, NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence, NewPlan,
    Notification, NotificationId, PeriodId, Plan, PlanAnnotation, PlanId, PlanUpdate, UserId,
};
pub use identity::{AuthenticatedUser, IdentityResolver, ProfileView, Visibility, DEAN_ROLE};
pub use report::views::{EmptyNotice, SummaryOutcome, WorkloadSummary};
pub use repository::{Notifier, NotifyError, PlanningStore, StoreError};
pub use router::{planning_router, Identity, IdentityRejection};
pub use service::{PlanningError, PlanningService};
