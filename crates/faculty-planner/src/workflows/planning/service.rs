use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    AcademicPeriod, Activity, ActivityDetail, ActivityId, DetailId, Evidence, EvidenceId,
    NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence, NewPlan, Notification,
    NotificationId, Plan, PlanAnnotation, PlanId, PlanUpdate, UserId,
};
use super::identity::{AuthenticatedUser, Visibility};
use super::report;
use super::report::views::{EmptyNotice, SummaryOutcome};
use super::repository::{Notifier, NotifyError, PlanningStore, StoreError};

/// Service composing the planning store and the notification hook. Every
/// operation takes the already-resolved caller so scope checks never reach
/// back into the directory.
pub struct PlanningService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> PlanningService<S, N>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn create_period(&self, draft: NewAcademicPeriod) -> Result<AcademicPeriod, PlanningError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(PlanningError::invalid("name", "period name is required"));
        }
        if draft.weeks == 0 {
            return Err(PlanningError::invalid(
                "weeks",
                "period length must be at least one week",
            ));
        }

        Ok(self.store.insert_period(NewAcademicPeriod {
            name,
            weeks: draft.weeks,
        })?)
    }

    pub fn periods(&self) -> Result<Vec<AcademicPeriod>, PlanningError> {
        Ok(self.store.periods()?)
    }

    pub fn create_activity(&self, draft: NewActivity) -> Result<Activity, PlanningError> {
        let code = draft.code.trim().to_string();
        if code.is_empty() {
            return Err(PlanningError::invalid("code", "catalog code is required"));
        }

        Ok(self.store.insert_activity(NewActivity { code, ..draft })?)
    }

    pub fn activities(&self) -> Result<Vec<Activity>, PlanningError> {
        Ok(self.store.activities()?)
    }

    /// Insert catalog drafts in bulk, leaving codes that already exist untouched.
    pub fn import_catalog(&self, drafts: Vec<NewActivity>) -> Result<Vec<Activity>, PlanningError> {
        let mut inserted = Vec::new();
        for draft in drafts {
            match self.create_activity(draft) {
                Ok(activity) => inserted.push(activity),
                Err(PlanningError::Store(StoreError::Conflict)) => continue,
                Err(other) => return Err(other),
            }
        }
        Ok(inserted)
    }

    /// Remove a catalog entry, refusing while any plan detail still draws on it.
    pub fn remove_activity(&self, id: ActivityId) -> Result<(), PlanningError> {
        if self.store.fetch_activity(id)?.is_none() {
            return Err(PlanningError::NotFound);
        }
        if !self.store.details_for_activity(id)?.is_empty() {
            return Err(PlanningError::CatalogEntryInUse);
        }

        Ok(self.store.remove_activity(id)?)
    }

    pub fn scoped_plans(&self, user: &AuthenticatedUser) -> Result<Vec<Plan>, PlanningError> {
        match Visibility::for_user(user) {
            Visibility::Everything => Ok(self.store.plans()?),
            Visibility::OwnedBy(owner) => Ok(self.store.plans_for(owner)?),
        }
    }

    /// Open a plan for the caller. An `active` draft steals the flag from the
    /// owner's other plans.
    pub fn create_plan(
        &self,
        user: &AuthenticatedUser,
        draft: NewPlan,
    ) -> Result<Plan, PlanningError> {
        if self.store.fetch_period(draft.period)?.is_none() {
            return Err(PlanningError::invalid("period", "unknown academic period"));
        }

        let plan = self.store.insert_plan(user.id, draft)?;
        if plan.active {
            self.deactivate_siblings(plan.owner, plan.id)?;
        }
        Ok(plan)
    }

    pub fn plan(&self, user: &AuthenticatedUser, id: PlanId) -> Result<Plan, PlanningError> {
        let plan = self.store.fetch_plan(id)?.ok_or(PlanningError::NotFound)?;
        if !Visibility::for_user(user).allows(plan.owner) {
            return Err(PlanningError::NotFound);
        }
        Ok(plan)
    }

    pub fn update_plan(
        &self,
        user: &AuthenticatedUser,
        id: PlanId,
        update: PlanUpdate,
    ) -> Result<Plan, PlanningError> {
        let mut plan = self.plan(user, id)?;
        plan.active = update.active;
        self.store.update_plan(plan.clone())?;
        if plan.active {
            self.deactivate_siblings(plan.owner, plan.id)?;
        }
        Ok(plan)
    }

    pub fn remove_plan(&self, user: &AuthenticatedUser, id: PlanId) -> Result<(), PlanningError> {
        let plan = self.plan(user, id)?;
        Ok(self.store.remove_plan(plan.id)?)
    }

    /// Attach dean feedback to any plan and notify its owner. Dean only.
    pub fn annotate_plan(
        &self,
        user: &AuthenticatedUser,
        id: PlanId,
        annotation: PlanAnnotation,
    ) -> Result<Plan, PlanningError> {
        if !user.is_dean() {
            return Err(PlanningError::DeanOnly);
        }

        let comment = annotation.comment.trim().to_string();
        if comment.is_empty() {
            return Err(PlanningError::invalid(
                "comment",
                "annotation text is required",
            ));
        }

        let mut plan = self.store.fetch_plan(id)?.ok_or(PlanningError::NotFound)?;
        plan.dean_comment = Some(comment.clone());
        self.store.update_plan(plan.clone())?;

        self.notifier.notify(
            plan.owner,
            &format!("A dean commented on your workload plan: {comment}"),
        )?;

        Ok(plan)
    }

    pub fn scoped_details(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<ActivityDetail>, PlanningError> {
        match Visibility::for_user(user) {
            Visibility::Everything => Ok(self.store.details()?),
            Visibility::OwnedBy(owner) => {
                let mut details = Vec::new();
                for plan in self.store.plans_for(owner)? {
                    details.extend(self.store.details_for_plan(plan.id)?);
                }
                Ok(details)
            }
        }
    }

    /// Add a detail line to a plan in the caller's scope, holding the hours
    /// inside the catalog caps when the activity declares them.
    pub fn create_detail(
        &self,
        user: &AuthenticatedUser,
        draft: NewActivityDetail,
    ) -> Result<ActivityDetail, PlanningError> {
        let in_scope = self
            .store
            .fetch_plan(draft.plan)?
            .map(|plan| Visibility::for_user(user).allows(plan.owner))
            .unwrap_or(false);
        if !in_scope {
            return Err(PlanningError::invalid("plan", "unknown plan"));
        }

        let activity = self
            .store
            .fetch_activity(draft.activity)?
            .ok_or_else(|| PlanningError::invalid("activity", "unknown catalog activity"))?;

        if let Some(cap) = activity.max_weekly_hours {
            if draft.assigned_hours > cap {
                return Err(PlanningError::invalid(
                    "assigned_hours",
                    format!("exceeds the catalog weekly cap of {cap} hours"),
                ));
            }
        }
        if let Some(cap) = activity.max_period_hours {
            if draft.period_hours > cap {
                return Err(PlanningError::invalid(
                    "period_hours",
                    format!("exceeds the catalog period cap of {cap} hours"),
                ));
            }
        }

        Ok(self.store.insert_detail(draft)?)
    }

    pub fn detail(
        &self,
        user: &AuthenticatedUser,
        id: DetailId,
    ) -> Result<ActivityDetail, PlanningError> {
        let detail = self.store.fetch_detail(id)?.ok_or(PlanningError::NotFound)?;
        let owner = self.detail_owner(&detail)?;
        if !Visibility::for_user(user).allows(owner) {
            return Err(PlanningError::NotFound);
        }
        Ok(detail)
    }

    pub fn remove_detail(
        &self,
        user: &AuthenticatedUser,
        id: DetailId,
    ) -> Result<(), PlanningError> {
        let detail = self.detail(user, id)?;
        Ok(self.store.remove_detail(detail.id)?)
    }

    pub fn scoped_evidence(&self, user: &AuthenticatedUser) -> Result<Vec<Evidence>, PlanningError> {
        match Visibility::for_user(user) {
            Visibility::Everything => Ok(self.store.evidence()?),
            Visibility::OwnedBy(owner) => Ok(self.store.evidence_for(owner)?),
        }
    }

    /// Register evidence for the caller. At least a file name or a URL must
    /// survive trimming; a detail link must point inside the caller's scope.
    pub fn create_evidence(
        &self,
        user: &AuthenticatedUser,
        draft: NewEvidence,
    ) -> Result<Evidence, PlanningError> {
        let file_name = trimmed_to_none(draft.file_name);
        let url = trimmed_to_none(draft.url);
        if file_name.is_none() && url.is_none() {
            return Err(PlanningError::invalid(
                "file_name",
                "a file name or url is required",
            ));
        }

        if let Some(detail_id) = draft.detail {
            match self.detail(user, detail_id) {
                Ok(_) => {}
                Err(PlanningError::NotFound) => {
                    return Err(PlanningError::invalid("detail", "unknown plan detail"));
                }
                Err(other) => return Err(other),
            }
        }

        let draft = NewEvidence {
            detail: draft.detail,
            file_name,
            url,
        };
        Ok(self.store.insert_evidence(user.id, draft, Utc::now())?)
    }

    pub fn evidence(
        &self,
        user: &AuthenticatedUser,
        id: EvidenceId,
    ) -> Result<Evidence, PlanningError> {
        let evidence = self
            .store
            .fetch_evidence(id)?
            .ok_or(PlanningError::NotFound)?;
        if !Visibility::for_user(user).allows(evidence.owner) {
            return Err(PlanningError::NotFound);
        }
        Ok(evidence)
    }

    pub fn remove_evidence(
        &self,
        user: &AuthenticatedUser,
        id: EvidenceId,
    ) -> Result<(), PlanningError> {
        let evidence = self.evidence(user, id)?;
        Ok(self.store.remove_evidence(evidence.id)?)
    }

    pub fn scoped_notifications(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<Notification>, PlanningError> {
        match Visibility::for_user(user) {
            Visibility::Everything => Ok(self.store.notifications()?),
            Visibility::OwnedBy(recipient) => Ok(self.store.notifications_for(recipient)?),
        }
    }

    pub fn mark_notification_read(
        &self,
        user: &AuthenticatedUser,
        id: NotificationId,
    ) -> Result<Notification, PlanningError> {
        let mut notification = self
            .store
            .fetch_notification(id)?
            .ok_or(PlanningError::NotFound)?;
        if !Visibility::for_user(user).allows(notification.recipient) {
            return Err(PlanningError::NotFound);
        }

        notification.read = true;
        self.store.update_notification(notification.clone())?;
        Ok(notification)
    }

    /// Build the caller's workload summary: pick the current plan, gather the
    /// detail lines filed for its period, and fold hours by category.
    pub fn workload_summary(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<SummaryOutcome, PlanningError> {
        let plans = self.store.plans_for(user.id)?;
        let Some(current) = report::select_current_plan(&plans) else {
            return Ok(SummaryOutcome::Empty(EmptyNotice::no_plans()));
        };

        let period = self.store.fetch_period(current.period)?.ok_or_else(|| {
            StoreError::Unavailable("plan references a missing period".to_string())
        })?;

        let mut rows = Vec::new();
        for plan in plans.iter().filter(|plan| plan.period == current.period) {
            for detail in self.store.details_for_plan(plan.id)? {
                let activity = self.store.fetch_activity(detail.activity)?.ok_or_else(|| {
                    StoreError::Unavailable(
                        "detail references a missing catalog activity".to_string(),
                    )
                })?;
                rows.push((activity.category, detail.assigned_hours));
            }
        }

        let totals = report::sum_hours_by_category(rows);
        Ok(SummaryOutcome::Summary(report::build_summary(
            user, &period, current, &totals,
        )))
    }

    /// Ownership of a detail line is reached through its plan: detail -> plan -> owner.
    fn detail_owner(&self, detail: &ActivityDetail) -> Result<UserId, PlanningError> {
        let plan = self.store.fetch_plan(detail.plan)?.ok_or_else(|| {
            StoreError::Unavailable("detail references a missing plan".to_string())
        })?;
        Ok(plan.owner)
    }

    fn deactivate_siblings(&self, owner: UserId, keep: PlanId) -> Result<(), PlanningError> {
        for mut plan in self.store.plans_for(owner)? {
            if plan.id != keep && plan.active {
                plan.active = false;
                self.store.update_plan(plan)?;
            }
        }
        Ok(())
    }
}

/// Error raised by the planning service.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("record not found")]
    NotFound,
    #[error("operation restricted to the dean role")]
    DeanOnly,
    #[error("catalog entry is referenced by existing plan details")]
    CatalogEntryInUse,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl PlanningError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        PlanningError::Validation {
            field,
            message: message.into(),
        }
    }
}

fn trimmed_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
