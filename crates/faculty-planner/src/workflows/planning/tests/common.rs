use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::workflows::planning::domain::{
    AcademicPeriod, Activity, ActivityDetail, ActivityId, DetailId, Evidence, EvidenceId,
    FunctionalCategory, NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence, NewPlan,
    Notification, NotificationId, PeriodId, Plan, PlanId, UserId,
};
use crate::workflows::planning::identity::{AuthenticatedUser, IdentityResolver, DEAN_ROLE};
use crate::workflows::planning::repository::{
    Notifier, NotifyError, PlanningStore, StoreError,
};
use crate::workflows::planning::router::planning_router;
use crate::workflows::planning::service::PlanningService;

pub(super) const PROFESSOR_TOKEN: &str = "professor-token";
pub(super) const COLLEAGUE_TOKEN: &str = "colleague-token";
pub(super) const DEAN_TOKEN: &str = "dean-token";

pub(super) fn professor() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(1),
        username: "mvega".to_string(),
        email: "mvega@uni.edu".to_string(),
        national_id: "0923456789".to_string(),
        school: "Systems Engineering".to_string(),
        contract_type: "full_time".to_string(),
        roles: BTreeSet::from(["professor".to_string()]),
    }
}

pub(super) fn colleague() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(2),
        username: "jluna".to_string(),
        email: "jluna@uni.edu".to_string(),
        national_id: "0911223344".to_string(),
        school: "Systems Engineering".to_string(),
        contract_type: "part_time".to_string(),
        roles: BTreeSet::from(["professor".to_string()]),
    }
}

pub(super) fn dean() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(3),
        username: "drojas".to_string(),
        email: "drojas@uni.edu".to_string(),
        national_id: "0999887766".to_string(),
        school: "Systems Engineering".to_string(),
        contract_type: "full_time".to_string(),
        roles: BTreeSet::from([DEAN_ROLE.to_string(), "professor".to_string()]),
    }
}

pub(super) fn build_service() -> (
    PlanningService<MemoryStore, MemoryNotifier>,
    Arc<MemoryStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = PlanningService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

pub(super) struct Seeded {
    pub(super) service: PlanningService<MemoryStore, MemoryNotifier>,
    pub(super) store: Arc<MemoryStore>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) period: AcademicPeriod,
    pub(super) teaching: Activity,
    pub(super) research: Activity,
    pub(super) management: Activity,
}

/// Service preloaded with one period and a three-entry catalog.
pub(super) fn seeded_service() -> Seeded {
    let (service, store, notifier) = build_service();

    let period = service
        .create_period(NewAcademicPeriod {
            name: "2025-2026 Term I".to_string(),
            weeks: 16,
        })
        .expect("period seeds");

    let teaching = service
        .create_activity(NewActivity {
            code: "DOC-01".to_string(),
            category: FunctionalCategory::Teaching,
            description: Some("Scheduled lecture hours".to_string()),
            max_period_hours: Some(320),
            max_weekly_hours: Some(20),
            evidence_required: true,
        })
        .expect("teaching activity seeds");

    let research = service
        .create_activity(NewActivity {
            code: "INV-01".to_string(),
            category: FunctionalCategory::Research,
            description: Some("Research project participation".to_string()),
            max_period_hours: None,
            max_weekly_hours: None,
            evidence_required: true,
        })
        .expect("research activity seeds");

    let management = service
        .create_activity(NewActivity {
            code: "GES-01".to_string(),
            category: FunctionalCategory::Management,
            description: None,
            max_period_hours: None,
            max_weekly_hours: None,
            evidence_required: false,
        })
        .expect("management activity seeds");

    Seeded {
        service,
        store,
        notifier,
        period,
        teaching,
        research,
        management,
    }
}

pub(super) fn plan_draft(period: PeriodId) -> NewPlan {
    NewPlan {
        period,
        active: false,
    }
}

pub(super) fn active_plan_draft(period: PeriodId) -> NewPlan {
    NewPlan {
        period,
        active: true,
    }
}

pub(super) fn detail_draft(
    plan: PlanId,
    activity: ActivityId,
    assigned_hours: u32,
    period_hours: u32,
) -> NewActivityDetail {
    NewActivityDetail {
        plan,
        activity,
        assigned_hours,
        period_hours,
        expected_product: Some("Course syllabus".to_string()),
        justification: None,
    }
}

pub(super) fn evidence_draft(detail: Option<DetailId>) -> NewEvidence {
    NewEvidence {
        detail,
        file_name: Some("syllabus.pdf".to_string()),
        url: None,
    }
}

/// Directory fake mapping bearer tokens to seeded identities.
#[derive(Default, Clone)]
pub(super) struct TokenDirectory {
    users: HashMap<String, AuthenticatedUser>,
}

impl TokenDirectory {
    pub(super) fn with_default_users() -> Self {
        let mut users = HashMap::new();
        users.insert(PROFESSOR_TOKEN.to_string(), professor());
        users.insert(COLLEAGUE_TOKEN.to_string(), colleague());
        users.insert(DEAN_TOKEN.to_string(), dean());
        Self { users }
    }
}

impl IdentityResolver for TokenDirectory {
    fn resolve(&self, token: &str) -> Option<AuthenticatedUser> {
        self.users.get(token).cloned()
    }
}

pub(super) fn router_with_service(
    service: PlanningService<MemoryStore, MemoryNotifier>,
) -> axum::Router {
    let resolver: Arc<dyn IdentityResolver> = Arc::new(TokenDirectory::with_default_users());
    planning_router(Arc::new(service), resolver)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Vec-backed store fake; linear scans are plenty at test scale.
#[derive(Default)]
pub(super) struct MemoryStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    periods: Vec<AcademicPeriod>,
    activities: Vec<Activity>,
    plans: Vec<Plan>,
    details: Vec<ActivityDetail>,
    evidence: Vec<Evidence>,
    notifications: Vec<Notification>,
    next_id: u64,
}

impl StoreInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

impl PlanningStore for MemoryStore {
    fn insert_period(&self, draft: NewAcademicPeriod) -> Result<AcademicPeriod, StoreError> {
        let mut inner = self.lock();
        if inner.periods.iter().any(|period| period.name == draft.name) {
            return Err(StoreError::Conflict);
        }
        let period = AcademicPeriod {
            id: PeriodId(inner.next_id()),
            name: draft.name,
            weeks: draft.weeks,
        };
        inner.periods.push(period.clone());
        Ok(period)
    }

    fn fetch_period(&self, id: PeriodId) -> Result<Option<AcademicPeriod>, StoreError> {
        Ok(self
            .lock()
            .periods
            .iter()
            .find(|period| period.id == id)
            .cloned())
    }

    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError> {
        Ok(self.lock().periods.clone())
    }

    fn insert_activity(&self, draft: NewActivity) -> Result<Activity, StoreError> {
        let mut inner = self.lock();
        if inner.activities.iter().any(|entry| entry.code == draft.code) {
            return Err(StoreError::Conflict);
        }
        let activity = Activity {
            id: ActivityId(inner.next_id()),
            code: draft.code,
            category: draft.category,
            description: draft.description,
            max_period_hours: draft.max_period_hours,
            max_weekly_hours: draft.max_weekly_hours,
            evidence_required: draft.evidence_required,
        };
        inner.activities.push(activity.clone());
        Ok(activity)
    }

    fn fetch_activity(&self, id: ActivityId) -> Result<Option<Activity>, StoreError> {
        Ok(self
            .lock()
            .activities
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    fn activities(&self) -> Result<Vec<Activity>, StoreError> {
        Ok(self.lock().activities.clone())
    }

    fn remove_activity(&self, id: ActivityId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.activities.len();
        inner.activities.retain(|entry| entry.id != id);
        if inner.activities.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn insert_plan(&self, owner: UserId, draft: NewPlan) -> Result<Plan, StoreError> {
        let mut inner = self.lock();
        if inner
            .plans
            .iter()
            .any(|plan| plan.owner == owner && plan.period == draft.period)
        {
            return Err(StoreError::Conflict);
        }
        let plan = Plan {
            id: PlanId(inner.next_id()),
            owner,
            period: draft.period,
            active: draft.active,
            dean_comment: None,
        };
        inner.plans.push(plan.clone());
        Ok(plan)
    }

    fn fetch_plan(&self, id: PlanId) -> Result<Option<Plan>, StoreError> {
        Ok(self.lock().plans.iter().find(|plan| plan.id == id).cloned())
    }

    fn update_plan(&self, plan: Plan) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner.plans.iter_mut().find(|entry| entry.id == plan.id) {
            Some(slot) => {
                *slot = plan;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove_plan(&self, id: PlanId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.plans.len();
        inner.plans.retain(|plan| plan.id != id);
        if inner.plans.len() == before {
            return Err(StoreError::NotFound);
        }

        let removed: Vec<DetailId> = inner
            .details
            .iter()
            .filter(|detail| detail.plan == id)
            .map(|detail| detail.id)
            .collect();
        inner.details.retain(|detail| detail.plan != id);
        for evidence in inner.evidence.iter_mut() {
            if evidence
                .detail
                .map(|detail| removed.contains(&detail))
                .unwrap_or(false)
            {
                evidence.detail = None;
            }
        }
        Ok(())
    }

    fn plans(&self) -> Result<Vec<Plan>, StoreError> {
        Ok(self.lock().plans.clone())
    }

    fn plans_for(&self, owner: UserId) -> Result<Vec<Plan>, StoreError> {
        Ok(self
            .lock()
            .plans
            .iter()
            .filter(|plan| plan.owner == owner)
            .cloned()
            .collect())
    }

    fn insert_detail(&self, draft: NewActivityDetail) -> Result<ActivityDetail, StoreError> {
        let mut inner = self.lock();
        let detail = ActivityDetail {
            id: DetailId(inner.next_id()),
            plan: draft.plan,
            activity: draft.activity,
            assigned_hours: draft.assigned_hours,
            period_hours: draft.period_hours,
            expected_product: draft.expected_product,
            justification: draft.justification,
        };
        inner.details.push(detail.clone());
        Ok(detail)
    }

    fn fetch_detail(&self, id: DetailId) -> Result<Option<ActivityDetail>, StoreError> {
        Ok(self
            .lock()
            .details
            .iter()
            .find(|detail| detail.id == id)
            .cloned())
    }

    fn remove_detail(&self, id: DetailId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.details.len();
        inner.details.retain(|detail| detail.id != id);
        if inner.details.len() == before {
            return Err(StoreError::NotFound);
        }
        for evidence in inner.evidence.iter_mut() {
            if evidence.detail == Some(id) {
                evidence.detail = None;
            }
        }
        Ok(())
    }

    fn details(&self) -> Result<Vec<ActivityDetail>, StoreError> {
        Ok(self.lock().details.clone())
    }

    fn details_for_plan(&self, plan: PlanId) -> Result<Vec<ActivityDetail>, StoreError> {
        Ok(self
            .lock()
            .details
            .iter()
            .filter(|detail| detail.plan == plan)
            .cloned()
            .collect())
    }

    fn details_for_activity(
        &self,
        activity: ActivityId,
    ) -> Result<Vec<ActivityDetail>, StoreError> {
        Ok(self
            .lock()
            .details
            .iter()
            .filter(|detail| detail.activity == activity)
            .cloned()
            .collect())
    }

    fn insert_evidence(
        &self,
        owner: UserId,
        draft: NewEvidence,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Evidence, StoreError> {
        let mut inner = self.lock();
        let evidence = Evidence {
            id: EvidenceId(inner.next_id()),
            owner,
            detail: draft.detail,
            file_name: draft.file_name,
            url: draft.url,
            uploaded_at,
        };
        inner.evidence.push(evidence.clone());
        Ok(evidence)
    }

    fn fetch_evidence(&self, id: EvidenceId) -> Result<Option<Evidence>, StoreError> {
        Ok(self
            .lock()
            .evidence
            .iter()
            .find(|evidence| evidence.id == id)
            .cloned())
    }

    fn remove_evidence(&self, id: EvidenceId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.evidence.len();
        inner.evidence.retain(|evidence| evidence.id != id);
        if inner.evidence.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn evidence(&self) -> Result<Vec<Evidence>, StoreError> {
        Ok(self.lock().evidence.clone())
    }

    fn evidence_for(&self, owner: UserId) -> Result<Vec<Evidence>, StoreError> {
        Ok(self
            .lock()
            .evidence
            .iter()
            .filter(|evidence| evidence.owner == owner)
            .cloned()
            .collect())
    }

    fn insert_notification(
        &self,
        recipient: UserId,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Result<Notification, StoreError> {
        let mut inner = self.lock();
        let notification = Notification {
            id: NotificationId(inner.next_id()),
            recipient,
            message,
            created_at,
            read: false,
        };
        inner.notifications.push(notification.clone());
        Ok(notification)
    }

    fn fetch_notification(&self, id: NotificationId) -> Result<Option<Notification>, StoreError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .find(|notification| notification.id == id)
            .cloned())
    }

    fn update_notification(&self, notification: Notification) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner
            .notifications
            .iter_mut()
            .find(|entry| entry.id == notification.id)
        {
            Some(slot) => {
                *slot = notification;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self.lock().notifications.clone())
    }

    fn notifications_for(&self, recipient: UserId) -> Result<Vec<Notification>, StoreError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect())
    }
}

/// Notifier fake recording every delivery.
#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<(UserId, String)>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<(UserId, String)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, recipient: UserId, message: &str) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((recipient, message.to_string()));
        Ok(())
    }
}

/// Notifier fake whose channel is always down.
pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _recipient: UserId, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable("smtp relay offline".to_string()))
    }
}

/// Store fake whose backend is always down.
pub(super) struct UnavailableStore;

fn down() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

impl PlanningStore for UnavailableStore {
    fn insert_period(&self, _draft: NewAcademicPeriod) -> Result<AcademicPeriod, StoreError> {
        Err(down())
    }

    fn fetch_period(&self, _id: PeriodId) -> Result<Option<AcademicPeriod>, StoreError> {
        Err(down())
    }

    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError> {
        Err(down())
    }

    fn insert_activity(&self, _draft: NewActivity) -> Result<Activity, StoreError> {
        Err(down())
    }

    fn fetch_activity(&self, _id: ActivityId) -> Result<Option<Activity>, StoreError> {
        Err(down())
    }

    fn activities(&self) -> Result<Vec<Activity>, StoreError> {
        Err(down())
    }

    fn remove_activity(&self, _id: ActivityId) -> Result<(), StoreError> {
        Err(down())
    }

    fn insert_plan(&self, _owner: UserId, _draft: NewPlan) -> Result<Plan, StoreError> {
        Err(down())
    }

    fn fetch_plan(&self, _id: PlanId) -> Result<Option<Plan>, StoreError> {
        Err(down())
    }

    fn update_plan(&self, _plan: Plan) -> Result<(), StoreError> {
        Err(down())
    }

    fn remove_plan(&self, _id: PlanId) -> Result<(), StoreError> {
        Err(down())
    }

    fn plans(&self) -> Result<Vec<Plan>, StoreError> {
        Err(down())
    }

    fn plans_for(&self, _owner: UserId) -> Result<Vec<Plan>, StoreError> {
        Err(down())
    }

    fn insert_detail(&self, _draft: NewActivityDetail) -> Result<ActivityDetail, StoreError> {
        Err(down())
    }

    fn fetch_detail(&self, _id: DetailId) -> Result<Option<ActivityDetail>, StoreError> {
        Err(down())
    }

    fn remove_detail(&self, _id: DetailId) -> Result<(), StoreError> {
        Err(down())
    }

    fn details(&self) -> Result<Vec<ActivityDetail>, StoreError> {
        Err(down())
    }

    fn details_for_plan(&self, _plan: PlanId) -> Result<Vec<ActivityDetail>, StoreError> {
        Err(down())
    }

    fn details_for_activity(
        &self,
        _activity: ActivityId,
    ) -> Result<Vec<ActivityDetail>, StoreError> {
        Err(down())
    }

    fn insert_evidence(
        &self,
        _owner: UserId,
        _draft: NewEvidence,
        _uploaded_at: DateTime<Utc>,
    ) -> Result<Evidence, StoreError> {
        Err(down())
    }

    fn fetch_evidence(&self, _id: EvidenceId) -> Result<Option<Evidence>, StoreError> {
        Err(down())
    }

    fn remove_evidence(&self, _id: EvidenceId) -> Result<(), StoreError> {
        Err(down())
    }

    fn evidence(&self) -> Result<Vec<Evidence>, StoreError> {
        Err(down())
    }

    fn evidence_for(&self, _owner: UserId) -> Result<Vec<Evidence>, StoreError> {
        Err(down())
    }

    fn insert_notification(
        &self,
        _recipient: UserId,
        _message: String,
        _created_at: DateTime<Utc>,
    ) -> Result<Notification, StoreError> {
        Err(down())
    }

    fn fetch_notification(&self, _id: NotificationId) -> Result<Option<Notification>, StoreError> {
        Err(down())
    }

    fn update_notification(&self, _notification: Notification) -> Result<(), StoreError> {
        Err(down())
    }

    fn notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Err(down())
    }

    fn notifications_for(&self, _recipient: UserId) -> Result<Vec<Notification>, StoreError> {
        Err(down())
    }
}
