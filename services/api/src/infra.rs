use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use faculty_planner::workflows::catalog::standard_catalog;
use faculty_planner::workflows::planning::{
    AcademicPeriod, Activity, ActivityDetail, ActivityId, AuthenticatedUser, DetailId, Evidence,
    EvidenceId, IdentityResolver, NewAcademicPeriod, NewActivity, NewActivityDetail, NewEvidence,
    NewPlan, Notification, NotificationId, Notifier, NotifyError, PeriodId, Plan, PlanAnnotation,
    PlanId, PlanningError, PlanningService, PlanningStore, StoreError, UserId, DEAN_ROLE,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Sequence(u64);

impl Sequence {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct PlannerTables {
    periods: HashMap<u64, AcademicPeriod>,
    period_seq: Sequence,
    activities: HashMap<u64, Activity>,
    activity_seq: Sequence,
    plans: HashMap<u64, Plan>,
    plan_seq: Sequence,
    details: HashMap<u64, ActivityDetail>,
    detail_seq: Sequence,
    evidence: HashMap<u64, Evidence>,
    evidence_seq: Sequence,
    notifications: HashMap<u64, Notification>,
    notification_seq: Sequence,
}

/// Process-local planning store. Rows live in per-entity tables keyed by the
/// ids the store assigns; listings come back ordered by id.
#[derive(Default)]
pub(crate) struct InMemoryPlanningStore {
    tables: Mutex<PlannerTables>,
}

impl InMemoryPlanningStore {
    fn tables(&self) -> MutexGuard<'_, PlannerTables> {
        self.tables.lock().expect("planning store mutex poisoned")
    }
}

fn sorted_by_id<T, F>(table: &HashMap<u64, T>, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> u64,
{
    let mut rows: Vec<T> = table.values().cloned().collect();
    rows.sort_by_key(|row| key(row));
    rows
}

impl PlanningStore for InMemoryPlanningStore {
    fn insert_period(&self, draft: NewAcademicPeriod) -> Result<AcademicPeriod, StoreError> {
        let mut tables = self.tables();
        if tables.periods.values().any(|period| period.name == draft.name) {
            return Err(StoreError::Conflict);
        }
        let id = tables.period_seq.next();
        let period = AcademicPeriod {
            id: PeriodId(id),
            name: draft.name,
            weeks: draft.weeks,
        };
        tables.periods.insert(id, period.clone());
        Ok(period)
    }

    fn fetch_period(&self, id: PeriodId) -> Result<Option<AcademicPeriod>, StoreError> {
        Ok(self.tables().periods.get(&id.0).cloned())
    }

    fn periods(&self) -> Result<Vec<AcademicPeriod>, StoreError> {
        Ok(sorted_by_id(&self.tables().periods, |period| period.id.0))
    }

    fn insert_activity(&self, draft: NewActivity) -> Result<Activity, StoreError> {
        let mut tables = self.tables();
        if tables
            .activities
            .values()
            .any(|entry| entry.code == draft.code)
        {
            return Err(StoreError::Conflict);
        }
        let id = tables.activity_seq.next();
        let activity = Activity {
            id: ActivityId(id),
            code: draft.code,
            category: draft.category,
            description: draft.description,
            max_period_hours: draft.max_period_hours,
            max_weekly_hours: draft.max_weekly_hours,
            evidence_required: draft.evidence_required,
        };
        tables.activities.insert(id, activity.clone());
        Ok(activity)
    }

    fn fetch_activity(&self, id: ActivityId) -> Result<Option<Activity>, StoreError> {
        Ok(self.tables().activities.get(&id.0).cloned())
    }

    fn activities(&self) -> Result<Vec<Activity>, StoreError> {
        Ok(sorted_by_id(&self.tables().activities, |entry| entry.id.0))
    }

    fn remove_activity(&self, id: ActivityId) -> Result<(), StoreError> {
        self.tables()
            .activities
            .remove(&id.0)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn insert_plan(&self, owner: UserId, draft: NewPlan) -> Result<Plan, StoreError> {
        let mut tables = self.tables();
        if tables
            .plans
            .values()
            .any(|plan| plan.owner == owner && plan.period == draft.period)
        {
            return Err(StoreError::Conflict);
        }
        let id = tables.plan_seq.next();
        let plan = Plan {
            id: PlanId(id),
            owner,
            period: draft.period,
            active: draft.active,
            dean_comment: None,
        };
        tables.plans.insert(id, plan.clone());
        Ok(plan)
    }

    fn fetch_plan(&self, id: PlanId) -> Result<Option<Plan>, StoreError> {
        Ok(self.tables().plans.get(&id.0).cloned())
    }

    fn update_plan(&self, plan: Plan) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables.plans.contains_key(&plan.id.0) {
            return Err(StoreError::NotFound);
        }
        tables.plans.insert(plan.id.0, plan);
        Ok(())
    }

    fn remove_plan(&self, id: PlanId) -> Result<(), StoreError> {
        let mut tables = self.tables();
        tables.plans.remove(&id.0).ok_or(StoreError::NotFound)?;

        let orphaned: Vec<u64> = tables
            .details
            .values()
            .filter(|detail| detail.plan == id)
            .map(|detail| detail.id.0)
            .collect();
        for detail_id in &orphaned {
            tables.details.remove(detail_id);
        }
        for evidence in tables.evidence.values_mut() {
            if let Some(detail) = evidence.detail {
                if orphaned.contains(&detail.0) {
                    evidence.detail = None;
                }
            }
        }
        Ok(())
    }

    fn plans(&self) -> Result<Vec<Plan>, StoreError> {
        Ok(sorted_by_id(&self.tables().plans, |plan| plan.id.0))
    }

    fn plans_for(&self, owner: UserId) -> Result<Vec<Plan>, StoreError> {
        let mut rows: Vec<Plan> = self
            .tables()
            .plans
            .values()
            .filter(|plan| plan.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|plan| plan.id.0);
        Ok(rows)
    }

    fn insert_detail(&self, draft: NewActivityDetail) -> Result<ActivityDetail, StoreError> {
        let mut tables = self.tables();
        let id = tables.detail_seq.next();
        let detail = ActivityDetail {
            id: DetailId(id),
            plan: draft.plan,
            activity: draft.activity,
            assigned_hours: draft.assigned_hours,
            period_hours: draft.period_hours,
            expected_product: draft.expected_product,
            justification: draft.justification,
        };
        tables.details.insert(id, detail.clone());
        Ok(detail)
    }

    fn fetch_detail(&self, id: DetailId) -> Result<Option<ActivityDetail>, StoreError> {
        Ok(self.tables().details.get(&id.0).cloned())
    }

    fn remove_detail(&self, id: DetailId) -> Result<(), StoreError> {
        let mut tables = self.tables();
        tables.details.remove(&id.0).ok_or(StoreError::NotFound)?;
        for evidence in tables.evidence.values_mut() {
            if evidence.detail == Some(id) {
                evidence.detail = None;
            }
        }
        Ok(())
    }

    fn details(&self) -> Result<Vec<ActivityDetail>, StoreError> {
        Ok(sorted_by_id(&self.tables().details, |detail| detail.id.0))
    }

    fn details_for_plan(&self, plan: PlanId) -> Result<Vec<ActivityDetail>, StoreError> {
        let mut rows: Vec<ActivityDetail> = self
            .tables()
            .details
            .values()
            .filter(|detail| detail.plan == plan)
            .cloned()
            .collect();
        rows.sort_by_key(|detail| detail.id.0);
        Ok(rows)
    }

    fn details_for_activity(
        &self,
        activity: ActivityId,
    ) -> Result<Vec<ActivityDetail>, StoreError> {
        let mut rows: Vec<ActivityDetail> = self
            .tables()
            .details
            .values()
            .filter(|detail| detail.activity == activity)
            .cloned()
            .collect();
        rows.sort_by_key(|detail| detail.id.0);
        Ok(rows)
    }

    fn insert_evidence(
        &self,
        owner: UserId,
        draft: NewEvidence,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Evidence, StoreError> {
        let mut tables = self.tables();
        let id = tables.evidence_seq.next();
        let evidence = Evidence {
            id: EvidenceId(id),
            owner,
            detail: draft.detail,
            file_name: draft.file_name,
            url: draft.url,
            uploaded_at,
        };
        tables.evidence.insert(id, evidence.clone());
        Ok(evidence)
    }

    fn fetch_evidence(&self, id: EvidenceId) -> Result<Option<Evidence>, StoreError> {
        Ok(self.tables().evidence.get(&id.0).cloned())
    }

    fn remove_evidence(&self, id: EvidenceId) -> Result<(), StoreError> {
        self.tables()
            .evidence
            .remove(&id.0)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn evidence(&self) -> Result<Vec<Evidence>, StoreError> {
        Ok(sorted_by_id(&self.tables().evidence, |entry| entry.id.0))
    }

    fn evidence_for(&self, owner: UserId) -> Result<Vec<Evidence>, StoreError> {
        let mut rows: Vec<Evidence> = self
            .tables()
            .evidence
            .values()
            .filter(|entry| entry.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|entry| entry.id.0);
        Ok(rows)
    }

    fn insert_notification(
        &self,
        recipient: UserId,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Result<Notification, StoreError> {
        let mut tables = self.tables();
        let id = tables.notification_seq.next();
        let notification = Notification {
            id: NotificationId(id),
            recipient,
            message,
            created_at,
            read: false,
        };
        tables.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    fn fetch_notification(&self, id: NotificationId) -> Result<Option<Notification>, StoreError> {
        Ok(self.tables().notifications.get(&id.0).cloned())
    }

    fn update_notification(&self, notification: Notification) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables.notifications.contains_key(&notification.id.0) {
            return Err(StoreError::NotFound);
        }
        tables.notifications.insert(notification.id.0, notification);
        Ok(())
    }

    fn notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(sorted_by_id(&self.tables().notifications, |entry| {
            entry.id.0
        }))
    }

    fn notifications_for(&self, recipient: UserId) -> Result<Vec<Notification>, StoreError> {
        let mut rows: Vec<Notification> = self
            .tables()
            .notifications
            .values()
            .filter(|entry| entry.recipient == recipient)
            .cloned()
            .collect();
        rows.sort_by_key(|entry| entry.id.0);
        Ok(rows)
    }
}

/// Delivers notifications by writing them into the planning store, which puts
/// them straight into the recipient's inbox endpoint.
pub(crate) struct StoreNotifier<S> {
    store: Arc<S>,
}

impl<S> StoreNotifier<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: PlanningStore> Notifier for StoreNotifier<S> {
    fn notify(&self, recipient: UserId, message: &str) -> Result<(), NotifyError> {
        self.store
            .insert_notification(recipient, message.to_string(), Utc::now())
            .map(|_| ())
            .map_err(|err| NotifyError::Unavailable(err.to_string()))
    }
}

/// Token directory for the demo deployment. A real installation would resolve
/// tokens against the institutional identity provider instead.
pub(crate) struct StaticUserDirectory {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticUserDirectory {
    pub(crate) fn seeded() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert("demo-professor-token".to_string(), demo_professor());
        tokens.insert("demo-colleague-token".to_string(), demo_colleague());
        tokens.insert("demo-dean-token".to_string(), demo_dean());
        Self { tokens }
    }
}

impl IdentityResolver for StaticUserDirectory {
    fn resolve(&self, token: &str) -> Option<AuthenticatedUser> {
        self.tokens.get(token).cloned()
    }
}

pub(crate) fn demo_professor() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(1),
        username: "maria.vega".to_string(),
        email: "maria.vega@uni.edu".to_string(),
        national_id: "0923456789".to_string(),
        school: "School of Systems Engineering".to_string(),
        contract_type: "full_time".to_string(),
        roles: BTreeSet::from(["professor".to_string()]),
    }
}

pub(crate) fn demo_colleague() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(2),
        username: "jorge.luna".to_string(),
        email: "jorge.luna@uni.edu".to_string(),
        national_id: "0911223344".to_string(),
        school: "School of Systems Engineering".to_string(),
        contract_type: "part_time".to_string(),
        roles: BTreeSet::from(["professor".to_string()]),
    }
}

pub(crate) fn demo_dean() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(3),
        username: "diana.rojas".to_string(),
        email: "diana.rojas@uni.edu".to_string(),
        national_id: "0999887766".to_string(),
        school: "School of Systems Engineering".to_string(),
        contract_type: "full_time".to_string(),
        roles: BTreeSet::from([DEAN_ROLE.to_string(), "professor".to_string()]),
    }
}

/// Load the starter dataset: the standard catalog, the current academic
/// period, and a worked plan for the demo professor with dean feedback.
pub(crate) fn seed_demo<S, N>(service: &PlanningService<S, N>) -> Result<(), PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let period = service.create_period(NewAcademicPeriod {
        name: "2025-2026 Term I".to_string(),
        weeks: 16,
    })?;
    let catalog = service.import_catalog(standard_catalog())?;

    let professor = demo_professor();
    let plan = service.create_plan(
        &professor,
        NewPlan {
            period: period.id,
            active: true,
        },
    )?;

    let teaching = catalog_entry(&catalog, "DOC-01")?;
    let research = catalog_entry(&catalog, "INV-01")?;
    let management = catalog_entry(&catalog, "GES-01")?;

    let lecture_detail = service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: teaching.id,
            assigned_hours: 12,
            period_hours: 192,
            expected_product: Some("Course syllabus and grade records".to_string()),
            justification: None,
        },
    )?;
    service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: research.id,
            assigned_hours: 6,
            period_hours: 96,
            expected_product: Some("Annual project report".to_string()),
            justification: Some("Continuing the irrigation telemetry project".to_string()),
        },
    )?;
    service.create_detail(
        &professor,
        NewActivityDetail {
            plan: plan.id,
            activity: management.id,
            assigned_hours: 4,
            period_hours: 64,
            expected_product: None,
            justification: None,
        },
    )?;
    service.create_evidence(
        &professor,
        NewEvidence {
            detail: Some(lecture_detail.id),
            file_name: Some("syllabus-2025-term1.pdf".to_string()),
            url: None,
        },
    )?;

    service.annotate_plan(
        &demo_dean(),
        plan.id,
        PlanAnnotation {
            comment: "Reviewed. Balance outreach hours next term.".to_string(),
        },
    )?;

    Ok(())
}

fn catalog_entry(catalog: &[Activity], code: &str) -> Result<Activity, PlanningError> {
    catalog
        .iter()
        .find(|entry| entry.code == code)
        .cloned()
        .ok_or(PlanningError::NotFound)
}
