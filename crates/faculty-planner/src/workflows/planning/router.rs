use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde_json::json;

use super::domain::{
    ActivityId, DetailId, EvidenceId, NewAcademicPeriod, NewActivity, NewActivityDetail,
    NewEvidence, NewPlan, NotificationId, PlanAnnotation, PlanId, PlanUpdate,
};
use super::identity::{AuthenticatedUser, IdentityResolver, TOKEN_SCHEME};
use super::repository::{Notifier, PlanningStore, StoreError};
use super::service::{PlanningError, PlanningService};

/// Router builder exposing the planning HTTP surface. The resolver rides along
/// as an extension so the `Identity` extractor can turn tokens into users.
pub fn planning_router<S, N>(
    service: Arc<PlanningService<S, N>>,
    resolver: Arc<dyn IdentityResolver>,
) -> Router
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/profile", get(profile_handler))
        .route(
            "/api/v1/periods",
            get(list_periods_handler::<S, N>).post(create_period_handler::<S, N>),
        )
        .route(
            "/api/v1/activities",
            get(list_activities_handler::<S, N>).post(create_activity_handler::<S, N>),
        )
        .route(
            "/api/v1/activities/:activity_id",
            axum::routing::delete(delete_activity_handler::<S, N>),
        )
        .route(
            "/api/v1/plans",
            get(list_plans_handler::<S, N>).post(create_plan_handler::<S, N>),
        )
        .route(
            "/api/v1/plans/:plan_id",
            get(get_plan_handler::<S, N>)
                .put(update_plan_handler::<S, N>)
                .delete(delete_plan_handler::<S, N>),
        )
        .route(
            "/api/v1/plans/:plan_id/annotation",
            post(annotate_plan_handler::<S, N>),
        )
        .route(
            "/api/v1/details",
            get(list_details_handler::<S, N>).post(create_detail_handler::<S, N>),
        )
        .route(
            "/api/v1/details/:detail_id",
            get(get_detail_handler::<S, N>).delete(delete_detail_handler::<S, N>),
        )
        .route(
            "/api/v1/evidence",
            get(list_evidence_handler::<S, N>).post(create_evidence_handler::<S, N>),
        )
        .route(
            "/api/v1/evidence/:evidence_id",
            get(get_evidence_handler::<S, N>).delete(delete_evidence_handler::<S, N>),
        )
        .route(
            "/api/v1/notifications",
            get(list_notifications_handler::<S, N>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_notification_read_handler::<S, N>),
        )
        .route(
            "/api/v1/reports/workload-summary",
            get(workload_summary_handler::<S, N>),
        )
        .layer(Extension(resolver))
        .with_state(service)
}

/// Authenticated caller extracted from the `Authorization: Token <opaque>` header.
#[derive(Debug, Clone)]
pub struct Identity(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resolver = parts
            .extensions
            .get::<Arc<dyn IdentityResolver>>()
            .ok_or(IdentityRejection::ResolverMissing)?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(IdentityRejection::Unauthenticated)?;

        let token = header_value
            .strip_prefix(TOKEN_SCHEME)
            .and_then(|rest| rest.strip_prefix(' '))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityRejection::Unauthenticated)?;

        let user = resolver
            .resolve(token)
            .ok_or(IdentityRejection::Unauthenticated)?;

        Ok(Identity(user))
    }
}

/// Why a request carries no usable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    /// Header missing, malformed, or the token resolved to nobody.
    Unauthenticated,
    /// The router was built without an identity resolver extension.
    ResolverMissing,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        match self {
            IdentityRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "authentication required" })),
            )
                .into_response(),
            IdentityRejection::ResolverMissing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "error": "identity resolver not configured" })),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for PlanningError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlanningError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PlanningError::NotFound | PlanningError::Store(StoreError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            PlanningError::DeanOnly => StatusCode::FORBIDDEN,
            PlanningError::CatalogEntryInUse | PlanningError::Store(StoreError::Conflict) => {
                StatusCode::CONFLICT
            }
            PlanningError::Store(StoreError::Unavailable(_)) | PlanningError::Notify(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            PlanningError::Validation { field, message } => {
                json!({ "error": message, "field": field })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub(crate) async fn profile_handler(Identity(user): Identity) -> Response {
    (StatusCode::OK, axum::Json(user.profile())).into_response()
}

pub(crate) async fn list_periods_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(_user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let periods = service.periods()?;
    Ok((StatusCode::OK, axum::Json(periods)).into_response())
}

pub(crate) async fn create_period_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(_user): Identity,
    axum::Json(draft): axum::Json<NewAcademicPeriod>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let period = service.create_period(draft)?;
    Ok((StatusCode::CREATED, axum::Json(period)).into_response())
}

pub(crate) async fn list_activities_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(_user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let activities = service.activities()?;
    Ok((StatusCode::OK, axum::Json(activities)).into_response())
}

pub(crate) async fn create_activity_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(_user): Identity,
    axum::Json(draft): axum::Json<NewActivity>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let activity = service.create_activity(draft)?;
    Ok((StatusCode::CREATED, axum::Json(activity)).into_response())
}

pub(crate) async fn delete_activity_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(_user): Identity,
    Path(activity_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    service.remove_activity(ActivityId(activity_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn list_plans_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let plans = service.scoped_plans(&user)?;
    Ok((StatusCode::OK, axum::Json(plans)).into_response())
}

pub(crate) async fn create_plan_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    axum::Json(draft): axum::Json<NewPlan>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let plan = service.create_plan(&user, draft)?;
    Ok((StatusCode::CREATED, axum::Json(plan)).into_response())
}

pub(crate) async fn get_plan_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(plan_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let plan = service.plan(&user, PlanId(plan_id))?;
    Ok((StatusCode::OK, axum::Json(plan)).into_response())
}

pub(crate) async fn update_plan_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(plan_id): Path<u64>,
    axum::Json(update): axum::Json<PlanUpdate>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let plan = service.update_plan(&user, PlanId(plan_id), update)?;
    Ok((StatusCode::OK, axum::Json(plan)).into_response())
}

pub(crate) async fn delete_plan_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(plan_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    service.remove_plan(&user, PlanId(plan_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn annotate_plan_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(plan_id): Path<u64>,
    axum::Json(annotation): axum::Json<PlanAnnotation>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let plan = service.annotate_plan(&user, PlanId(plan_id), annotation)?;
    Ok((StatusCode::OK, axum::Json(plan)).into_response())
}

pub(crate) async fn list_details_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let details = service.scoped_details(&user)?;
    Ok((StatusCode::OK, axum::Json(details)).into_response())
}

pub(crate) async fn create_detail_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    axum::Json(draft): axum::Json<NewActivityDetail>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let detail = service.create_detail(&user, draft)?;
    Ok((StatusCode::CREATED, axum::Json(detail)).into_response())
}

pub(crate) async fn get_detail_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(detail_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let detail = service.detail(&user, DetailId(detail_id))?;
    Ok((StatusCode::OK, axum::Json(detail)).into_response())
}

pub(crate) async fn delete_detail_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(detail_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    service.remove_detail(&user, DetailId(detail_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn list_evidence_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let evidence = service.scoped_evidence(&user)?;
    Ok((StatusCode::OK, axum::Json(evidence)).into_response())
}

pub(crate) async fn create_evidence_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    axum::Json(draft): axum::Json<NewEvidence>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let evidence = service.create_evidence(&user, draft)?;
    Ok((StatusCode::CREATED, axum::Json(evidence)).into_response())
}

pub(crate) async fn get_evidence_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(evidence_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let evidence = service.evidence(&user, EvidenceId(evidence_id))?;
    Ok((StatusCode::OK, axum::Json(evidence)).into_response())
}

pub(crate) async fn delete_evidence_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(evidence_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    service.remove_evidence(&user, EvidenceId(evidence_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn list_notifications_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let notifications = service.scoped_notifications(&user)?;
    Ok((StatusCode::OK, axum::Json(notifications)).into_response())
}

pub(crate) async fn mark_notification_read_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
    Path(notification_id): Path<u64>,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let notification = service.mark_notification_read(&user, NotificationId(notification_id))?;
    Ok((StatusCode::OK, axum::Json(notification)).into_response())
}

pub(crate) async fn workload_summary_handler<S, N>(
    State(service): State<Arc<PlanningService<S, N>>>,
    Identity(user): Identity,
) -> Result<Response, PlanningError>
where
    S: PlanningStore + 'static,
    N: Notifier + 'static,
{
    let outcome = service.workload_summary(&user)?;
    Ok((StatusCode::OK, axum::Json(outcome)).into_response())
}
