use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo, AppState, InMemoryPlanningStore, StaticUserDirectory, StoreNotifier,
};
use crate::routes::with_planning_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use faculty_planner::config::{AppConfig, SeedMode};
use faculty_planner::error::AppError;
use faculty_planner::telemetry;
use faculty_planner::workflows::planning::{IdentityResolver, PlanningService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryPlanningStore::default());
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let resolver: Arc<dyn IdentityResolver> = Arc::new(StaticUserDirectory::seeded());
    let planning_service = Arc::new(PlanningService::new(store, notifier));

    match config.seed {
        SeedMode::Demo => {
            seed_demo(&planning_service)?;
            info!("demo dataset seeded");
        }
        SeedMode::Empty => {}
    }

    let app = with_planning_routes(planning_service, resolver)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "faculty workload planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}
