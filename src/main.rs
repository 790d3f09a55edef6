mod archive;
mod player;
mod schedule;
mod settlement;
mod shared;

use axum::{routing::post, Router};
use archive::InMemoryArchiveRepository;
use player::InMemoryPlayerRepository;
use schedule::ScheduleConfig;
use shared::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubrank=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting club ranking batch service");

    // One store handle per process, shared by both engines
    let player_repository: Arc<dyn player::PlayerRepository> =
        Arc::new(InMemoryPlayerRepository::new());
    let archive_repository: Arc<dyn archive::ArchiveRepository> =
        Arc::new(InMemoryArchiveRepository::new());

    let app_state = AppState::new(
        Arc::clone(&player_repository),
        Arc::clone(&archive_repository),
    );

    // Background schedules: daily settlement, monthly archive
    let schedule_config = ScheduleConfig::default();
    tokio::spawn(schedule::start_settlement_task(
        Arc::clone(&player_repository),
        schedule_config.clone(),
    ));
    tokio::spawn(schedule::start_archive_task(
        Arc::clone(&player_repository),
        Arc::clone(&archive_repository),
        schedule_config,
    ));

    // Manual/test callables mirror the scheduled runs
    let app = Router::new()
        .route(
            "/admin/settlement/run",
            post(settlement::handlers::run_settlement),
        )
        .route("/admin/archive/run", post(archive::handlers::run_archive))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
