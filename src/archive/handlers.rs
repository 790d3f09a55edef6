use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::service::ArchiveService;
use crate::settlement::handlers::RunResponse;
use crate::shared::{AppError, AppState, ADMIN_ID};

/// HTTP handler for running a test-mode archive on demand
///
/// POST /admin/archive/run
/// Writes under the `-TEST` suffixed key so it never collides with the
/// scheduled production snapshot. Test failures surface as a generic
/// internal error and skip the error-notification fallback.
#[instrument(name = "run_archive", skip(state))]
pub async fn run_archive(State(state): State<AppState>) -> Result<Json<RunResponse>, AppError> {
    info!("Test archive run requested");

    let service = ArchiveService::new(
        Arc::clone(&state.player_repository),
        Arc::clone(&state.archive_repository),
        ADMIN_ID,
    );

    match service.archive_monthly_ranking(true).await {
        Ok(outcome) => {
            let message = outcome.message();
            info!(%message, "Test archive run finished");
            Ok(Json(RunResponse {
                success: true,
                message,
            }))
        }
        Err(err) => {
            error!(error = %err, "Test archive run failed");
            Err(AppError::Internal)
        }
    }
}
