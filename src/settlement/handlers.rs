use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::service::SettlementService;
use crate::shared::{AppError, AppState};

/// Response body shared by the manual/test callables
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub success: bool,
    pub message: String,
}

/// HTTP handler for running a settlement cycle on demand
///
/// POST /admin/settlement/run
/// Runs the same logic as the daily schedule so manual and scheduled
/// behavior cannot drift apart.
#[instrument(name = "run_settlement", skip(state))]
pub async fn run_settlement(
    State(state): State<AppState>,
) -> Result<Json<RunResponse>, AppError> {
    info!("Manual settlement run requested");

    let service = SettlementService::new(Arc::clone(&state.player_repository));

    match service.run_daily_settlement().await {
        Ok(outcome) => {
            let message = outcome.message();
            info!(%message, "Manual settlement run finished");
            Ok(Json(RunResponse {
                success: true,
                message,
            }))
        }
        Err(err) => {
            // Detail stays server-side; the caller gets a generic failure
            error!(error = %err, "Manual settlement run failed");
            Err(AppError::Internal)
        }
    }
}
