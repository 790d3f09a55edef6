use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::archive::repository::ArchiveRepository;
use crate::player::PlayerRepository;

/// Administrator identity owning the single-slot notification mailbox
pub const ADMIN_ID: &str = "admin";

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository>,
    pub archive_repository: Arc<dyn ArchiveRepository>,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository>,
        archive_repository: Arc<dyn ArchiveRepository>,
    ) -> Self {
        Self {
            player_repository,
            archive_repository,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::archive::repository::InMemoryArchiveRepository;
    use crate::player::InMemoryPlayerRepository;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        player_repository: Option<Arc<dyn PlayerRepository>>,
        archive_repository: Option<Arc<dyn ArchiveRepository>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                player_repository: None,
                archive_repository: None,
            }
        }

        pub fn with_player_repository(mut self, repo: Arc<dyn PlayerRepository>) -> Self {
            self.player_repository = Some(repo);
            self
        }

        pub fn with_archive_repository(mut self, repo: Arc<dyn ArchiveRepository>) -> Self {
            self.archive_repository = Some(repo);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                player_repository: self
                    .player_repository
                    .unwrap_or_else(|| Arc::new(InMemoryPlayerRepository::new())),
                archive_repository: self
                    .archive_repository
                    .unwrap_or_else(|| Arc::new(InMemoryArchiveRepository::new())),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
