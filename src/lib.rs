// Library crate for the club ladder ranking batch service
// This file exposes the public API for integration tests

pub mod archive;
pub mod player;
pub mod schedule;
pub mod settlement;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use archive::{ArchiveOutcome, ArchiveRepository, ArchiveService, InMemoryArchiveRepository};
pub use player::{InMemoryPlayerRepository, PlayerRecord, PlayerRepository, StoreError};
pub use settlement::{SettlementOutcome, SettlementService};
pub use shared::{AppError, AppState, ADMIN_ID};
