mod errors;
pub mod models;
pub mod repository;

pub use errors::StoreError;
pub use models::{CounterField, FieldUpdate, GameRecord, PlayerRecord, PlayerUpdate};
pub use repository::{InMemoryPlayerRepository, PlayerRepository};
