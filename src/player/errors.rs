use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
}
