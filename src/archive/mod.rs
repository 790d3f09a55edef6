pub mod handlers;
pub mod models;
pub mod month;
pub mod repository;
pub mod service;

pub use models::{MonthlyRankingSnapshot, Notification, NotificationStatus, RankedEntry};
pub use month::archive_key;
pub use repository::{ArchiveRepository, InMemoryArchiveRepository};
pub use service::{ArchiveOutcome, ArchiveService};
