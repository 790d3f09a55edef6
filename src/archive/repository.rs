use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::{MonthlyRankingSnapshot, Notification, NotificationStatus, RankedEntry};
use crate::player::StoreError;

/// Write-side contract for monthly snapshots and administrator
/// notifications. Both are keyed upserts with server-assigned timestamps:
/// re-writing a snapshot key replaces the prior document, and each
/// administrator has a single notification slot.
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    async fn write_snapshot(
        &self,
        key: &str,
        entries: Vec<RankedEntry>,
    ) -> Result<MonthlyRankingSnapshot, StoreError>;

    async fn write_notification(
        &self,
        admin_id: &str,
        message: String,
        status: NotificationStatus,
    ) -> Result<Notification, StoreError>;

    async fn get_snapshot(&self, key: &str) -> Result<Option<MonthlyRankingSnapshot>, StoreError>;

    async fn get_notification(&self, admin_id: &str) -> Result<Option<Notification>, StoreError>;
}

/// In-memory implementation of ArchiveRepository for development and testing
pub struct InMemoryArchiveRepository {
    snapshots: Mutex<HashMap<String, MonthlyRankingSnapshot>>,
    notifications: Mutex<HashMap<String, Notification>>,
}

impl Default for InMemoryArchiveRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryArchiveRepository {
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(HashMap::new()),
            notifications: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ArchiveRepository for InMemoryArchiveRepository {
    #[instrument(skip(self, entries))]
    async fn write_snapshot(
        &self,
        key: &str,
        entries: Vec<RankedEntry>,
    ) -> Result<MonthlyRankingSnapshot, StoreError> {
        let snapshot = MonthlyRankingSnapshot {
            key: key.to_string(),
            entries,
            created_at: Utc::now(),
        };

        let mut snapshots = self.snapshots.lock().unwrap();
        snapshots.insert(key.to_string(), snapshot.clone());

        debug!(key, entry_count = snapshot.entries.len(), "Snapshot written");
        Ok(snapshot)
    }

    #[instrument(skip(self, message))]
    async fn write_notification(
        &self,
        admin_id: &str,
        message: String,
        status: NotificationStatus,
    ) -> Result<Notification, StoreError> {
        let notification = Notification {
            message,
            status,
            created_at: Utc::now(),
        };

        // Single-slot mailbox: the previous notification is replaced
        let mut notifications = self.notifications.lock().unwrap();
        notifications.insert(admin_id.to_string(), notification.clone());

        debug!(admin_id, ?status, "Notification written");
        Ok(notification)
    }

    #[instrument(skip(self))]
    async fn get_snapshot(&self, key: &str) -> Result<Option<MonthlyRankingSnapshot>, StoreError> {
        let snapshots = self.snapshots.lock().unwrap();
        Ok(snapshots.get(key).cloned())
    }

    #[instrument(skip(self))]
    async fn get_notification(&self, admin_id: &str) -> Result<Option<Notification>, StoreError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications.get(admin_id).cloned())
    }
}
