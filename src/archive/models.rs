use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a monthly leaderboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub id: String,
    pub name: String,
    /// 1-based position, rp descending
    pub rank: u32,
    pub rp: i64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub win_streak_count: u32,
    #[serde(default)]
    pub attendance_count: u32,
}

/// Immutable leaderboard snapshot for one calendar month.
///
/// Keyed by `YYYY-MM`, or `YYYY-MM-TEST` for test-mode runs so they never
/// collide with production snapshots. `created_at` is stamped by the store
/// on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRankingSnapshot {
    pub key: String,
    pub entries: Vec<RankedEntry>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Error,
}

/// Latest notification in an administrator's single-slot mailbox.
/// Each write replaces the previous one; this is not a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}
