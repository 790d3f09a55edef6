use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use super::models::{NotificationStatus, RankedEntry};
use super::month::archive_key;
use super::repository::ArchiveRepository;
use crate::player::{PlayerRecord, PlayerRepository, StoreError};

/// Result of one archive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// No non-guest players exist; nothing was written
    NothingToRank,
    /// Snapshot and notification were written
    Archived { key: String, ranked: usize },
}

impl ArchiveOutcome {
    pub fn message(&self) -> String {
        match self {
            ArchiveOutcome::NothingToRank => {
                "No competitive players found; nothing to rank".to_string()
            }
            ArchiveOutcome::Archived { key, ranked } => {
                format!("Archived {} ranking with {} players", key, ranked)
            }
        }
    }
}

/// Monthly archive engine.
///
/// Ranks every non-guest player by rp descending, writes the immutable
/// snapshot for the previous KST calendar month, and leaves a pending
/// notification in the administrator's mailbox asking for confirmation
/// before ranking data is reset (the reset itself happens downstream).
pub struct ArchiveService {
    player_repository: Arc<dyn PlayerRepository>,
    archive_repository: Arc<dyn ArchiveRepository>,
    admin_id: String,
}

impl ArchiveService {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository>,
        archive_repository: Arc<dyn ArchiveRepository>,
        admin_id: impl Into<String>,
    ) -> Self {
        Self {
            player_repository,
            archive_repository,
            admin_id: admin_id.into(),
        }
    }

    pub async fn archive_monthly_ranking(
        &self,
        is_test: bool,
    ) -> Result<ArchiveOutcome, StoreError> {
        self.archive_monthly_ranking_at(Utc::now(), is_test).await
    }

    /// Archive run with an explicit clock, so month-key behavior is
    /// testable without waiting for a calendar boundary
    #[instrument(skip(self))]
    pub async fn archive_monthly_ranking_at(
        &self,
        now: DateTime<Utc>,
        is_test: bool,
    ) -> Result<ArchiveOutcome, StoreError> {
        let key = archive_key(now, is_test);

        let competitors = self.player_repository.fetch_competitors().await?;
        if competitors.is_empty() {
            info!(key, "No competitors found, skipping archive");
            return Ok(ArchiveOutcome::NothingToRank);
        }

        let entries = rank_players(competitors);
        let ranked = entries.len();

        self.archive_repository.write_snapshot(&key, entries).await?;

        let message = format!(
            "The {} monthly ranking has been archived. Please confirm before resetting ranking data.",
            key
        );
        self.archive_repository
            .write_notification(&self.admin_id, message, NotificationStatus::Pending)
            .await?;

        info!(key, ranked, "Monthly ranking archived");
        Ok(ArchiveOutcome::Archived { key, ranked })
    }

    /// Fallback for the scheduled path: record the failure in the
    /// administrator's mailbox and make explicit that no reset happened,
    /// so a broken archive run never silently loses ranking data.
    #[instrument(skip(self, err))]
    pub async fn record_failure(&self, err: &StoreError) -> Result<(), StoreError> {
        let message = format!(
            "Monthly ranking archive failed: {}. No ranking data was reset.",
            err
        );
        self.archive_repository
            .write_notification(&self.admin_id, message, NotificationStatus::Error)
            .await?;
        Ok(())
    }
}

/// Sorts by rp descending and assigns 1-based ranks. The sort is stable,
/// so players with equal rp keep their input order.
fn rank_players(mut players: Vec<PlayerRecord>) -> Vec<RankedEntry> {
    players.sort_by(|a, b| b.rp.cmp(&a.rp));

    players
        .into_iter()
        .enumerate()
        .map(|(index, p)| RankedEntry {
            id: p.id,
            name: p.name,
            rank: index as u32 + 1,
            rp: p.rp,
            wins: p.wins,
            losses: p.losses,
            win_streak_count: p.win_streak_count,
            attendance_count: p.attendance_count,
        })
        .collect()
}
