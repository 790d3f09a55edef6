use std::sync::Arc;
use tracing::{info, instrument};

use super::{compute_rp, ATTENDANCE_GAME_THRESHOLD};
use crate::player::{CounterField, PlayerRecord, PlayerRepository, PlayerUpdate, StoreError};

/// Result of one settlement cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// No player had today-activity; nothing was written
    NothingToSettle,
    /// Today's counters were rolled up and scores recomputed
    Settled { settled: usize, scored: usize },
}

impl SettlementOutcome {
    pub fn message(&self) -> String {
        match self {
            SettlementOutcome::NothingToSettle => {
                "No players with games today; nothing to settle".to_string()
            }
            SettlementOutcome::Settled { settled, scored } => format!(
                "Settled daily stats for {} players and recomputed {} ranking scores",
                settled, scored
            ),
        }
    }
}

/// Daily settlement engine.
///
/// Runs in two strictly ordered phases: roll today's counters into
/// lifetime counters and commit, then re-read the competitors and
/// overwrite every ranking score from the post-roll-up counters. The
/// second read must not start before the first commit is durable, since
/// the score formula depends on the rolled-up values.
pub struct SettlementService {
    player_repository: Arc<dyn PlayerRepository>,
}

impl SettlementService {
    pub fn new(player_repository: Arc<dyn PlayerRepository>) -> Self {
        Self { player_repository }
    }

    #[instrument(skip(self))]
    pub async fn run_daily_settlement(&self) -> Result<SettlementOutcome, StoreError> {
        // Phase one: roll-up. Guests are fetched too; they get resets only.
        let all_players = self.player_repository.fetch_all_players().await?;

        let active: Vec<&PlayerRecord> = all_players
            .iter()
            .filter(|p| p.has_today_activity())
            .collect();

        if active.is_empty() {
            info!("No today-activity found, skipping settlement");
            return Ok(SettlementOutcome::NothingToSettle);
        }

        let rollups: Vec<PlayerUpdate> = active.iter().map(|p| build_rollup(p)).collect();
        let settled = rollups.len();

        self.player_repository.batch_update(rollups).await?;
        info!(settled, "Roll-up batch committed");

        // Phase two: recompute every competitor's score from the fresh,
        // post-roll-up lifetime counters
        let competitors = self.player_repository.fetch_competitors().await?;

        let score_updates: Vec<PlayerUpdate> = competitors
            .iter()
            .map(|p| PlayerUpdate::new(p.id.clone()).set_rp(compute_rp(p)))
            .collect();
        let scored = score_updates.len();

        self.player_repository.batch_update(score_updates).await?;
        info!(scored, "Score batch committed");

        Ok(SettlementOutcome::Settled { settled, scored })
    }
}

/// Update for one player with today-activity: always reset the today
/// counters; fold them into lifetime counters only for non-guests.
fn build_rollup(player: &PlayerRecord) -> PlayerUpdate {
    let mut update = PlayerUpdate::new(player.id.clone());

    if !player.is_guest {
        update = update
            .increment(CounterField::Wins, player.today_wins)
            .increment(CounterField::Losses, player.today_losses)
            .increment(CounterField::WinStreakCount, player.today_win_streak_count);

        // At most one attendance credit per cycle, however many games
        // beyond the threshold were played
        if player.today_wins + player.today_losses >= ATTENDANCE_GAME_THRESHOLD {
            update = update.increment(CounterField::AttendanceCount, 1);
        }
    }

    update
        .set(CounterField::TodayWins, 0)
        .set(CounterField::TodayLosses, 0)
        .set(CounterField::TodayWinStreakCount, 0)
        .clear_today_games()
}
