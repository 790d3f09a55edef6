pub mod handlers;
pub mod service;

pub use service::{SettlementOutcome, SettlementService};

use crate::player::PlayerRecord;

/// Score weights applied to lifetime counters.
pub mod score_weight {
    /// Points per lifetime win
    pub const WIN: i64 = 30;
    /// Points per lifetime loss (participation still scores)
    pub const LOSS: i64 = 10;
    /// Points per attendance day (3+ games played)
    pub const ATTENDANCE: i64 = 20;
    /// Points per unit of cumulative win-streak count
    pub const STREAK_BONUS: i64 = 20;
}

/// Games required in one day for an attendance credit
pub const ATTENDANCE_GAME_THRESHOLD: u32 = 3;

/// Ranking score from lifetime counters only.
///
/// The streak term multiplies the cumulative `win_streak_count`, which
/// settlement also increments each cycle, so streak contribution compounds
/// across cycles. That matches the live scoring rules as deployed; do not
/// change it without product sign-off.
pub fn compute_rp(player: &PlayerRecord) -> i64 {
    i64::from(player.wins) * score_weight::WIN
        + i64::from(player.losses) * score_weight::LOSS
        + i64::from(player.attendance_count) * score_weight::ATTENDANCE
        + i64::from(player.win_streak_count) * score_weight::STREAK_BONUS
}
