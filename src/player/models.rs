use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One player document. Counters default to zero so records written before
/// a field existed still deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_guest: bool,

    // Lifetime counters, increment-only, owned by the settlement engine
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub win_streak_count: u32,
    #[serde(default)]
    pub attendance_count: u32,

    // Today-scoped counters, written by live game recording, zeroed here
    #[serde(default)]
    pub today_wins: u32,
    #[serde(default)]
    pub today_losses: u32,
    #[serde(default)]
    pub today_win_streak_count: u32,
    #[serde(default)]
    pub today_recent_games: Vec<GameRecord>,

    /// Derived ranking score, fully overwritten each settlement cycle
    #[serde(default)]
    pub rp: i64,
}

impl PlayerRecord {
    /// Minimal record with every counter at zero
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_guest: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_guest,
            wins: 0,
            losses: 0,
            win_streak_count: 0,
            attendance_count: 0,
            today_wins: 0,
            today_losses: 0,
            today_win_streak_count: 0,
            today_recent_games: Vec::new(),
            rp: 0,
        }
    }

    /// Whether this player has anything to settle today
    pub fn has_today_activity(&self) -> bool {
        self.today_wins > 0 || self.today_losses > 0
    }
}

/// One of today's games, produced by live game recording. Settlement only
/// ever clears the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub opponent: String,
    pub won: bool,
    pub played_at: DateTime<Utc>,
}

/// Numeric player fields addressable by a batch update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Wins,
    Losses,
    WinStreakCount,
    AttendanceCount,
    TodayWins,
    TodayLosses,
    TodayWinStreakCount,
}

/// One field-level operation inside a batch update.
///
/// `Increment` composes with concurrent writers (live game recording keeps
/// bumping today-counters while a batch is in flight); `Set` and `SetRp`
/// unconditionally overwrite computed fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Increment(CounterField, u32),
    Set(CounterField, u32),
    SetRp(i64),
    ClearTodayGames,
}

/// All operations for a single player within one atomic batch
#[derive(Debug, Clone)]
pub struct PlayerUpdate {
    pub player_id: String,
    pub ops: Vec<FieldUpdate>,
}

impl PlayerUpdate {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ops: Vec::new(),
        }
    }

    pub fn increment(mut self, field: CounterField, delta: u32) -> Self {
        self.ops.push(FieldUpdate::Increment(field, delta));
        self
    }

    pub fn set(mut self, field: CounterField, value: u32) -> Self {
        self.ops.push(FieldUpdate::Set(field, value));
        self
    }

    pub fn set_rp(mut self, rp: i64) -> Self {
        self.ops.push(FieldUpdate::SetRp(rp));
        self
    }

    pub fn clear_today_games(mut self) -> Self {
        self.ops.push(FieldUpdate::ClearTodayGames);
        self
    }
}
