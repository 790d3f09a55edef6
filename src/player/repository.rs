use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{CounterField, FieldUpdate, PlayerRecord, PlayerUpdate};
use super::StoreError;

/// Read/query/batch-write contract over the player collection.
///
/// The production backend is a remote document store; the in-memory
/// implementation below is used for development and tests. Batch updates
/// are atomic: either every operation lands or none does.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Full scan, guests included
    async fn fetch_all_players(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Only players with `is_guest == false`
    async fn fetch_competitors(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Applies all updates as one atomic unit
    async fn batch_update(&self, updates: Vec<PlayerUpdate>) -> Result<(), StoreError>;
}

/// In-memory implementation of PlayerRepository for development and testing
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<String, PlayerRecord>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds a player record, replacing any existing one with the same id
    pub fn insert(&self, player: PlayerRecord) {
        let mut players = self.players.lock().unwrap();
        players.insert(player.id.clone(), player);
    }

    /// Readback helper for tests and ops tooling
    pub fn get(&self, player_id: &str) -> Option<PlayerRecord> {
        let players = self.players.lock().unwrap();
        players.get(player_id).cloned()
    }
}

fn apply_op(player: &mut PlayerRecord, op: &FieldUpdate) {
    match op {
        FieldUpdate::Increment(field, delta) => {
            let slot = counter_slot(player, *field);
            *slot = slot.saturating_add(*delta);
        }
        FieldUpdate::Set(field, value) => {
            *counter_slot(player, *field) = *value;
        }
        FieldUpdate::SetRp(rp) => {
            player.rp = *rp;
        }
        FieldUpdate::ClearTodayGames => {
            player.today_recent_games.clear();
        }
    }
}

fn counter_slot(player: &mut PlayerRecord, field: CounterField) -> &mut u32 {
    match field {
        CounterField::Wins => &mut player.wins,
        CounterField::Losses => &mut player.losses,
        CounterField::WinStreakCount => &mut player.win_streak_count,
        CounterField::AttendanceCount => &mut player.attendance_count,
        CounterField::TodayWins => &mut player.today_wins,
        CounterField::TodayLosses => &mut player.today_losses,
        CounterField::TodayWinStreakCount => &mut player.today_win_streak_count,
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self))]
    async fn fetch_all_players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let players = self.players.lock().unwrap();
        let all: Vec<PlayerRecord> = players.values().cloned().collect();

        debug!(player_count = all.len(), "Fetched all players from memory");
        Ok(all)
    }

    #[instrument(skip(self))]
    async fn fetch_competitors(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let players = self.players.lock().unwrap();
        let competitors: Vec<PlayerRecord> = players
            .values()
            .filter(|p| !p.is_guest)
            .cloned()
            .collect();

        debug!(
            competitor_count = competitors.len(),
            "Fetched non-guest players from memory"
        );
        Ok(competitors)
    }

    #[instrument(skip(self, updates))]
    async fn batch_update(&self, updates: Vec<PlayerUpdate>) -> Result<(), StoreError> {
        let mut players = self.players.lock().unwrap();

        // Validate every target before touching anything, so a bad id
        // fails the whole batch with no partial application
        for update in &updates {
            if !players.contains_key(&update.player_id) {
                warn!(player_id = %update.player_id, "Batch update targets unknown player");
                return Err(StoreError::UnknownPlayer(update.player_id.clone()));
            }
        }

        let update_count = updates.len();
        for update in updates {
            let player = players
                .get_mut(&update.player_id)
                .ok_or_else(|| StoreError::UnknownPlayer(update.player_id.clone()))?;
            for op in &update.ops {
                apply_op(player, op);
            }
        }

        debug!(update_count, "Batch update committed");
        Ok(())
    }
}
