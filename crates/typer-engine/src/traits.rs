//! Collaborator seams: persistence and outbound notification.
//!
//! The engine talks to the outside world through two object-safe traits so
//! the transport layer (a chat frontend, a test harness) plugs in whatever
//! backend it has. Both ship an in-process default: [`MemoryStore`] for
//! tests and [`LogNotifier`] for headless runs.

use dashmap::DashMap;
use tracing::debug;

use typer_core::achievements::AchievementId;
use typer_core::error::StoreError;
use typer_core::record::PlayerRecord;
use typer_core::types::PlayerId;

use crate::game::PlayerStats;

/// Durable storage of player records, keyed by player id.
///
/// Implementations must be safe to call from the accrual tasks; failures are
/// surfaced as [`StoreError`] and the engine retries on the next flush.
pub trait PlayerStore: Send + Sync {
    /// Insert or overwrite the record for its player id.
    fn save(&self, record: &PlayerRecord) -> Result<(), StoreError>;
    /// Remove a player's record. Removing an absent id is not an error.
    fn delete(&self, id: PlayerId) -> Result<(), StoreError>;
    /// Load every stored record, for resuming games at startup.
    fn load_all(&self) -> Result<Vec<PlayerRecord>, StoreError>;
}

/// Outbound player-facing events. Fire-and-forget: the engine never blocks
/// on delivery and never fails a mutation because a notification did.
pub trait GameNotifier: Send + Sync {
    /// A new achievement was granted.
    fn achievement(&self, player: PlayerId, id: AchievementId);
    /// First rejection of a cooldown episode; `retry_in` is in ticks.
    fn throttled(&self, player: PlayerId, retry_in: u32);
    /// Fresh stats snapshot after an accrual tick, for pinned-status
    /// refreshes.
    fn status(&self, player: PlayerId, stats: &PlayerStats);
}

/// In-memory store backed by a [`DashMap`]. The default for tests and for
/// running without a persistence backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<PlayerId, PlayerRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.records.get(&id).map(|r| r.clone())
    }
}

impl PlayerStore for MemoryStore {
    fn save(&self, record: &PlayerRecord) -> Result<(), StoreError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    fn delete(&self, id: PlayerId) -> Result<(), StoreError> {
        self.records.remove(&id);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let mut records: Vec<_> = self.records.iter().map(|r| r.clone()).collect();
        records.sort_by_key(|r| r.id.0);
        Ok(records)
    }
}

/// Notifier that logs events at debug level and drops them.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl GameNotifier for LogNotifier {
    fn achievement(&self, player: PlayerId, id: AchievementId) {
        debug!(player = player.0, achievement = %id.title(), "achievement granted");
    }

    fn throttled(&self, player: PlayerId, retry_in: u32) {
        debug!(player = player.0, retry_in, "player throttled");
    }

    fn status(&self, player: PlayerId, stats: &PlayerStats) {
        debug!(player = player.0, items = stats.items.len(), "status refresh");
    }
}
