//! Shared test helpers for the integration scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use typer_core::achievements::AchievementId;
use typer_core::catalog::ItemId;
use typer_core::commands::ShopToken;
use typer_core::error::StoreError;
use typer_core::ledger::PlayerLedger;
use typer_core::record::PlayerRecord;
use typer_core::types::{Amount, PlayerId};
use typer_engine::{Game, GameConfig, GameNotifier, MemoryStore, PlayerStats, PlayerStore};

pub const ALICE: PlayerId = PlayerId(1);
pub const BOB: PlayerId = PlayerId(2);

/// Notifier that records every outbound event for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub achievements: Mutex<Vec<(PlayerId, AchievementId)>>,
    pub throttles: Mutex<Vec<(PlayerId, u32)>>,
    pub statuses: Mutex<Vec<(PlayerId, PlayerStats)>>,
}

impl RecordingNotifier {
    pub fn has_achievement(&self, player: PlayerId, id: AchievementId) -> bool {
        self.achievements
            .lock()
            .iter()
            .any(|&(p, a)| p == player && a == id)
    }

    pub fn throttle_count(&self, player: PlayerId) -> usize {
        self.throttles.lock().iter().filter(|&&(p, _)| p == player).count()
    }

    pub fn status_count(&self, player: PlayerId) -> usize {
        self.statuses.lock().iter().filter(|&&(p, _)| p == player).count()
    }
}

impl GameNotifier for RecordingNotifier {
    fn achievement(&self, player: PlayerId, id: AchievementId) {
        self.achievements.lock().push((player, id));
    }

    fn throttled(&self, player: PlayerId, retry_in: u32) {
        self.throttles.lock().push((player, retry_in));
    }

    fn status(&self, player: PlayerId, stats: &PlayerStats) {
        self.statuses.lock().push((player, stats.clone()));
    }
}

/// Store wrapper whose saves can be made to fail on demand, for exercising
/// the flush-retry path.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.inner.get(id)
    }
}

impl PlayerStore for FlakyStore {
    fn save(&self, record: &PlayerRecord) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated outage".to_string()));
        }
        self.inner.save(record)
    }

    fn delete(&self, id: PlayerId) -> Result<(), StoreError> {
        self.inner.delete(id)
    }

    fn load_all(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        self.inner.load_all()
    }
}

pub struct Harness {
    pub game: Arc<Game>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness() -> Harness {
    harness_with(GameConfig::default())
}

pub fn harness_with(config: GameConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let game = Game::new(config, store.clone(), notifier.clone());
    Harness {
        game,
        store,
        notifier,
    }
}

/// Parse a shop token literal, panicking on typos in the test itself.
pub fn token(raw: &str) -> ShopToken {
    raw.parse().unwrap()
}

/// Build a stored record with the given whole-unit balances. Every item
/// with a balance is unlocked (owning implies unlocked, as in real play)
/// and further unlocks are evaluated from the totals. Saving this and
/// calling `resume_all` is the supported way to drop a mid-game player into
/// a fresh engine.
pub fn seeded_record(id: PlayerId, name: &str, balances: &[(ItemId, u64)]) -> PlayerRecord {
    let mut ledger = PlayerLedger::new();
    for &(item, units) in balances {
        ledger.credit(item, Amount::from_units(units));
        if units > 0 {
            ledger.unlock(item);
        }
    }
    typer_core::unlock::evaluate(&mut ledger);
    PlayerRecord::capture(id, name, None, &ledger, false, false)
}

/// Seed the store with a record and resume it into a running session.
pub fn resume_seeded(harness: &Harness, record: &PlayerRecord) {
    harness.store.save(record).unwrap();
    harness.game.resume_all().unwrap();
}

/// Quantity of an item from a stats snapshot, in whole units.
pub fn units(stats: &PlayerStats, item: ItemId) -> u64 {
    stats.items[item.index()].quantity.units()
}
