//! The game orchestrator.
//!
//! [`Game`] owns the session registry and wires the pure core to its
//! collaborators: every interactive entry point locks the player's session,
//! passes the cooldown gate, mutates the ledger through the core, then
//! flushes the record to the store and drains buffered achievements to the
//! notifier. The accrual path ([`Game::tick`]) runs on the scheduler tasks
//! and takes the same lock, so ticks and trades serialize per player.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, warn};

use typer_core::achievements::{AchievementId, TRIGGER_PHRASE};
use typer_core::catalog::{self, ItemId, UpgradeId};
use typer_core::commands::ShopToken;
use typer_core::constants::{
    CHAT_REWARD_UNITS, COOLDOWN_ACTION_LIMIT, COOLDOWN_PENALTY_TICKS, RATE_PRECISION, SUB_CENTI,
    TICK_INTERVAL_SECS,
};
use typer_core::error::{GameError, StoreError, UpgradeError};
use typer_core::trade::{self, TradeReceipt};
use typer_core::types::{Amount, PlayerId};

use crate::cooldown::{Admission, Cooldown};
use crate::scheduler::AccrualScheduler;
use crate::session::{PlayerSession, SharedSession};
use crate::traits::{GameNotifier, LogNotifier, MemoryStore, PlayerStore};

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Accrual tick interval.
    pub tick_interval: Duration,
    /// Interactive actions admitted before a cooldown episode starts.
    pub cooldown_limit: u32,
    /// Cooldown episode length, in ticks.
    pub cooldown_penalty_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(TICK_INTERVAL_SECS),
            cooldown_limit: COOLDOWN_ACTION_LIMIT,
            cooldown_penalty_ticks: COOLDOWN_PENALTY_TICKS,
        }
    }
}

/// Stats snapshot for one catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStats {
    pub id: ItemId,
    pub quantity: Amount,
    pub total: Amount,
    pub unlocked: bool,
    /// Effective per-tick yields after upgrades, `RATE_PRECISION`-scaled,
    /// per produced currency.
    pub rates: Vec<(ItemId, u64)>,
}

/// Full stats snapshot for one player, taken under the session lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub display_name: String,
    pub pinned_message: Option<i64>,
    pub items: Vec<ItemStats>,
    /// Acquired upgrades in acquisition order.
    pub upgrades: Vec<UpgradeId>,
    pub upgrades_visible: bool,
    pub tools_visible: bool,
    pub throttled: bool,
    pub retry_in: u32,
}

pub struct Game {
    pub(crate) config: GameConfig,
    sessions: DashMap<PlayerId, SharedSession>,
    scheduler: AccrualScheduler,
    store: Arc<dyn PlayerStore>,
    notifier: Arc<dyn GameNotifier>,
}

impl Game {
    pub fn new(
        config: GameConfig,
        store: Arc<dyn PlayerStore>,
        notifier: Arc<dyn GameNotifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            sessions: DashMap::new(),
            scheduler: AccrualScheduler::new(),
            store,
            notifier,
        })
    }

    /// Fully in-process instance: memory store, log notifier.
    pub fn in_memory() -> Arc<Self> {
        Self::new(
            GameConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier),
        )
    }

    // --- lifecycle ---

    /// Start a fresh game for a player, wiping any previous state, and spawn
    /// their accrual task.
    pub fn new_game(
        self: &Arc<Self>,
        player: PlayerId,
        display_name: &str,
    ) -> Result<PlayerStats, GameError> {
        let session = self
            .sessions
            .entry(player)
            .or_insert_with(|| Arc::new(Mutex::new(PlayerSession::new(player, display_name))))
            .clone();
        let stats = {
            let mut s = session.lock();
            s.reset();
            s.display_name = display_name.to_string();
            s.cooldown = Cooldown::new(self.config.cooldown_limit, self.config.cooldown_penalty_ticks);
            if s.ledger.grant(AchievementId::GameStarted) {
                s.pending.push(AchievementId::GameStarted);
            }
            self.flush(&mut s);
            self.stats_of(&s)
        };
        self.scheduler.start(player, self.clone());
        info!(player = player.0, "game started");
        Ok(stats)
    }

    /// Rebuild sessions from the store and restart their accrual tasks.
    /// Returns the number of resumed games.
    pub fn resume_all(self: &Arc<Self>) -> Result<usize, StoreError> {
        let records = self.store.load_all()?;
        let resumed = records.len();
        for record in &records {
            let mut session = PlayerSession::from_record(record);
            session.cooldown =
                Cooldown::new(self.config.cooldown_limit, self.config.cooldown_penalty_ticks);
            self.sessions
                .insert(record.id, Arc::new(Mutex::new(session)));
            self.scheduler.start(record.id, self.clone());
        }
        info!(resumed, "resumed stored games");
        Ok(resumed)
    }

    /// Stop a player's game and erase their stored record.
    pub fn stop_game(&self, player: PlayerId) -> Result<(), GameError> {
        self.scheduler.stop(player);
        if self.sessions.remove(&player).is_none() {
            return Err(GameError::UnknownPlayer(player));
        }
        self.store.delete(player)?;
        info!(player = player.0, "game stopped");
        Ok(())
    }

    /// Flush every session and abort the accrual tasks. Call before process
    /// exit; sessions stay resumable via [`resume_all`](Self::resume_all).
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        for entry in self.sessions.iter() {
            let mut s = entry.value().lock();
            self.flush(&mut s);
        }
        info!(sessions = self.sessions.len(), "engine shut down");
    }

    pub fn is_running(&self, player: PlayerId) -> bool {
        self.sessions.contains_key(&player)
    }

    pub fn active_tasks(&self) -> usize {
        self.scheduler.active()
    }

    // --- interactive operations ---

    /// Count a chat message: the activity reward lands with the next accrual
    /// tick, and the trigger phrase grants its achievement.
    pub fn record_activity(&self, player: PlayerId, text: &str) -> Result<(), GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        self.admit(&mut s)?;
        s.chat_reward += CHAT_REWARD_UNITS;
        if text.trim() == TRIGGER_PHRASE && s.ledger.grant(AchievementId::OtterFriend) {
            s.pending.push(AchievementId::OtterFriend);
            self.flush(&mut s);
        }
        Ok(())
    }

    /// Execute a shop token: plan against the ledger snapshot, settle
    /// atomically, persist, notify.
    pub fn trade(&self, player: PlayerId, token: ShopToken) -> Result<TradeReceipt, GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        self.admit(&mut s)?;
        let plan = trade::plan(&s.ledger, token.item, token.action, token.quantity)?;
        let receipt = trade::settle(&mut s.ledger, plan)?;
        s.pending.extend(receipt.effects.achievements.iter().copied());
        self.flush(&mut s);
        Ok(receipt)
    }

    /// Purchase a yield upgrade at its flat cost.
    pub fn buy_upgrade(&self, player: PlayerId, id: UpgradeId) -> Result<(), GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        self.admit(&mut s)?;

        let def = id.def();
        if s.ledger.has_upgrade(id) {
            return Err(UpgradeError::AlreadyAcquired(id).into());
        }
        if s.ledger.quantity(def.item).units() < def.requires_quantity {
            return Err(UpgradeError::Prerequisite {
                id,
                item: def.item,
                required: def.requires_quantity,
            }
            .into());
        }
        let debits: Vec<_> = def
            .cost
            .iter()
            .map(|&(currency, units)| (currency, Amount::from_units(units)))
            .collect();
        s.ledger
            .apply(&debits, &[])
            .map_err(UpgradeError::Payment)?;
        s.ledger.add_upgrade(id);
        self.flush(&mut s);
        info!(player = player.0, upgrade = %id, "upgrade acquired");
        Ok(())
    }

    /// Current stats snapshot. Counts as an interactive action.
    pub fn stats(&self, player: PlayerId) -> Result<PlayerStats, GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        self.admit(&mut s)?;
        Ok(self.stats_of(&s))
    }

    /// Granted achievements, in code order. Counts as an interactive action.
    pub fn achievements(&self, player: PlayerId) -> Result<Vec<AchievementId>, GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        self.admit(&mut s)?;
        Ok(s.ledger.achievements().collect())
    }

    // --- presentation state ---

    pub fn set_pinned_message(
        &self,
        player: PlayerId,
        message: Option<i64>,
    ) -> Result<(), GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        s.pinned_message = message;
        self.flush(&mut s);
        Ok(())
    }

    pub fn set_panels(
        &self,
        player: PlayerId,
        upgrades_visible: bool,
        tools_visible: bool,
    ) -> Result<(), GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        s.upgrades_visible = upgrades_visible;
        s.tools_visible = tools_visible;
        self.flush(&mut s);
        Ok(())
    }

    /// Force a persistence retry for a player, bypassing the cooldown gate.
    pub fn reflush(&self, player: PlayerId) -> Result<(), GameError> {
        let session = self.session(player)?;
        let mut s = session.lock();
        let record = s.capture();
        self.store.save(&record)?;
        s.last_record = Some(record);
        Ok(())
    }

    // --- accrual ---

    /// One accrual tick for a player, driven by the scheduler task. Returns
    /// `false` when the session is gone and the task should exit.
    ///
    /// While a cooldown episode runs, accrual is paused and the tick only
    /// counts the penalty down. Otherwise every unlocked item yields into a
    /// `RATE_PRECISION`-scaled carry; whole centis are drained into the
    /// ledger and the sub-centi remainder persists, so fractional yields are
    /// never lost to rounding.
    pub fn tick(&self, player: PlayerId) -> bool {
        let Some(session) = self.sessions.get(&player).map(|s| s.clone()) else {
            return false;
        };
        let mut s = session.lock();

        if s.cooldown.is_throttled() {
            if s.cooldown.tick() {
                info!(player = player.0, "cooldown ended, accrual resumed");
            }
            return true;
        }

        let mut deltas = [0u128; ItemId::COUNT];
        for item in ItemId::ALL {
            if !s.ledger.is_unlocked(item) {
                continue;
            }
            let owned = s.ledger.quantity(item).units();
            if owned == 0 {
                continue;
            }
            for &(currency, rate_fp) in catalog::item(item).yields {
                let rate_fp = catalog::upgraded_rate(item, s.ledger.upgrades(), rate_fp);
                deltas[currency.index()] += u128::from(rate_fp) * u128::from(owned);
            }
        }
        if s.chat_reward > 0 {
            deltas[ItemId::Messages.index()] +=
                u128::from(s.chat_reward) * u128::from(RATE_PRECISION);
            s.chat_reward = 0;
        }

        let mut touched = Vec::new();
        let mut capped = Vec::new();
        for (idx, &item) in ItemId::ALL.iter().enumerate() {
            let carry = s.carry[idx] + deltas[idx];
            let centis = carry / u128::from(SUB_CENTI);
            s.carry[idx] = carry % u128::from(SUB_CENTI);
            if centis == 0 {
                continue;
            }
            // `from_raw` clamps at the cap, matching the ledger's saturation.
            let amount = Amount::from_raw(u64::try_from(centis).unwrap_or(u64::MAX));
            let outcome = s.ledger.credit(item, amount);
            touched.push(item);
            if outcome.capped {
                capped.push(item);
            }
        }
        if touched.is_empty() {
            return true;
        }

        let effects = trade::after_mutation(&mut s.ledger, &touched, &capped);
        s.pending.extend(effects.achievements);
        self.flush(&mut s);
        self.notifier.status(player, &self.stats_of(&s));
        true
    }

    // --- internals ---

    fn session(&self, player: PlayerId) -> Result<SharedSession, GameError> {
        self.sessions
            .get(&player)
            .map(|s| s.clone())
            .ok_or(GameError::UnknownPlayer(player))
    }

    /// Cooldown gate for interactive actions. The first rejection of an
    /// episode goes out through the notifier.
    fn admit(&self, s: &mut PlayerSession) -> Result<(), GameError> {
        match s.cooldown.admit() {
            Admission::Accepted => Ok(()),
            Admission::Rejected { retry_in, first } => {
                if first {
                    self.notifier.throttled(s.id, retry_in);
                }
                Err(GameError::Throttled { retry_in })
            }
        }
    }

    /// Persist the session and drain buffered achievements to the notifier.
    /// A store failure is logged and retried on the next flush; the
    /// in-memory session stays authoritative.
    fn flush(&self, s: &mut PlayerSession) {
        let record = s.capture();
        match self.store.save(&record) {
            Ok(()) => s.last_record = Some(record),
            Err(err) => warn!(player = s.id.0, %err, "record flush failed"),
        }
        for id in s.pending.drain(..) {
            self.notifier.achievement(s.id, id);
        }
    }

    fn stats_of(&self, s: &PlayerSession) -> PlayerStats {
        let items = ItemId::ALL
            .iter()
            .map(|&item| {
                let slot = s.ledger.slot(item);
                let rates = catalog::item(item)
                    .yields
                    .iter()
                    .map(|&(currency, rate_fp)| {
                        (
                            currency,
                            catalog::upgraded_rate(item, s.ledger.upgrades(), rate_fp),
                        )
                    })
                    .collect();
                ItemStats {
                    id: item,
                    quantity: slot.quantity,
                    total: slot.total,
                    unlocked: s.ledger.is_unlocked(item),
                    rates,
                }
            })
            .collect();
        PlayerStats {
            player: s.id,
            display_name: s.display_name.clone(),
            pinned_message: s.pinned_message,
            items,
            upgrades: s.ledger.upgrades().to_vec(),
            upgrades_visible: s.upgrades_visible,
            tools_visible: s.tools_visible,
            throttled: s.cooldown.is_throttled(),
            retry_in: s.cooldown.retry_in(),
        }
    }
}
