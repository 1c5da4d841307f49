//! Per-player session state.
//!
//! Everything a running player owns lives here, behind one `Mutex` so an
//! interactive trade and an accrual tick never interleave their
//! read-modify-write of the ledger. Sessions are created on `new_game` (or
//! restore) and torn down on `stop_game`; there is no lazy creation from
//! unknown ids.

use std::sync::Arc;

use parking_lot::Mutex;

use typer_core::achievements::AchievementId;
use typer_core::catalog::ItemId;
use typer_core::ledger::PlayerLedger;
use typer_core::record::PlayerRecord;
use typer_core::types::PlayerId;

use crate::cooldown::Cooldown;

pub type SharedSession = Arc<Mutex<PlayerSession>>;

#[derive(Debug)]
pub struct PlayerSession {
    pub id: PlayerId,
    pub display_name: String,
    pub pinned_message: Option<i64>,
    pub ledger: PlayerLedger,
    pub cooldown: Cooldown,
    /// Whole message units earned from chat activity, folded into the next
    /// accrual tick.
    pub chat_reward: u64,
    /// Sub-centi accrual remainders per produced currency,
    /// `RATE_PRECISION`-scaled units. Carried across ticks so fractional
    /// yields are never lost.
    pub carry: [u128; ItemId::COUNT],
    /// Achievements granted since the last flush.
    pub pending: Vec<AchievementId>,
    /// Last record handed to the store, for retry-safe re-flushing.
    pub last_record: Option<PlayerRecord>,
    pub upgrades_visible: bool,
    pub tools_visible: bool,
}

impl PlayerSession {
    /// Fresh session for a brand-new (or reset) game.
    pub fn new(id: PlayerId, display_name: &str) -> Self {
        Self {
            id,
            display_name: display_name.to_string(),
            pinned_message: None,
            ledger: PlayerLedger::new(),
            cooldown: Cooldown::default(),
            chat_reward: 0,
            carry: [0; ItemId::COUNT],
            pending: Vec::new(),
            last_record: None,
            upgrades_visible: false,
            tools_visible: false,
        }
    }

    /// Session rebuilt from a persisted record. Cooldown state and accrual
    /// carry are transient and start clean.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.clone(),
            pinned_message: record.pinned_message,
            ledger: record.restore(),
            cooldown: Cooldown::default(),
            chat_reward: 0,
            carry: [0; ItemId::COUNT],
            pending: Vec::new(),
            last_record: Some(record.clone()),
            upgrades_visible: record.upgrades_visible,
            tools_visible: record.tools_visible,
        }
    }

    /// Snapshot the current state into its persisted form.
    pub fn capture(&self) -> PlayerRecord {
        PlayerRecord::capture(
            self.id,
            &self.display_name,
            self.pinned_message,
            &self.ledger,
            self.upgrades_visible,
            self.tools_visible,
        )
    }

    /// Reset economy state in place, keeping identity fields. Used by
    /// `new_game` on an existing player.
    pub fn reset(&mut self) {
        self.ledger = PlayerLedger::new();
        self.cooldown = Cooldown::default();
        self.chat_reward = 0;
        self.carry = [0; ItemId::COUNT];
        self.pending.clear();
        self.last_record = None;
        self.upgrades_visible = false;
        self.tools_visible = false;
    }
}
