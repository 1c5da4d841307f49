//! The persisted per-player record.
//!
//! Conceptually one table row per player id. All quantities are
//! string-encoded scaled integers (via [`Amount`]'s serde form) so the
//! storage backend never handles floating point; acquired upgrades and
//! granted achievements travel as comma-separated code lists.

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::catalog::{ItemId, UpgradeId};
use crate::ledger::PlayerLedger;
use crate::types::{Amount, PlayerId};

/// Persisted counters for one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub quantity: Amount,
    pub total: Amount,
    pub unlocked: bool,
    /// Comma-separated [`UpgradeId`] codes, acquisition order.
    pub upgrades: String,
}

/// Persisted state for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub display_name: String,
    /// Message id of the pinned status message, when one exists.
    pub pinned_message: Option<i64>,
    /// One entry per catalog item, in catalog order.
    pub items: Vec<ItemRecord>,
    pub upgrades_visible: bool,
    pub tools_visible: bool,
    /// Comma-separated [`AchievementId`] codes.
    pub achievements: String,
}

impl PlayerRecord {
    /// Snapshot a live ledger into its persisted form.
    pub fn capture(
        id: PlayerId,
        display_name: &str,
        pinned_message: Option<i64>,
        ledger: &PlayerLedger,
        upgrades_visible: bool,
        tools_visible: bool,
    ) -> Self {
        let items = ItemId::ALL
            .iter()
            .map(|&item| {
                let slot = ledger.slot(item);
                let upgrades = ledger
                    .upgrades()
                    .iter()
                    .filter(|u| u.def().item == item)
                    .map(|u| u.code().to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                ItemRecord {
                    quantity: slot.quantity,
                    total: slot.total,
                    unlocked: ledger.is_unlocked(item),
                    upgrades,
                }
            })
            .collect();

        let achievements = ledger
            .achievements()
            .map(|a| a.code().to_string())
            .collect::<Vec<_>>()
            .join(",");

        PlayerRecord {
            id,
            display_name: display_name.to_string(),
            pinned_message,
            items,
            upgrades_visible,
            tools_visible,
            achievements,
        }
    }

    /// Rebuild the ledger from persisted state.
    ///
    /// Lenient on the code lists: unknown upgrade or achievement codes are
    /// skipped rather than failing the whole row, so old rows survive
    /// catalog changes. The base item stays unlocked regardless of the
    /// stored flag.
    pub fn restore(&self) -> PlayerLedger {
        let mut ledger = PlayerLedger::new();
        for (idx, item) in ItemId::ALL.iter().enumerate() {
            let Some(rec) = self.items.get(idx) else {
                break;
            };
            ledger.restore_slot(*item, rec.quantity, rec.total);
            if rec.unlocked {
                ledger.unlock(*item);
            }
            for code in parse_codes(&rec.upgrades) {
                if let Some(upgrade) = u8::try_from(code).ok().and_then(UpgradeId::from_code) {
                    ledger.add_upgrade(upgrade);
                }
            }
        }
        for code in parse_codes(&self.achievements) {
            if let Some(id) = AchievementId::from_code(code) {
                ledger.grant(id);
            }
        }
        ledger
    }
}

fn parse_codes(list: &str) -> impl Iterator<Item = u16> + '_ {
    list.split(',').filter_map(|part| part.trim().parse().ok())
}
