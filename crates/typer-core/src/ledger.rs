//! Per-player capped resource counters.
//!
//! Every counter saturates at [`CAP`](crate::constants::CAP) and never goes
//! negative. Lifetime totals are monotonically non-decreasing; unlock flags
//! and granted achievements are one-way.
//!
//! Not thread-safe — the engine wraps each player's ledger in a `Mutex` so a
//! trade and an accrual tick never interleave.

use std::collections::BTreeSet;

use crate::achievements::AchievementId;
use crate::catalog::{ItemId, UpgradeId};
use crate::error::TradeError;
use crate::types::Amount;

/// Counters for a single item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemSlot {
    /// Currently held quantity. Rises and falls with trades.
    pub quantity: Amount,
    /// Cumulative quantity ever acquired. Never decreases.
    pub total: Amount,
}

/// Result of a credit: whether either counter clamped at the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditOutcome {
    pub capped: bool,
}

/// All economy state owned by a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLedger {
    slots: [ItemSlot; ItemId::COUNT],
    unlocked: [bool; ItemId::COUNT],
    /// Acquired upgrades, in acquisition order (effect composition order).
    upgrades: Vec<UpgradeId>,
    granted: BTreeSet<AchievementId>,
}

impl Default for PlayerLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerLedger {
    /// Fresh ledger: everything zero, only the base item unlocked.
    pub fn new() -> Self {
        let mut unlocked = [false; ItemId::COUNT];
        unlocked[ItemId::Messages.index()] = true;
        Self {
            slots: [ItemSlot::default(); ItemId::COUNT],
            unlocked,
            upgrades: Vec::new(),
            granted: BTreeSet::new(),
        }
    }

    pub fn slot(&self, item: ItemId) -> ItemSlot {
        self.slots[item.index()]
    }

    pub fn quantity(&self, item: ItemId) -> Amount {
        self.slots[item.index()].quantity
    }

    pub fn total(&self, item: ItemId) -> Amount {
        self.slots[item.index()].total
    }

    // --- unlocks ---

    pub fn is_unlocked(&self, item: ItemId) -> bool {
        self.unlocked[item.index()]
    }

    /// Flip the unlock flag. Returns `true` if the item was locked before;
    /// the transition is one-way.
    pub fn unlock(&mut self, item: ItemId) -> bool {
        !std::mem::replace(&mut self.unlocked[item.index()], true)
    }

    // --- upgrades ---

    pub fn upgrades(&self) -> &[UpgradeId] {
        &self.upgrades
    }

    pub fn has_upgrade(&self, id: UpgradeId) -> bool {
        self.upgrades.contains(&id)
    }

    /// Append an upgrade in acquisition order. No-op when already owned.
    pub fn add_upgrade(&mut self, id: UpgradeId) {
        if !self.has_upgrade(id) {
            self.upgrades.push(id);
        }
    }

    // --- achievements ---

    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.granted.contains(&id)
    }

    /// Add to the granted set. Returns `true` when newly granted; ids are
    /// never removed.
    pub fn grant(&mut self, id: AchievementId) -> bool {
        self.granted.insert(id)
    }

    pub fn achievements(&self) -> impl Iterator<Item = AchievementId> + '_ {
        self.granted.iter().copied()
    }

    // --- mutation ---

    /// Saturating credit to both quantity and lifetime total.
    pub fn credit(&mut self, item: ItemId, amount: Amount) -> CreditOutcome {
        let slot = &mut self.slots[item.index()];
        slot.quantity = slot.quantity.saturating_add(amount);
        slot.total = slot.total.saturating_add(amount);
        CreditOutcome {
            capped: !amount.is_zero() && (slot.quantity.is_capped() || slot.total.is_capped()),
        }
    }

    /// Debit the current quantity only. Rejected outright when the balance
    /// is insufficient; the lifetime total is untouched.
    pub fn debit(&mut self, item: ItemId, amount: Amount) -> Result<(), TradeError> {
        let slot = &mut self.slots[item.index()];
        match slot.quantity.checked_sub(amount) {
            Some(rest) => {
                slot.quantity = rest;
                Ok(())
            }
            None => Err(TradeError::Insufficient {
                currency: item,
                have: slot.quantity,
                need: amount,
            }),
        }
    }

    /// All-or-nothing settlement of a batch of debits and credits: every
    /// debit is validated before any counter is touched.
    ///
    /// Returns the items whose counters clamped at the cap.
    pub fn apply(
        &mut self,
        debits: &[(ItemId, Amount)],
        credits: &[(ItemId, Amount)],
    ) -> Result<Vec<ItemId>, TradeError> {
        // Validate the summed demand per currency first; debits must not
        // partially apply, including several debits of the same currency.
        let mut needed = [0u128; ItemId::COUNT];
        for &(item, amount) in debits {
            needed[item.index()] += u128::from(amount.raw());
        }
        for (idx, &need) in needed.iter().enumerate() {
            let item = ItemId::ALL[idx];
            let have = self.quantity(item);
            if u128::from(have.raw()) < need {
                return Err(TradeError::Insufficient {
                    currency: item,
                    have,
                    need: Amount::from_raw(u64::try_from(need).unwrap_or(u64::MAX)),
                });
            }
        }

        for &(item, amount) in debits {
            // Validated above; a failure here would be a logic error.
            self.debit(item, amount)?;
        }
        let mut capped = Vec::new();
        for &(item, amount) in credits {
            if self.credit(item, amount).capped {
                capped.push(item);
            }
        }
        Ok(capped)
    }

    /// Restore raw counters from persisted state (no cap signals raised).
    pub fn restore_slot(&mut self, item: ItemId, quantity: Amount, total: Amount) {
        self.slots[item.index()] = ItemSlot { quantity, total };
    }
}
