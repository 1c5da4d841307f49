//! Achievement identifiers and milestone detection.
//!
//! Two families: milestone achievements (power-of-ten crossings in the
//! current quantity or lifetime total of an item) and event achievements
//! (unlocks, the game start, a trigger phrase, hitting the cap). Granting is
//! idempotent; newly granted ids are buffered by the caller until the next
//! flush.

use crate::catalog::ItemId;
use crate::constants::{MILESTONE_MAX, MILESTONE_MIN};
use crate::ledger::PlayerLedger;

/// Chat message that grants [`AchievementId::OtterFriend`].
pub const TRIGGER_PHRASE: &str = "J'aime les loutres";

/// Which counter a milestone watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gauge {
    Quantity,
    Total,
}

/// A grantable achievement.
///
/// Every variant has a stable `u16` code for the persisted comma-separated
/// list; see [`AchievementId::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AchievementId {
    /// First `new_game`.
    GameStarted,
    /// Sent the trigger phrase in chat.
    OtterFriend,
    /// An item became purchasable.
    ItemUnlocked(ItemId),
    /// A counter saturated at the cap.
    CapReached(ItemId),
    /// Crossed `10^power` on a counter, `power` in `1..=7`.
    Milestone { item: ItemId, gauge: Gauge, power: u8 },
}

/// Medal tiers, presentation-ordered from rarest down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Star,
    Special,
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn symbol(self) -> &'static str {
        match self {
            Medal::Star => "🎖",
            Medal::Special => "🏅",
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

/// Code layout: low codes for events, `0x10 * (item + 1) + power` for
/// quantity milestones, the `0x80` bit marking total milestones.
const MILESTONE_BASE: u16 = 0x10;
const TOTAL_BIT: u16 = 0x80;

impl AchievementId {
    /// Stable persistence code.
    pub fn code(self) -> u16 {
        match self {
            AchievementId::GameStarted => 0x01,
            AchievementId::ItemUnlocked(item) => 0x02 + item.index() as u16,
            AchievementId::OtterFriend => 0x07,
            AchievementId::CapReached(item) => 0x08 + item.index() as u16,
            AchievementId::Milestone { item, gauge, power } => {
                let base = MILESTONE_BASE * (item.index() as u16 + 1) + power as u16;
                match gauge {
                    Gauge::Quantity => base,
                    Gauge::Total => base | TOTAL_BIT,
                }
            }
        }
    }

    /// Inverse of [`code`](Self::code). `None` for unknown or malformed
    /// codes, which restore leniently skips.
    pub fn from_code(code: u16) -> Option<AchievementId> {
        match code {
            0x01 => Some(AchievementId::GameStarted),
            0x02..=0x06 => Some(AchievementId::ItemUnlocked(
                ItemId::ALL[(code - 0x02) as usize],
            )),
            0x07 => Some(AchievementId::OtterFriend),
            0x08..=0x0C => Some(AchievementId::CapReached(
                ItemId::ALL[(code - 0x08) as usize],
            )),
            _ => {
                let gauge = if code & TOTAL_BIT != 0 {
                    Gauge::Total
                } else {
                    Gauge::Quantity
                };
                let code = code & !TOTAL_BIT;
                let item_idx = (code / MILESTONE_BASE) as usize;
                let power = (code % MILESTONE_BASE) as u8;
                if !(1..=ItemId::COUNT).contains(&item_idx) {
                    return None;
                }
                if u64::from(power) > MILESTONE_MAX.ilog10() as u64 || power == 0 {
                    return None;
                }
                Some(AchievementId::Milestone {
                    item: ItemId::ALL[item_idx - 1],
                    gauge,
                    power,
                })
            }
        }
    }

    pub fn medal(self) -> Medal {
        match self {
            AchievementId::GameStarted => Medal::Special,
            AchievementId::OtterFriend => Medal::Star,
            AchievementId::ItemUnlocked(_) => Medal::Bronze,
            AchievementId::CapReached(_) => Medal::Gold,
            AchievementId::Milestone { power, .. } => match power {
                0..=2 => Medal::Bronze,
                3..=5 => Medal::Silver,
                _ => Medal::Gold,
            },
        }
    }

    pub fn title(self) -> String {
        match self {
            AchievementId::GameStarted => "Ready to Type".to_string(),
            AchievementId::OtterFriend => "Otter Friend".to_string(),
            AchievementId::ItemUnlocked(item) => format!("Unlocked {item}"),
            AchievementId::CapReached(item) => format!("All the {item} in the world"),
            AchievementId::Milestone { item, gauge, power } => {
                let threshold = 10u64.pow(power as u32);
                match gauge {
                    Gauge::Quantity => format!("{threshold} {item}"),
                    Gauge::Total => format!("{threshold} {item} all-time"),
                }
            }
        }
    }
}

/// Largest power-of-ten exponent `p` with `10^p <= value`, clamped to the
/// supported milestone range. `None` below [`MILESTONE_MIN`].
fn top_power(value_units: u64) -> Option<u8> {
    if value_units < MILESTONE_MIN {
        return None;
    }
    let power = value_units.min(MILESTONE_MAX).ilog10() as u8;
    Some(power)
}

/// Grant every milestone the given counter value has crossed, walking down
/// by factors of ten so a single large jump grants every intermediate
/// milestone. Returns the newly granted ids.
fn detect_gauge(
    ledger: &mut PlayerLedger,
    item: ItemId,
    gauge: Gauge,
    value_units: u64,
) -> Vec<AchievementId> {
    let mut newly = Vec::new();
    let Some(top) = top_power(value_units) else {
        return newly;
    };
    for power in (1..=top).rev() {
        let id = AchievementId::Milestone { item, gauge, power };
        if ledger.grant(id) {
            newly.push(id);
        }
    }
    newly
}

/// Run milestone detection over both counters of an item. Idempotent:
/// already granted ids never reappear.
pub fn detect(ledger: &mut PlayerLedger, item: ItemId) -> Vec<AchievementId> {
    let quantity = ledger.quantity(item).units();
    let total = ledger.total(item).units();
    let mut newly = detect_gauge(ledger, item, Gauge::Quantity, quantity);
    newly.extend(detect_gauge(ledger, item, Gauge::Total, total));
    newly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Amount;

    #[test]
    fn codes_round_trip() {
        let mut ids = vec![
            AchievementId::GameStarted,
            AchievementId::OtterFriend,
        ];
        for item in ItemId::ALL {
            ids.push(AchievementId::ItemUnlocked(item));
            ids.push(AchievementId::CapReached(item));
            for gauge in [Gauge::Quantity, Gauge::Total] {
                for power in 1..=7 {
                    ids.push(AchievementId::Milestone { item, gauge, power });
                }
            }
        }
        for id in ids {
            assert_eq!(AchievementId::from_code(id.code()), Some(id), "{id:?}");
        }
    }

    #[test]
    fn codes_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for item in ItemId::ALL {
            assert!(seen.insert(AchievementId::ItemUnlocked(item).code()));
            assert!(seen.insert(AchievementId::CapReached(item).code()));
            for gauge in [Gauge::Quantity, Gauge::Total] {
                for power in 1..=7 {
                    assert!(seen.insert(
                        AchievementId::Milestone { item, gauge, power }.code()
                    ));
                }
            }
        }
        assert!(seen.insert(AchievementId::GameStarted.code()));
        assert!(seen.insert(AchievementId::OtterFriend.code()));
    }

    #[test]
    fn garbage_codes_rejected() {
        for code in [0x00, 0x0D, 0x0F, 0x10, 0x18, 0x60, 0x90, 0xFFFF] {
            assert_eq!(AchievementId::from_code(code), None, "code {code:#x}");
        }
    }

    #[test]
    fn no_milestone_below_ten() {
        assert_eq!(top_power(0), None);
        assert_eq!(top_power(9), None);
        assert_eq!(top_power(10), Some(1));
    }

    #[test]
    fn top_power_clamped_at_bound() {
        assert_eq!(top_power(u64::MAX), Some(7));
        assert_eq!(top_power(MILESTONE_MAX), Some(7));
    }

    #[test]
    fn big_jump_grants_every_intermediate() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(15_000));
        let newly = detect(&mut ledger, ItemId::Messages);

        for power in 1..=4 {
            for gauge in [Gauge::Quantity, Gauge::Total] {
                let id = AchievementId::Milestone {
                    item: ItemId::Messages,
                    gauge,
                    power,
                };
                assert!(newly.contains(&id), "missing {id:?}");
            }
        }
        // 100k not crossed.
        assert!(!newly.iter().any(|id| matches!(
            id,
            AchievementId::Milestone { power: 5, .. }
        )));
    }

    #[test]
    fn detection_is_idempotent() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(150));
        let first = detect(&mut ledger, ItemId::Messages);
        assert!(!first.is_empty());
        assert!(detect(&mut ledger, ItemId::Messages).is_empty());
    }

    #[test]
    fn quantity_and_total_tracked_separately() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(100));
        ledger
            .debit(ItemId::Messages, Amount::from_units(95))
            .unwrap();
        // Quantity back to 5, total stays at 100.
        let newly = detect(&mut ledger, ItemId::Messages);
        assert!(newly.contains(&AchievementId::Milestone {
            item: ItemId::Messages,
            gauge: Gauge::Total,
            power: 2,
        }));
        assert!(!newly.iter().any(|id| matches!(
            id,
            AchievementId::Milestone { gauge: Gauge::Quantity, .. }
        )));
    }
}
