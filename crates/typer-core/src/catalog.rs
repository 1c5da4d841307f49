//! Static item and upgrade catalog.
//!
//! The catalog is process-wide, read-only data: it never changes at run
//! time, so definitions are `'static` tables indexed by [`ItemId`].
//! Thresholds and prices are in whole units; yield rates are
//! [`RATE_PRECISION`]-scaled per unit per tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::RATE_PRECISION;

/// A tradeable resource type.
///
/// `Messages` is the base item: unlocked from the start, not purchasable,
/// and the currency everything else is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Messages,
    Contacts,
    Groups,
    Channels,
    Supergroups,
}

impl ItemId {
    pub const COUNT: usize = 5;

    /// All items in catalog order.
    pub const ALL: [ItemId; Self::COUNT] = [
        ItemId::Messages,
        ItemId::Contacts,
        ItemId::Groups,
        ItemId::Channels,
        ItemId::Supergroups,
    ];

    /// Slot index for per-item arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-character id used in shop tokens and persisted lists.
    pub fn code(self) -> char {
        match self {
            ItemId::Messages => 'm',
            ItemId::Contacts => 'c',
            ItemId::Groups => 'g',
            ItemId::Channels => 'h',
            ItemId::Supergroups => 's',
        }
    }

    pub fn from_code(code: char) -> Option<ItemId> {
        Self::ALL.into_iter().find(|item| item.code() == code)
    }

    /// Display symbol for the presentation layer.
    pub fn symbol(self) -> &'static str {
        match self {
            ItemId::Messages => "💬",
            ItemId::Contacts => "📇",
            ItemId::Groups => "👥",
            ItemId::Channels => "📰",
            ItemId::Supergroups => "👥",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemId::Messages => "messages",
            ItemId::Contacts => "contacts",
            ItemId::Groups => "groups",
            ItemId::Channels => "channels",
            ItemId::Supergroups => "supergroups",
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable definition of a catalog item.
pub struct ItemDef {
    pub id: ItemId,
    /// Lifetime-total thresholds gating the unlock, whole units. Empty for
    /// the base item.
    pub unlock_at: &'static [(ItemId, u64)],
    /// Acquisition base price per currency, whole units. Empty for the base
    /// item, which cannot be traded.
    pub base_price: &'static [(ItemId, u64)],
    /// Passive yield per owned unit per tick, `RATE_PRECISION`-scaled.
    pub yields: &'static [(ItemId, u64)],
}

/// `RATE_PRECISION`-scaled rate from a fractional literal.
const fn rate(numer: u64, denom: u64) -> u64 {
    RATE_PRECISION / denom * numer
}

pub const CATALOG: [ItemDef; ItemId::COUNT] = [
    ItemDef {
        id: ItemId::Messages,
        unlock_at: &[],
        base_price: &[],
        yields: &[],
    },
    ItemDef {
        id: ItemId::Contacts,
        unlock_at: &[(ItemId::Messages, 10)],
        base_price: &[(ItemId::Messages, 10)],
        yields: &[
            (ItemId::Messages, rate(2, 100)),
            (ItemId::Contacts, rate(1, 100_000)),
        ],
    },
    ItemDef {
        id: ItemId::Groups,
        unlock_at: &[(ItemId::Messages, 100), (ItemId::Contacts, 4)],
        base_price: &[(ItemId::Messages, 100), (ItemId::Contacts, 4)],
        yields: &[
            (ItemId::Messages, rate(2, 10)),
            (ItemId::Contacts, rate(1, 10_000)),
        ],
    },
    ItemDef {
        id: ItemId::Channels,
        unlock_at: &[(ItemId::Messages, 1000), (ItemId::Contacts, 16)],
        base_price: &[(ItemId::Messages, 1000), (ItemId::Contacts, 16)],
        yields: &[
            (ItemId::Messages, rate(2, 1)),
            (ItemId::Contacts, rate(1, 1000)),
        ],
    },
    ItemDef {
        id: ItemId::Supergroups,
        unlock_at: &[
            (ItemId::Messages, 10_000),
            (ItemId::Contacts, 256),
            (ItemId::Groups, 1),
        ],
        base_price: &[
            (ItemId::Messages, 10_000),
            (ItemId::Contacts, 256),
            (ItemId::Groups, 1),
        ],
        yields: &[
            (ItemId::Messages, rate(20, 1)),
            (ItemId::Contacts, rate(1, 100)),
        ],
    },
];

/// Definition lookup by item id.
pub fn item(id: ItemId) -> &'static ItemDef {
    &CATALOG[id.index()]
}

/// A composable, serializable yield modifier.
///
/// Effects are plain descriptors rather than closures so acquired upgrades
/// can be persisted and tested in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// Multiply the yield rate by a whole factor.
    Multiply(u64),
}

impl UpgradeEffect {
    pub fn apply(self, rate_fp: u64) -> u64 {
        match self {
            UpgradeEffect::Multiply(factor) => rate_fp.saturating_mul(factor),
        }
    }
}

/// Purchasable yield upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    ContactSync,
    GroupAdmin,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 2] = [UpgradeId::ContactSync, UpgradeId::GroupAdmin];

    /// Stable code used in persisted comma-separated lists.
    pub fn code(self) -> u8 {
        match self {
            UpgradeId::ContactSync => 1,
            UpgradeId::GroupAdmin => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<UpgradeId> {
        Self::ALL.into_iter().find(|u| u.code() == code)
    }

    pub fn def(self) -> &'static UpgradeDef {
        match self {
            UpgradeId::ContactSync => &UPGRADE_CONTACT_SYNC,
            UpgradeId::GroupAdmin => &UPGRADE_GROUP_ADMIN,
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().title)
    }
}

/// Immutable definition of an upgrade.
pub struct UpgradeDef {
    pub id: UpgradeId,
    /// The item whose yields the upgrade enhances.
    pub item: ItemId,
    /// Minimum *current* quantity of the owning item, whole units.
    pub requires_quantity: u64,
    /// Acquisition cost per currency, whole units.
    pub cost: &'static [(ItemId, u64)],
    /// Applied to every yield rate of the owning item, in acquisition order.
    pub effects: &'static [UpgradeEffect],
    pub title: &'static str,
}

static UPGRADE_CONTACT_SYNC: UpgradeDef = UpgradeDef {
    id: UpgradeId::ContactSync,
    item: ItemId::Contacts,
    requires_quantity: 10,
    cost: &[(ItemId::Messages, 500)],
    effects: &[UpgradeEffect::Multiply(2)],
    title: "Contact Sync",
};

static UPGRADE_GROUP_ADMIN: UpgradeDef = UpgradeDef {
    id: UpgradeId::GroupAdmin,
    item: ItemId::Groups,
    requires_quantity: 5,
    cost: &[(ItemId::Messages, 2000), (ItemId::Contacts, 8)],
    effects: &[UpgradeEffect::Multiply(2)],
    title: "Group Admin",
};

/// Fold the effects of every acquired upgrade owned by `item` onto a base
/// yield rate, in acquisition order.
pub fn upgraded_rate(item: ItemId, owned: &[UpgradeId], base_rate_fp: u64) -> u64 {
    owned
        .iter()
        .filter(|id| id.def().item == item)
        .flat_map(|id| id.def().effects.iter())
        .fold(base_rate_fp, |rate_fp, effect| effect.apply(rate_fp))
}
