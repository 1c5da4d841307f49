//! Pure trade planning and settlement.
//!
//! A shop token resolves into a [`TradePlan`] — the exact multi-currency
//! debits and credits — against a snapshot of the ledger, then settles
//! all-or-nothing. Settlement re-derives unlocks and achievements and
//! returns everything in a [`TradeReceipt`]; no transport I/O happens here.

use crate::achievements::{self, AchievementId};
use crate::catalog::{self, ItemId};
use crate::error::TradeError;
use crate::ledger::PlayerLedger;
use crate::pricing;
use crate::types::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

/// Requested batch size: an explicit unit count or the "as many as
/// possible" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeQuantity {
    Exact(u64),
    Max,
}

/// A fully resolved trade: validated against a ledger snapshot, ready to
/// settle atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePlan {
    pub item: ItemId,
    pub action: TradeAction,
    /// Resolved batch size in whole units.
    pub quantity: u64,
    pub debits: Vec<(ItemId, Amount)>,
    pub credits: Vec<(ItemId, Amount)>,
}

/// State changes derived after a ledger mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationEffects {
    pub unlocked: Vec<ItemId>,
    pub achievements: Vec<AchievementId>,
}

/// Outcome of a settled trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub plan: TradePlan,
    pub effects: MutationEffects,
}

/// Resolve a buy/sell request against the current ledger state.
///
/// Affordability is validated for every currency here, before any mutation;
/// `Max` resolves to the minimum affordable quantity across currencies
/// (buy) or the full held quantity (sell).
pub fn plan(
    ledger: &PlayerLedger,
    item: ItemId,
    action: TradeAction,
    quantity: TradeQuantity,
) -> Result<TradePlan, TradeError> {
    let def = catalog::item(item);
    if def.base_price.is_empty() {
        return Err(TradeError::NotForSale(item));
    }

    match action {
        TradeAction::Buy => {
            if !ledger.is_unlocked(item) {
                return Err(TradeError::ItemLocked(item));
            }
            let owned = ledger.quantity(item).units();
            let quantity = match quantity {
                TradeQuantity::Exact(0) => return Err(TradeError::ZeroQuantity),
                TradeQuantity::Exact(n) => n,
                TradeQuantity::Max => {
                    let max = def
                        .base_price
                        .iter()
                        .map(|&(currency, base)| {
                            pricing::max_affordable(base, owned, ledger.quantity(currency))
                        })
                        .min()
                        .unwrap_or(0);
                    if max == 0 {
                        return Err(TradeError::CannotAffordAny(item));
                    }
                    max
                }
            };

            let mut debits = Vec::with_capacity(def.base_price.len());
            for &(currency, base) in def.base_price {
                let price = pricing::price_for_n(base, owned, quantity);
                let have = ledger.quantity(currency);
                if have < price {
                    return Err(TradeError::Insufficient {
                        currency,
                        have,
                        need: price,
                    });
                }
                debits.push((currency, price));
            }
            Ok(TradePlan {
                item,
                action,
                quantity,
                debits,
                credits: vec![(item, Amount::from_units(quantity))],
            })
        }
        TradeAction::Sell => {
            let owned = ledger.quantity(item).units();
            if owned == 0 {
                return Err(TradeError::NothingToSell(item));
            }
            let quantity = match quantity {
                TradeQuantity::Exact(0) => return Err(TradeError::ZeroQuantity),
                TradeQuantity::Exact(n) if n > owned => {
                    return Err(TradeError::Insufficient {
                        currency: item,
                        have: ledger.quantity(item),
                        need: Amount::from_units(n),
                    });
                }
                TradeQuantity::Exact(n) => n,
                TradeQuantity::Max => owned,
            };

            // Sale proceeds count toward the currency's lifetime total,
            // same as any other acquisition.
            let credits = def
                .base_price
                .iter()
                .map(|&(currency, base)| (currency, pricing::sale_value(base, owned, quantity)))
                .collect();
            Ok(TradePlan {
                item,
                action,
                quantity,
                debits: vec![(item, Amount::from_units(quantity))],
                credits,
            })
        }
    }
}

/// Re-derive unlocks and achievements after a ledger mutation.
///
/// `touched` lists the items whose counters may have changed; `capped`
/// those that clamped at the cap this mutation.
pub fn after_mutation(
    ledger: &mut PlayerLedger,
    touched: &[ItemId],
    capped: &[ItemId],
) -> MutationEffects {
    let unlocked = crate::unlock::evaluate(ledger);

    let mut newly = Vec::new();
    for &item in capped {
        let id = AchievementId::CapReached(item);
        if ledger.grant(id) {
            newly.push(id);
        }
    }
    for &item in touched {
        newly.extend(achievements::detect(ledger, item));
    }
    for &item in &unlocked {
        let id = AchievementId::ItemUnlocked(item);
        if ledger.grant(id) {
            newly.push(id);
        }
    }

    MutationEffects {
        unlocked,
        achievements: newly,
    }
}

/// Settle a plan atomically and run the post-mutation pipeline.
pub fn settle(ledger: &mut PlayerLedger, plan: TradePlan) -> Result<TradeReceipt, TradeError> {
    let capped = ledger.apply(&plan.debits, &plan.credits)?;

    let mut touched: Vec<ItemId> = plan
        .debits
        .iter()
        .chain(plan.credits.iter())
        .map(|&(item, _)| item)
        .collect();
    touched.sort();
    touched.dedup();

    let effects = after_mutation(ledger, &touched, &capped);
    Ok(TradeReceipt { plan, effects })
}
