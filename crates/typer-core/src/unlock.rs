//! Unlock dependency evaluator.
//!
//! Items become purchasable once every prerequisite's lifetime total meets
//! its threshold. The transition is one-way and evaluated after any ledger
//! mutation that can raise a lifetime total. Prerequisites reference totals
//! only, never other unlock flags, so evaluation order across items does not
//! matter.

use crate::catalog::{CATALOG, ItemId};
use crate::ledger::PlayerLedger;
use crate::types::Amount;

/// Flip the unlock flag of every item whose prerequisites are now met.
/// Returns the newly unlocked items, in catalog order.
pub fn evaluate(ledger: &mut PlayerLedger) -> Vec<ItemId> {
    let mut newly = Vec::new();
    for def in &CATALOG {
        if ledger.is_unlocked(def.id) || def.unlock_at.is_empty() {
            continue;
        }
        let satisfied = def
            .unlock_at
            .iter()
            .all(|&(item, threshold)| ledger.total(item) >= Amount::from_units(threshold));
        if satisfied && ledger.unlock(def.id) {
            newly.push(def.id);
        }
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_unlocks_on_fresh_ledger() {
        let mut ledger = PlayerLedger::new();
        assert!(evaluate(&mut ledger).is_empty());
    }

    #[test]
    fn contacts_unlock_at_ten_total_messages() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(9));
        assert!(evaluate(&mut ledger).is_empty());

        ledger.credit(ItemId::Messages, Amount::from_units(1));
        assert_eq!(evaluate(&mut ledger), vec![ItemId::Contacts]);
        assert!(ledger.is_unlocked(ItemId::Contacts));
    }

    #[test]
    fn every_prerequisite_must_hold() {
        let mut ledger = PlayerLedger::new();
        // Groups need 100 messages and 4 contacts.
        ledger.credit(ItemId::Messages, Amount::from_units(100));
        let newly = evaluate(&mut ledger);
        assert!(!newly.contains(&ItemId::Groups));

        ledger.credit(ItemId::Contacts, Amount::from_units(4));
        assert!(evaluate(&mut ledger).contains(&ItemId::Groups));
    }

    #[test]
    fn one_mutation_can_unlock_several_items() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(10_000));
        ledger.credit(ItemId::Contacts, Amount::from_units(256));
        ledger.credit(ItemId::Groups, Amount::from_units(1));
        let newly = evaluate(&mut ledger);
        assert_eq!(
            newly,
            vec![
                ItemId::Contacts,
                ItemId::Groups,
                ItemId::Channels,
                ItemId::Supergroups,
            ]
        );
    }

    #[test]
    fn unlocks_survive_spending() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(10));
        evaluate(&mut ledger);
        assert!(ledger.is_unlocked(ItemId::Contacts));

        // Totals never decrease, so no sequence of debits can re-lock.
        ledger
            .debit(ItemId::Messages, Amount::from_units(10))
            .unwrap();
        evaluate(&mut ledger);
        assert!(ledger.is_unlocked(ItemId::Contacts));
    }

    #[test]
    fn evaluation_reports_each_unlock_once() {
        let mut ledger = PlayerLedger::new();
        ledger.credit(ItemId::Messages, Amount::from_units(10));
        assert_eq!(evaluate(&mut ledger), vec![ItemId::Contacts]);
        assert!(evaluate(&mut ledger).is_empty());
    }
}
