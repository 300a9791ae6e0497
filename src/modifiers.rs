//! Folds the owned upgrade set into the odds and payout modifiers a flip uses.

use std::collections::BTreeSet;

use crate::catalog::{EffectKind, UpgradeKind};

/// Critical chance with no upgrades.
pub const BASE_CRITICAL_CHANCE: f64 = 0.01;

/// Effective flip modifiers for the current upgrade set.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifiers {
    pub heads_bonus: f64,
    pub value_multiplier: f64,
    pub critical_chance: f64,
    pub tails_salvage_fraction: f64,
    pub speed_bonus: f64,
    /// Extra factor on the 100x critical payout.
    pub critical_payout: f64,
    /// Consecutive Heads on one slot that earn a bonus flip.
    pub heads_streak: Option<u32>,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            heads_bonus: 0.0,
            value_multiplier: 1.0,
            critical_chance: BASE_CRITICAL_CHANCE,
            tails_salvage_fraction: 0.0,
            speed_bonus: 0.0,
            critical_payout: 1.0,
            heads_streak: None,
        }
    }
}

/// Derive modifiers from owned upgrades.
///
/// Heads, critical chance and speed bonuses add up. Value bonuses add up and
/// then sit on top of 1, so two +10% upgrades give 1.20. Tails salvage and
/// critical payout take the best owned value. The heads streak takes the
/// shortest owned streak.
pub fn derive_modifiers(owned: &BTreeSet<UpgradeKind>) -> Modifiers {
    let mut m = Modifiers::default();
    let mut value_bonus = 0.0;

    for upgrade in owned {
        let effect = upgrade.definition().effect;
        match effect.kind {
            EffectKind::HeadsBonus => m.heads_bonus += effect.magnitude,
            EffectKind::ValueMultiplier => value_bonus += effect.magnitude,
            EffectKind::CriticalChance => m.critical_chance += effect.magnitude,
            EffectKind::TailsSalvage => {
                m.tails_salvage_fraction = m.tails_salvage_fraction.max(effect.magnitude);
            }
            EffectKind::SpeedBonus => m.speed_bonus += effect.magnitude,
            EffectKind::CriticalPayout => {
                m.critical_payout = m.critical_payout.max(effect.magnitude);
            }
            EffectKind::HeadsStreak => {
                let len = effect.magnitude.round().max(1.0) as u32;
                m.heads_streak = Some(m.heads_streak.map_or(len, |cur| cur.min(len)));
            }
        }
    }

    m.value_multiplier = 1.0 + value_bonus;
    m
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_upgrade_set() -> impl Strategy<Value = BTreeSet<UpgradeKind>> {
        proptest::collection::btree_set(
            proptest::sample::select(UpgradeKind::all().to_vec()),
            0..UpgradeKind::all().len(),
        )
    }

    proptest! {
        #[test]
        fn prop_modifiers_stay_in_sane_ranges(set in arb_upgrade_set()) {
            let m = derive_modifiers(&set);
            prop_assert!(m.value_multiplier >= 1.0);
            prop_assert!(m.critical_chance >= BASE_CRITICAL_CHANCE);
            prop_assert!((0.0..=1.0).contains(&m.tails_salvage_fraction));
            prop_assert!(m.heads_bonus >= 0.0);
            prop_assert!(m.speed_bonus >= 0.0);
            prop_assert!(m.critical_payout >= 1.0);
        }

        #[test]
        fn prop_adding_an_upgrade_never_hurts(set in arb_upgrade_set(), extra in proptest::sample::select(UpgradeKind::all().to_vec())) {
            let before = derive_modifiers(&set);
            let mut bigger = set.clone();
            bigger.insert(extra);
            let after = derive_modifiers(&bigger);
            prop_assert!(after.value_multiplier >= before.value_multiplier);
            prop_assert!(after.heads_bonus >= before.heads_bonus);
            prop_assert!(after.critical_chance >= before.critical_chance);
            prop_assert!(after.tails_salvage_fraction >= before.tails_salvage_fraction);
        }
    }
}
