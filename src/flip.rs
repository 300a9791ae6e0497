//! Single-flip resolution: a pure function of coin, modifiers and two draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::CoinTier;
use crate::modifiers::Modifiers;

/// Payout factor of a critical ("landed on its edge") flip.
pub const CRITICAL_MULTIPLIER: f64 = 100.0;

/// Source of uniform draws. Injected so outcomes are reproducible.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Seeded ChaCha8 stream for real play.
#[derive(Clone, Debug)]
pub struct SeededRng(ChaCha8Rng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    rolls: Vec<f64>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Heads,
    Tails,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipOutcome {
    pub face: Face,
    pub payout: f64,
    pub is_critical: bool,
}

/// Resolve one flip.
///
/// The critical roll comes first and pre-empts everything. Otherwise a second
/// draw decides Heads against `0.5 + heads_bonus` (clamped to `[0, 1]`). Tails
/// pays the salvage fraction of the coin value.
pub fn resolve_flip(
    coin: &CoinTier,
    modifiers: &Modifiers,
    rng: &mut dyn RandomSource,
) -> FlipOutcome {
    let crit_roll = rng.next_unit();
    if crit_roll < modifiers.critical_chance {
        return FlipOutcome {
            face: Face::Heads,
            payout: coin.base_value
                * CRITICAL_MULTIPLIER
                * modifiers.critical_payout
                * modifiers.value_multiplier,
            is_critical: true,
        };
    }

    let heads_roll = rng.next_unit();
    let success_probability = (0.5 + modifiers.heads_bonus).clamp(0.0, 1.0);
    if heads_roll < success_probability {
        FlipOutcome {
            face: Face::Heads,
            payout: coin.base_value * modifiers.value_multiplier,
            is_critical: false,
        }
    } else {
        FlipOutcome {
            face: Face::Tails,
            payout: coin.base_value
                * modifiers.tails_salvage_fraction
                * modifiers.value_multiplier,
            is_critical: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CoinKind;

    fn nickel() -> &'static CoinTier {
        CoinKind::Nickel.tier()
    }

    #[test]
    fn critical_preempts_heads_roll() {
        let mods = Modifiers::default();
        // Crit roll 0.005 < 0.01; the 0.99 would have been Tails.
        let mut rng = ScriptedRolls::new(vec![0.005, 0.99]);
        let out = resolve_flip(nickel(), &mods, &mut rng);
        assert_eq!(out.face, Face::Heads);
        assert!(out.is_critical);
        assert!((out.payout - 5.0).abs() < 1e-9);
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn critical_uses_value_and_payout_multipliers() {
        let mods = Modifiers {
            value_multiplier: 1.5,
            critical_payout: 2.0,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.0]);
        let out = resolve_flip(CoinKind::Penny.tier(), &mods, &mut rng);
        assert!((out.payout - 0.01 * 100.0 * 2.0 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn plain_heads_pays_base_value() {
        let mods = Modifiers {
            value_multiplier: 1.2,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.5, 0.2]);
        let out = resolve_flip(nickel(), &mods, &mut rng);
        assert_eq!(out.face, Face::Heads);
        assert!(!out.is_critical);
        assert!((out.payout - 0.06).abs() < 1e-9);
    }

    #[test]
    fn tails_without_salvage_pays_nothing() {
        let mut rng = ScriptedRolls::new(vec![0.5, 0.7]);
        let out = resolve_flip(nickel(), &Modifiers::default(), &mut rng);
        assert_eq!(out.face, Face::Tails);
        assert_eq!(out.payout, 0.0);
    }

    #[test]
    fn tails_salvage_pays_fraction() {
        let mods = Modifiers {
            tails_salvage_fraction: 0.25,
            value_multiplier: 2.0,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.5, 0.9]);
        let out = resolve_flip(nickel(), &mods, &mut rng);
        assert_eq!(out.face, Face::Tails);
        assert!((out.payout - 0.05 * 0.25 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn heads_bonus_shifts_threshold() {
        let mods = Modifiers {
            heads_bonus: 0.1,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.5, 0.55]);
        assert_eq!(resolve_flip(nickel(), &mods, &mut rng).face, Face::Heads);
        let mut rng = ScriptedRolls::new(vec![0.5, 0.65]);
        assert_eq!(resolve_flip(nickel(), &mods, &mut rng).face, Face::Tails);
    }

    #[test]
    fn success_probability_is_clamped() {
        let sure = Modifiers {
            heads_bonus: 5.0,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.5, 0.999_999]);
        assert_eq!(resolve_flip(nickel(), &sure, &mut rng).face, Face::Heads);

        let never = Modifiers {
            heads_bonus: -5.0,
            ..Modifiers::default()
        };
        let mut rng = ScriptedRolls::new(vec![0.5, 0.0]);
        assert_eq!(resolve_flip(nickel(), &never, &mut rng).face, Face::Tails);
    }

    #[test]
    fn same_draws_same_outcome() {
        let mods = Modifiers::default();
        let a = resolve_flip(nickel(), &mods, &mut SeededRng::new(7));
        let b = resolve_flip(nickel(), &mods, &mut SeededRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_pick_in_range() {
        let mut rng = SeededRng::new(1);
        for _ in 0..200 {
            assert!(rng.pick(3) < 3);
        }
        let mut scripted = ScriptedRolls::new(vec![0.999_999_9]);
        assert_eq!(scripted.pick(4), 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::catalog::CoinKind;
    use proptest::prelude::*;

    fn arb_coin() -> impl Strategy<Value = CoinKind> {
        proptest::sample::select(CoinKind::all().to_vec())
    }

    fn arb_modifiers() -> impl Strategy<Value = Modifiers> {
        (
            -1.0f64..1.0,
            0.0f64..10.0,
            0.0f64..1.0,
            0.0f64..=1.0,
            1.0f64..4.0,
        )
            .prop_map(|(heads, value, crit, salvage, crit_payout)| Modifiers {
                heads_bonus: heads,
                value_multiplier: value,
                critical_chance: crit,
                tails_salvage_fraction: salvage,
                critical_payout: crit_payout,
                ..Modifiers::default()
            })
    }

    proptest! {
        #[test]
        fn prop_payout_never_negative(
            coin in arb_coin(),
            mods in arb_modifiers(),
            crit_roll in 0.0f64..1.0,
            heads_roll in 0.0f64..1.0,
        ) {
            let mut rng = ScriptedRolls::new(vec![crit_roll, heads_roll]);
            let out = resolve_flip(coin.tier(), &mods, &mut rng);
            prop_assert!(out.payout >= 0.0, "payout {}", out.payout);
        }

        #[test]
        fn prop_resolution_is_deterministic(
            coin in arb_coin(),
            mods in arb_modifiers(),
            crit_roll in 0.0f64..1.0,
            heads_roll in 0.0f64..1.0,
        ) {
            let a = resolve_flip(coin.tier(), &mods, &mut ScriptedRolls::new(vec![crit_roll, heads_roll]));
            let b = resolve_flip(coin.tier(), &mods, &mut ScriptedRolls::new(vec![crit_roll, heads_roll]));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_critical_always_heads(
            coin in arb_coin(),
            mods in arb_modifiers(),
            heads_roll in 0.0f64..1.0,
        ) {
            prop_assume!(mods.critical_chance > 0.0);
            let crit_roll = mods.critical_chance / 2.0;
            let out = resolve_flip(coin.tier(), &mods, &mut ScriptedRolls::new(vec![crit_roll, heads_roll]));
            prop_assert!(out.is_critical);
            prop_assert_eq!(out.face, Face::Heads);
            let expected = coin.tier().base_value * CRITICAL_MULTIPLIER * mods.critical_payout * mods.value_multiplier;
            prop_assert!((out.payout - expected).abs() <= expected.abs() * 1e-12);
        }
    }
}
