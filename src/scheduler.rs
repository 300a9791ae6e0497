//! Time-driven automatic flips.
//!
//! Each owned tool type accumulates elapsed time and fires whenever the
//! accumulator passes its effective interval. The remainder carries over so
//! long runs do not drift. Every firing is reported with its offset inside
//! the advanced window, so callers can replay them in time order. Targets
//! are chosen against the current slot list every time a tool fires; busy
//! slots are skipped, never queued.

use std::collections::BTreeMap;

use crate::catalog::{Targeting, ToolKind};
use crate::flip::RandomSource;
use crate::ledger::Slot;

/// `base / (owned × (1 + speed_bonus))`, or None when nothing is owned.
pub fn effective_interval_ms(base_interval_ms: u32, owned: u32, speed_bonus: f64) -> Option<f64> {
    if owned == 0 {
        return None;
    }
    let rate = owned as f64 * (1.0 + speed_bonus.max(0.0));
    Some(base_interval_ms as f64 / rate)
}

/// Most firings one tool can catch up on in a single `advance`. Anything
/// beyond is dropped.
pub const MAX_CATCH_UP_FIRINGS: u64 = 1_000;

/// One firing of a tool during `advance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolFiring {
    pub tool: ToolKind,
    /// Time from the start of the advanced window, in `(0, delta_ms]`.
    pub offset_ms: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AutomationScheduler {
    accumulators: BTreeMap<ToolKind, f64>,
}

impl AutomationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta_ms` to every owned tool and report each firing, earliest
    /// first.
    pub fn advance(
        &mut self,
        delta_ms: f64,
        owned: &BTreeMap<ToolKind, u32>,
        speed_bonus: f64,
    ) -> Vec<ToolFiring> {
        let mut firings = Vec::new();
        if delta_ms.is_nan() || delta_ms <= 0.0 {
            return firings;
        }

        for (&tool, &count) in owned {
            let Some(interval) =
                effective_interval_ms(tool.definition().base_interval_ms, count, speed_bonus)
            else {
                continue;
            };
            let acc = self.accumulators.entry(tool).or_insert(0.0);
            let before = *acc;
            *acc += delta_ms;

            let due = (*acc / interval).floor();
            if due < 1.0 {
                continue;
            }
            *acc = (*acc - due * interval).max(0.0);

            let times = (due as u64).min(MAX_CATCH_UP_FIRINGS);
            firings.extend((1..=times).map(|k| ToolFiring {
                tool,
                offset_ms: (k as f64 * interval - before).clamp(0.0, delta_ms),
            }));
        }
        firings.sort_by(|a, b| a.offset_ms.total_cmp(&b.offset_ms));
        firings
    }

    /// Time banked toward the next firing of `tool`.
    pub fn pending_ms(&self, tool: ToolKind) -> f64 {
        self.accumulators.get(&tool).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        self.accumulators.clear();
    }
}

fn ready(slot: &Slot) -> bool {
    slot.assigned_coin.is_some() && !slot.is_flipping
}

/// Slots a tool with `targeting` flips right now.
pub fn resolve_targets(
    targeting: Targeting,
    slots: &[Slot],
    rng: &mut dyn RandomSource,
) -> Vec<usize> {
    match targeting {
        Targeting::SingleSlot(index) => slots
            .get(index)
            .filter(|s| ready(s))
            .map(|_| vec![index])
            .unwrap_or_default(),
        Targeting::RandomSlot => {
            let occupied: Vec<usize> = slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.assigned_coin.is_some())
                .map(|(i, _)| i)
                .collect();
            if occupied.is_empty() {
                return Vec::new();
            }
            let idx = occupied[rng.pick(occupied.len())];
            if slots[idx].is_flipping {
                Vec::new()
            } else {
                vec![idx]
            }
        }
        Targeting::FirstNSlots(n) => (0..n.min(slots.len()))
            .filter(|&i| ready(&slots[i]))
            .collect(),
        Targeting::AllSlots => (0..slots.len()).filter(|&i| ready(&slots[i])).collect(),
    }
}
