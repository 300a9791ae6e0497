//! Player state and every operation that mutates it.
//!
//! The ledger is the single writer of `PlayerState`. Each command either
//! applies all of its changes or returns an error and applies none.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{self, AchievementKind, CoinKind, TableMilestone, ToolKind, UpgradeKind};
use crate::error::{EngineError, EngineResult};
use crate::flip::{Face, FlipOutcome};
use crate::modifiers::{derive_modifiers, Modifiers};

/// Growth factor of repeatable purchase costs.
pub const COST_GROWTH: f64 = 1.15;

/// Bank needed to prestige (100 million).
pub const PRESTIGE_THRESHOLD: f64 = 100_000_000.0;

/// `base_cost × COST_GROWTH^owned`. Overflows to infinity, never wraps.
pub fn scaled_cost(base_cost: f64, owned: u32) -> f64 {
    base_cost * COST_GROWTH.powf(owned as f64)
}

/// One table position.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub id: usize,
    pub assigned_coin: Option<CoinKind>,
    /// Set while the presentation layer animates a flip.
    pub is_flipping: bool,
    /// Bumped every time a flip starts; stale lockout releases compare against it.
    pub flip_generation: u64,
    /// Consecutive Heads, for the streak bonus.
    pub heads_streak: u32,
}

impl Slot {
    pub fn new(id: usize, coin: CoinKind) -> Self {
        Self {
            id,
            assigned_coin: Some(coin),
            is_flipping: false,
            flip_generation: 0,
            heads_streak: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub total_flips: u64,
    pub heads_count: u64,
    pub tails_count: u64,
    pub critical_count: u64,
}

/// Full mutable game state.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub bank: f64,
    pub lifetime_earned: f64,
    /// In unlock order; always contains the starter coin.
    pub unlocked_coins: Vec<CoinKind>,
    pub slots: Vec<Slot>,
    pub owned_tool_counts: BTreeMap<ToolKind, u32>,
    pub owned_upgrades: BTreeSet<UpgradeKind>,
    pub stats: Stats,
    /// Survives prestige, like `stats`.
    pub achievements: BTreeSet<AchievementKind>,
    pub prestige_count: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        let starter = CoinKind::starter();
        Self {
            bank: 0.0,
            lifetime_earned: 0.0,
            unlocked_coins: vec![starter],
            slots: fresh_slots(starter),
            owned_tool_counts: BTreeMap::new(),
            owned_upgrades: BTreeSet::new(),
            stats: Stats::default(),
            achievements: BTreeSet::new(),
            prestige_count: 0,
        }
    }
}

fn fresh_slots(coin: CoinKind) -> Vec<Slot> {
    (0..catalog::starting_milestone().slot_count)
        .map(|i| Slot::new(i, coin))
        .collect()
}

impl PlayerState {
    pub fn is_unlocked(&self, coin: CoinKind) -> bool {
        self.unlocked_coins.contains(&coin)
    }

    pub fn tool_count(&self, tool: ToolKind) -> u32 {
        self.owned_tool_counts.get(&tool).copied().unwrap_or(0)
    }

    /// Coin new slots get: whatever the last slot holds, else the newest
    /// unlock, else the starter.
    pub fn equipped_coin(&self) -> CoinKind {
        self.slots
            .last()
            .and_then(|s| s.assigned_coin)
            .or_else(|| self.unlocked_coins.last().copied())
            .unwrap_or_else(CoinKind::starter)
    }
}

/// Owner of `PlayerState`.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    state: PlayerState,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: PlayerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn into_state(self) -> PlayerState {
        self.state
    }

    pub fn modifiers(&self) -> Modifiers {
        derive_modifiers(&self.state.owned_upgrades)
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.state.bank >= cost
    }

    /// Debit `cost`. Returns false and leaves the bank alone if it cannot pay.
    pub fn spend(&mut self, cost: f64) -> bool {
        if cost.is_nan() || cost < 0.0 || !self.can_afford(cost) {
            return false;
        }
        self.state.bank -= cost;
        true
    }

    fn charge(&mut self, cost: f64) -> EngineResult<()> {
        if self.spend(cost) {
            Ok(())
        } else {
            Err(EngineError::InsufficientFunds {
                cost,
                bank: self.state.bank,
            })
        }
    }

    fn slot_index(&self, slot: usize) -> EngineResult<usize> {
        if slot < self.state.slots.len() {
            Ok(slot)
        } else {
            Err(EngineError::InvalidReference(format!("slot {slot}")))
        }
    }

    /// Unlock a coin and equip it on every slot.
    pub fn unlock_coin(&mut self, coin: CoinKind) -> EngineResult<()> {
        if self.state.is_unlocked(coin) {
            return Err(EngineError::AlreadyOwned(coin.id().to_string()));
        }
        self.charge(coin.tier().unlock_cost)?;
        self.state.unlocked_coins.push(coin);
        for slot in &mut self.state.slots {
            slot.assigned_coin = Some(coin);
        }
        Ok(())
    }

    /// Cost and size of the next table expansion, if any.
    pub fn next_milestone(&self) -> Option<&'static TableMilestone> {
        catalog::next_milestone(self.state.slots.len())
    }

    /// Grow the table to the next milestone.
    pub fn expand_table(&mut self) -> EngineResult<&'static TableMilestone> {
        let milestone = self.next_milestone().ok_or(EngineError::TableMaxed)?;
        self.charge(milestone.cost)?;
        let coin = self.state.equipped_coin();
        let start = self.state.slots.len();
        self.state
            .slots
            .extend((start..milestone.slot_count).map(|i| Slot::new(i, coin)));
        Ok(milestone)
    }

    pub fn next_tool_cost(&self, tool: ToolKind) -> f64 {
        scaled_cost(tool.definition().base_cost, self.state.tool_count(tool))
    }

    /// Buy one more unit of `tool`. Returns the new owned count.
    pub fn purchase_tool(&mut self, tool: ToolKind) -> EngineResult<u32> {
        let cost = self.next_tool_cost(tool);
        self.charge(cost)?;
        let count = self.state.owned_tool_counts.entry(tool).or_insert(0);
        *count = count.saturating_add(1);
        Ok(*count)
    }

    pub fn purchase_upgrade(&mut self, upgrade: UpgradeKind) -> EngineResult<()> {
        if self.state.owned_upgrades.contains(&upgrade) {
            return Err(EngineError::AlreadyOwned(upgrade.id().to_string()));
        }
        self.charge(upgrade.definition().cost)?;
        self.state.owned_upgrades.insert(upgrade);
        Ok(())
    }

    pub fn assign_coin_to_slot(&mut self, slot: usize, coin: CoinKind) -> EngineResult<()> {
        let idx = self.slot_index(slot)?;
        if !self.state.is_unlocked(coin) {
            return Err(EngineError::CoinLocked(coin));
        }
        self.state.slots[idx].assigned_coin = Some(coin);
        Ok(())
    }

    pub fn equip_coin_to_all_slots(&mut self, coin: CoinKind) -> EngineResult<()> {
        if !self.state.is_unlocked(coin) {
            return Err(EngineError::CoinLocked(coin));
        }
        for slot in &mut self.state.slots {
            slot.assigned_coin = Some(coin);
        }
        Ok(())
    }

    /// Credit a flip's payout and count it.
    pub fn record_flip(&mut self, outcome: &FlipOutcome) {
        let payout = outcome.payout.max(0.0);
        self.state.bank += payout;
        self.state.lifetime_earned += payout;

        let stats = &mut self.state.stats;
        stats.total_flips += 1;
        match outcome.face {
            Face::Heads => stats.heads_count += 1,
            Face::Tails => stats.tails_count += 1,
        }
        if outcome.is_critical {
            stats.critical_count += 1;
        }
    }

    /// Unlock every achievement whose goal the current stats meet.
    /// Returns the newly unlocked ones in catalog order.
    pub fn check_achievements(&mut self) -> Vec<AchievementKind> {
        let state = &mut self.state;
        let mut unlocked = Vec::new();
        for &kind in AchievementKind::all() {
            if state.achievements.contains(&kind) {
                continue;
            }
            if kind
                .definition()
                .goal
                .is_met(&state.stats, state.lifetime_earned)
            {
                state.achievements.insert(kind);
                unlocked.push(kind);
            }
        }
        unlocked
    }

    /// Check a slot can start a flip and return its coin.
    pub fn flippable_coin(&self, slot: usize) -> EngineResult<CoinKind> {
        let idx = self.slot_index(slot)?;
        let s = &self.state.slots[idx];
        if s.is_flipping {
            return Err(EngineError::SlotBusy(idx));
        }
        s.assigned_coin.ok_or(EngineError::SlotEmpty(idx))
    }

    /// Mark a slot mid-flip. Returns the generation the release must match.
    pub fn begin_flip(&mut self, slot: usize) -> EngineResult<u64> {
        let idx = self.slot_index(slot)?;
        let s = &mut self.state.slots[idx];
        s.is_flipping = true;
        s.flip_generation += 1;
        Ok(s.flip_generation)
    }

    /// Clear the mid-flip flag if no newer flip started since `generation`.
    pub fn end_flip(&mut self, slot: usize, generation: u64) {
        if let Some(s) = self.state.slots.get_mut(slot) {
            if s.flip_generation == generation {
                s.is_flipping = false;
            }
        }
    }

    /// Track consecutive Heads on a slot. Returns true when the streak
    /// reaches `streak_len`, resetting it.
    pub fn advance_streak(&mut self, slot: usize, face: Face, streak_len: u32) -> bool {
        let Some(s) = self.state.slots.get_mut(slot) else {
            return false;
        };
        match face {
            Face::Tails => {
                s.heads_streak = 0;
                false
            }
            Face::Heads => {
                s.heads_streak += 1;
                if s.heads_streak >= streak_len {
                    s.heads_streak = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Reset progression for a permanent prestige rank. Stats, lifetime
    /// earnings and the rank survive. Returns the new prestige count.
    pub fn prestige(&mut self) -> EngineResult<u32> {
        if self.state.bank < PRESTIGE_THRESHOLD {
            return Err(EngineError::PrestigeLocked {
                threshold: PRESTIGE_THRESHOLD,
                bank: self.state.bank,
            });
        }
        let fresh = PlayerState::default();
        let state = &mut self.state;
        state.bank = fresh.bank;
        state.unlocked_coins = fresh.unlocked_coins;
        state.slots = fresh.slots;
        state.owned_tool_counts = fresh.owned_tool_counts;
        state.owned_upgrades = fresh.owned_upgrades;
        state.prestige_count += 1;
        Ok(state.prestige_count)
    }
}
