//! The engine facade the presentation layer drives.
//!
//! Owns the ledger, the automation scheduler, the random source, the flip
//! lockout timers and the snapshot store. Everything runs on the caller's
//! thread: commands complete synchronously, and `advance`/`frame` move engine
//! time forward from the host's timer or animation-frame callback.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::catalog::{AchievementKind, CoinKind, TableMilestone, ToolKind, UpgradeKind};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, SaveError};
use crate::flip::{resolve_flip, FlipOutcome, RandomSource};
use crate::ledger::{Ledger, PlayerState, Slot, Stats};
use crate::modifiers::Modifiers;
use crate::save::{self, SnapshotStore};
use crate::scheduler::{resolve_targets, AutomationScheduler};
use crate::time::GameTime;

/// What triggered a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipSource {
    Manual,
    Tool(ToolKind),
    /// Bonus flip from a Heads streak.
    Streak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purchase {
    Coin(CoinKind),
    Table { slot_count: usize },
    Tool { tool: ToolKind, owned: u32 },
    Upgrade(UpgradeKind),
}

/// Notifications for the presentation layer, drained with `drain_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    FlipResolved {
        slot: usize,
        outcome: FlipOutcome,
        source: FlipSource,
    },
    PurchaseCompleted(Purchase),
    PrestigeCompleted {
        prestige_count: u32,
    },
    MilestoneReached {
        milestone_id: &'static str,
        slot_count: usize,
    },
    AchievementUnlocked(AchievementKind),
}

/// A command in data form, for hosts that dispatch from ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ManualFlip(usize),
    UnlockCoin(CoinKind),
    ExpandTable,
    PurchaseTool(ToolKind),
    PurchaseUpgrade(UpgradeKind),
    AssignCoinToSlot { slot: usize, coin: CoinKind },
    EquipCoinToAllSlots(CoinKind),
    Prestige,
}

impl Command {
    /// Build a command from an action name and its id arguments, e.g.
    /// `("assignCoinToSlot", ["2", "dime"])`.
    pub fn parse(action: &str, args: &[&str]) -> EngineResult<Self> {
        let arg = |i: usize| {
            args.get(i)
                .copied()
                .ok_or_else(|| EngineError::InvalidReference(format!("{action}: missing argument")))
        };
        let slot = |i: usize| {
            arg(i).and_then(|s| {
                s.parse::<usize>()
                    .map_err(|_| EngineError::InvalidReference(format!("slot {s}")))
            })
        };
        match action {
            "manualFlip" => Ok(Command::ManualFlip(slot(0)?)),
            "unlockCoin" => Ok(Command::UnlockCoin(arg(0)?.parse()?)),
            "expandTable" => Ok(Command::ExpandTable),
            "purchaseTool" => Ok(Command::PurchaseTool(arg(0)?.parse()?)),
            "purchaseUpgrade" => Ok(Command::PurchaseUpgrade(arg(0)?.parse()?)),
            "assignCoinToSlot" => Ok(Command::AssignCoinToSlot {
                slot: slot(0)?,
                coin: arg(1)?.parse()?,
            }),
            "equipCoinToAllSlots" => Ok(Command::EquipCoinToAllSlots(arg(0)?.parse()?)),
            "prestige" => Ok(Command::Prestige),
            other => Err(EngineError::InvalidReference(other.to_string())),
        }
    }
}

/// Scheduled end of a slot's flip lockout.
#[derive(Clone, Copy, Debug)]
struct PendingRelease {
    slot: usize,
    generation: u64,
    due_ms: f64,
}

pub struct Engine<S: SnapshotStore> {
    config: EngineConfig,
    ledger: Ledger,
    scheduler: AutomationScheduler,
    rng: Box<dyn RandomSource>,
    clock: GameTime,
    store: S,
    now_ms: f64,
    releases: Vec<PendingRelease>,
    events: Vec<EngineEvent>,
    dirty: bool,
    last_save_ms: f64,
}

impl<S: SnapshotStore> Engine<S> {
    /// Start a session from whatever `store` holds under the configured key.
    pub fn load(config: EngineConfig, mut store: S, rng: impl RandomSource + 'static) -> Self {
        let state = save::load_state(&mut store, &config.storage_key);
        Self::with_state(config, store, state, rng)
    }

    /// Start a session from an explicit state.
    pub fn with_state(
        config: EngineConfig,
        store: S,
        state: PlayerState,
        rng: impl RandomSource + 'static,
    ) -> Self {
        let clock = GameTime::new(config.ticks_per_sec, config.max_frame_delta_ms);
        Self {
            config,
            ledger: Ledger::from_state(state),
            scheduler: AutomationScheduler::new(),
            rng: Box::new(rng),
            clock,
            store,
            now_ms: 0.0,
            releases: Vec::new(),
            events: Vec::new(),
            dirty: false,
            last_save_ms: 0.0,
        }
    }

    /// Flush the snapshot and hand the store back.
    pub fn shutdown(mut self) -> S {
        if let Err(e) = self.flush() {
            warn!(error = %e, "final snapshot write failed");
        }
        self.store
    }

    // ── Queries ──────────────────────────────────────────

    pub fn state(&self) -> &PlayerState {
        self.ledger.state()
    }

    pub fn bank(&self) -> f64 {
        self.ledger.state().bank
    }

    pub fn slots(&self) -> &[Slot] {
        &self.ledger.state().slots
    }

    pub fn unlocked_coins(&self) -> &[CoinKind] {
        &self.ledger.state().unlocked_coins
    }

    pub fn owned_tools(&self) -> &BTreeMap<ToolKind, u32> {
        &self.ledger.state().owned_tool_counts
    }

    pub fn owned_upgrades(&self) -> &BTreeSet<UpgradeKind> {
        &self.ledger.state().owned_upgrades
    }

    pub fn stats(&self) -> &Stats {
        &self.ledger.state().stats
    }

    pub fn achievements(&self) -> &BTreeSet<AchievementKind> {
        &self.ledger.state().achievements
    }

    pub fn modifiers(&self) -> Modifiers {
        self.ledger.modifiers()
    }

    pub fn next_tool_cost(&self, tool: ToolKind) -> f64 {
        self.ledger.next_tool_cost(tool)
    }

    pub fn next_milestone(&self) -> Option<&'static TableMilestone> {
        self.ledger.next_milestone()
    }

    /// Engine time in ms since the session started.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Take all notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────

    pub fn execute(&mut self, command: Command) -> EngineResult<()> {
        match command {
            Command::ManualFlip(slot) => self.manual_flip(slot).map(|_| ()),
            Command::UnlockCoin(coin) => self.unlock_coin(coin),
            Command::ExpandTable => self.expand_table().map(|_| ()),
            Command::PurchaseTool(tool) => self.purchase_tool(tool).map(|_| ()),
            Command::PurchaseUpgrade(upgrade) => self.purchase_upgrade(upgrade),
            Command::AssignCoinToSlot { slot, coin } => self.assign_coin_to_slot(slot, coin),
            Command::EquipCoinToAllSlots(coin) => self.equip_coin_to_all_slots(coin),
            Command::Prestige => self.prestige().map(|_| ()),
        }
    }

    /// Parse and run a command given by action name and id strings.
    pub fn dispatch(&mut self, action: &str, args: &[&str]) -> EngineResult<()> {
        match Command::parse(action, args) {
            Ok(command) => self.execute(command),
            Err(e) => self.note_result(action, Err(e)),
        }
    }

    pub fn manual_flip(&mut self, slot: usize) -> EngineResult<FlipOutcome> {
        let result = self.flip_slot(slot, FlipSource::Manual);
        self.note_result("manual flip", result)
    }

    pub fn unlock_coin(&mut self, coin: CoinKind) -> EngineResult<()> {
        let result = self.ledger.unlock_coin(coin);
        if result.is_ok() {
            info!(coin = coin.id(), "coin unlocked");
            self.completed(Purchase::Coin(coin));
        }
        self.note_result("unlock coin", result)
    }

    /// Grow the table. Returns the new slot count.
    pub fn expand_table(&mut self) -> EngineResult<usize> {
        let result = self.ledger.expand_table().map(|m| {
            info!(milestone = m.id, slots = m.slot_count, "table expanded");
            self.events.push(EngineEvent::MilestoneReached {
                milestone_id: m.id,
                slot_count: m.slot_count,
            });
            m.slot_count
        });
        if let Ok(slot_count) = result {
            self.completed(Purchase::Table { slot_count });
        }
        self.note_result("expand table", result)
    }

    /// Buy one tool. Returns the new owned count.
    pub fn purchase_tool(&mut self, tool: ToolKind) -> EngineResult<u32> {
        let result = self.ledger.purchase_tool(tool);
        if let Ok(owned) = result {
            debug!(tool = tool.id(), owned, "tool purchased");
            self.completed(Purchase::Tool { tool, owned });
        }
        self.note_result("purchase tool", result)
    }

    pub fn purchase_upgrade(&mut self, upgrade: UpgradeKind) -> EngineResult<()> {
        let result = self.ledger.purchase_upgrade(upgrade);
        if result.is_ok() {
            debug!(upgrade = upgrade.id(), "upgrade purchased");
            self.completed(Purchase::Upgrade(upgrade));
        }
        self.note_result("purchase upgrade", result)
    }

    pub fn assign_coin_to_slot(&mut self, slot: usize, coin: CoinKind) -> EngineResult<()> {
        let result = self.ledger.assign_coin_to_slot(slot, coin);
        if result.is_ok() {
            self.dirty = true;
        }
        self.note_result("assign coin", result)
    }

    pub fn equip_coin_to_all_slots(&mut self, coin: CoinKind) -> EngineResult<()> {
        let result = self.ledger.equip_coin_to_all_slots(coin);
        if result.is_ok() {
            self.dirty = true;
        }
        self.note_result("equip coin", result)
    }

    /// Reset progression for a prestige rank. Returns the new rank.
    pub fn prestige(&mut self) -> EngineResult<u32> {
        let result = self.ledger.prestige();
        if let Ok(prestige_count) = result {
            info!(prestige_count, "prestige");
            self.scheduler.reset();
            self.releases.clear();
            self.events
                .push(EngineEvent::PrestigeCompleted { prestige_count });
            self.dirty = true;
            if let Err(e) = self.flush() {
                warn!(error = %e, "snapshot write after prestige failed");
            }
        }
        self.note_result("prestige", result)
    }

    // ── Time ─────────────────────────────────────────────

    /// Feed a wall-clock timestamp; advances engine time in whole ticks.
    pub fn frame(&mut self, now_ms: f64) {
        let ticks = self.clock.update(now_ms);
        if ticks > 0 {
            self.advance(ticks as f64 * self.clock.ms_per_tick());
        }
    }

    /// Move engine time forward: run automation in time order, releasing
    /// finished flips as their lockouts end, then autosave if due.
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_nan() || delta_ms <= 0.0 {
            return;
        }
        let start = self.now_ms;
        let speed_bonus = self.ledger.modifiers().speed_bonus;
        let firings =
            self.scheduler
                .advance(delta_ms, &self.ledger.state().owned_tool_counts, speed_bonus);

        // Replay firings at their own times so lockouts that end mid-window
        // free their slots for later firings.
        for firing in firings {
            self.now_ms = start + firing.offset_ms;
            self.release_due_slots();
            let targeting = firing.tool.definition().targeting;
            let targets = resolve_targets(targeting, &self.ledger.state().slots, self.rng.as_mut());
            for slot in targets {
                // Targets are idle by construction; nothing to report on failure.
                let _ = self.flip_slot(slot, FlipSource::Tool(firing.tool));
            }
        }

        self.now_ms = start + delta_ms;
        self.release_due_slots();
        self.autosave();
    }

    /// Write the snapshot now if anything changed since the last write.
    pub fn flush(&mut self) -> Result<(), SaveError> {
        if !self.dirty {
            return Ok(());
        }
        save::save_state(&mut self.store, &self.config.storage_key, self.ledger.state())?;
        self.dirty = false;
        self.last_save_ms = self.now_ms;
        debug!(now_ms = self.now_ms, "snapshot written");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────

    fn flip_slot(&mut self, slot: usize, source: FlipSource) -> EngineResult<FlipOutcome> {
        let coin = self.ledger.flippable_coin(slot)?;
        let generation = self.ledger.begin_flip(slot)?;
        self.releases.push(PendingRelease {
            slot,
            generation,
            due_ms: self.now_ms + self.config.flip_lockout_ms,
        });

        let modifiers = self.ledger.modifiers();
        let outcome = resolve_flip(coin.tier(), &modifiers, self.rng.as_mut());
        self.settle_flip(slot, outcome, source);

        if let Some(streak_len) = modifiers.heads_streak {
            if self.ledger.advance_streak(slot, outcome.face, streak_len) {
                let bonus = resolve_flip(coin.tier(), &modifiers, self.rng.as_mut());
                self.settle_flip(slot, bonus, FlipSource::Streak);
            }
        }
        Ok(outcome)
    }

    fn settle_flip(&mut self, slot: usize, outcome: FlipOutcome, source: FlipSource) {
        self.ledger.record_flip(&outcome);
        self.events.push(EngineEvent::FlipResolved {
            slot,
            outcome,
            source,
        });
        for achievement in self.ledger.check_achievements() {
            info!(achievement = achievement.id(), "achievement unlocked");
            self.events.push(EngineEvent::AchievementUnlocked(achievement));
        }
        self.dirty = true;
    }

    fn release_due_slots(&mut self) {
        let now = self.now_ms;
        let ledger = &mut self.ledger;
        self.releases.retain(|r| {
            if r.due_ms <= now {
                ledger.end_flip(r.slot, r.generation);
                false
            } else {
                true
            }
        });
    }

    fn autosave(&mut self) {
        if !self.dirty || self.now_ms - self.last_save_ms < self.config.autosave_debounce_ms {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(error = %e, "autosave failed");
        }
    }

    fn completed(&mut self, purchase: Purchase) {
        self.events.push(EngineEvent::PurchaseCompleted(purchase));
        self.dirty = true;
    }

    fn note_result<T>(&self, command: &str, result: EngineResult<T>) -> EngineResult<T> {
        if let Err(e) = &result {
            match e {
                EngineError::InvalidReference(_) => {
                    warn!(command, error = %e, "command referenced an unknown id")
                }
                _ => debug!(command, error = %e, "command rejected"),
            }
        }
        result
    }
}
