//! Flip-o-Nomics: the economy engine behind an idle coin-flipping game.
//!
//! Coins are flipped on a table of slots, payouts fill the bank, and the bank
//! buys better coins, bigger tables, automation tools and permanent upgrades.
//! [`Engine`] is the facade a presentation layer drives; the modules below it
//! are usable on their own for tests and balance tooling.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod flip;
pub mod ledger;
pub mod modifiers;
pub mod save;
pub mod scheduler;
pub mod time;

#[cfg(test)]
mod simulator;

pub use catalog::{AchievementKind, CoinKind, ToolKind, UpgradeKind};
pub use config::EngineConfig;
pub use engine::{Command, Engine, EngineEvent, FlipSource, Purchase};
pub use error::{EngineError, EngineResult, SaveError};
pub use flip::{Face, FlipOutcome, RandomSource, ScriptedRolls, SeededRng};
pub use ledger::{Ledger, PlayerState, Slot, Stats};
pub use modifiers::Modifiers;
pub use save::{MemoryStore, SnapshotStore};
