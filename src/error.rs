//! Error types for engine commands and snapshot persistence.

use thiserror::Error;

use crate::catalog::CoinKind;

/// Why a command was rejected. A rejected command never mutates state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("insufficient funds: need {cost}, have {bank}")]
    InsufficientFunds { cost: f64, bank: f64 },

    /// Unknown catalog id or slot. Means the caller and the catalog disagree.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("already owned: {0}")]
    AlreadyOwned(String),

    #[error("coin {0} is not unlocked")]
    CoinLocked(CoinKind),

    #[error("table is already at its largest size")]
    TableMaxed,

    #[error("slot {0} is mid-flip")]
    SlotBusy(usize),

    #[error("slot {0} has no coin")]
    SlotEmpty(usize),

    #[error("prestige requires a bank of {threshold}, have {bank}")]
    PrestigeLocked { threshold: f64, bank: f64 },
}

/// Result type for engine commands.
pub type EngineResult<T> = Result<T, EngineError>;

/// Snapshot persistence failures. Always recovered locally.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("snapshot version {saved} is older than the minimum compatible {min}")]
    IncompatibleVersion { saved: u32, min: u32 },

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("storage backend error: {0}")]
    Storage(String),
}
