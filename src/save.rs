//! Snapshot save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current snapshot format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that still loads. Only bump on
//!   breaking changes (a field removed or its meaning changed).
//!
//! Older compatible snapshots load with defaults filled in for missing
//! fields. Anything unreadable falls back to a fresh `PlayerState`; a broken
//! snapshot never stops the game from starting.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{self, AchievementKind, CoinKind, ToolKind, UpgradeKind};
use crate::error::SaveError;
use crate::ledger::{PlayerState, Slot, Stats};

/// Snapshot format version. Bump on field additions.
const SAVE_VERSION: u32 = 1;

/// Oldest snapshot version that still loads.
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Durable key-value storage for snapshots.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// In-process store. Used by tests and hosts without durable storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser localStorage backend.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// None when the page has no localStorage (private mode, sandboxed iframe).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.storage
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.storage
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    bank: f64,
    lifetime_earned: f64,
    /// In unlock order.
    unlocked_coins: Vec<CoinKind>,
    slots: Vec<SlotSave>,
    tools: BTreeMap<ToolKind, u32>,
    upgrades: Vec<UpgradeKind>,
    stats: StatsSave,
    achievements: Vec<AchievementKind>,
    prestige_count: u32,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct SlotSave {
    coin: Option<CoinKind>,
    /// Written for completeness; always cleared on load.
    is_flipping: bool,
    heads_streak: u32,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct StatsSave {
    total_flips: u64,
    heads_count: u64,
    tails_count: u64,
    critical_count: u64,
}

fn extract_save(state: &PlayerState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            bank: state.bank,
            lifetime_earned: state.lifetime_earned,
            unlocked_coins: state.unlocked_coins.clone(),
            slots: state
                .slots
                .iter()
                .map(|s| SlotSave {
                    coin: s.assigned_coin,
                    is_flipping: s.is_flipping,
                    heads_streak: s.heads_streak,
                })
                .collect(),
            tools: state.owned_tool_counts.clone(),
            upgrades: state.owned_upgrades.iter().copied().collect(),
            stats: StatsSave {
                total_flips: state.stats.total_flips,
                heads_count: state.stats.heads_count,
                tails_count: state.stats.tails_count,
                critical_count: state.stats.critical_count,
            },
            achievements: state.achievements.iter().copied().collect(),
            prestige_count: state.prestige_count,
        },
    }
}

fn non_negative(value: f64, field: &str) -> Result<f64, SaveError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SaveError::Corrupt(format!("{field} = {value}")))
    }
}

/// Rebuild a `PlayerState`, restoring the invariants a hand-edited or
/// truncated snapshot may have broken.
fn apply_save(save: &GameSave) -> Result<PlayerState, SaveError> {
    let bank = non_negative(save.bank, "bank")?;
    let lifetime_earned = non_negative(save.lifetime_earned, "lifetime_earned")?;

    let slot_count = save.slots.len();
    if !catalog::TABLE_MILESTONES
        .iter()
        .any(|m| m.slot_count == slot_count)
    {
        return Err(SaveError::Corrupt(format!(
            "{slot_count} slots matches no table size"
        )));
    }

    let starter = CoinKind::starter();
    let mut unlocked_coins = vec![starter];
    for coin in &save.unlocked_coins {
        if !unlocked_coins.contains(coin) {
            unlocked_coins.push(*coin);
        }
    }

    let slots = save
        .slots
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let coin = s
                .coin
                .filter(|c| unlocked_coins.contains(c))
                .unwrap_or(starter);
            Slot {
                heads_streak: s.heads_streak,
                ..Slot::new(i, coin)
            }
        })
        .collect();

    Ok(PlayerState {
        bank,
        lifetime_earned,
        unlocked_coins,
        slots,
        owned_tool_counts: save
            .tools
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(&tool, &count)| (tool, count))
            .collect(),
        owned_upgrades: save.upgrades.iter().copied().collect(),
        stats: Stats {
            total_flips: save.stats.total_flips,
            heads_count: save.stats.heads_count,
            tails_count: save.stats.tails_count,
            critical_count: save.stats.critical_count,
        },
        achievements: save.achievements.iter().copied().collect(),
        prestige_count: save.prestige_count,
    })
}

/// Serialize a state to the snapshot JSON.
pub fn encode(state: &PlayerState) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state)).map_err(SaveError::Serialize)
}

/// Parse and validate snapshot JSON.
pub fn decode(json: &str) -> Result<PlayerState, SaveError> {
    let data: SaveData = serde_json::from_str(json).map_err(SaveError::Parse)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            saved: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version < SAVE_VERSION {
        debug!(
            saved = data.version,
            current = SAVE_VERSION,
            "migrating older snapshot"
        );
    }
    apply_save(&data.game)
}

/// Write `state` under `key`.
pub fn save_state<S: SnapshotStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &PlayerState,
) -> Result<(), SaveError> {
    let json = encode(state)?;
    store.write(key, &json)
}

/// Load the snapshot under `key`, or a fresh state if there is none or it
/// cannot be used. Unusable snapshots are deleted.
pub fn load_state<S: SnapshotStore + ?Sized>(store: &mut S, key: &str) -> PlayerState {
    let json = match store.read(key) {
        Ok(Some(json)) => json,
        Ok(None) => return PlayerState::default(),
        Err(e) => {
            warn!(error = %e, "could not read snapshot, starting fresh");
            return PlayerState::default();
        }
    };

    match decode(&json) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding unusable snapshot, starting fresh");
            if let Err(e) = store.remove(key) {
                warn!(error = %e, "could not remove unusable snapshot");
            }
            PlayerState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    const KEY: &str = "test-save";

    fn played_state() -> PlayerState {
        let mut ledger = Ledger::from_state(PlayerState {
            bank: 10_000.0,
            ..PlayerState::default()
        });
        ledger.unlock_coin(CoinKind::Nickel).unwrap();
        ledger.unlock_coin(CoinKind::Dime).unwrap();
        ledger.expand_table().unwrap();
        ledger.expand_table().unwrap();
        ledger.assign_coin_to_slot(1, CoinKind::Nickel).unwrap();
        ledger.purchase_tool(ToolKind::FidgetFinger).unwrap();
        ledger.purchase_tool(ToolKind::FidgetFinger).unwrap();
        ledger.purchase_tool(ToolKind::DrinkingBird).unwrap();
        ledger.purchase_upgrade(UpgradeKind::WeightedZinc).unwrap();
        ledger.begin_flip(2).unwrap();
        ledger.advance_streak(3, crate::flip::Face::Heads, 3);
        ledger.advance_streak(3, crate::flip::Face::Heads, 3);
        let mut state = ledger.into_state();
        state.stats = Stats {
            total_flips: 40,
            heads_count: 22,
            tails_count: 18,
            critical_count: 1,
        };
        state.lifetime_earned = 12_345.0;
        state.achievements.insert(AchievementKind::FirstDollar);
        state.achievements.insert(AchievementKind::BigMoney);
        state.prestige_count = 2;
        state
    }

    #[test]
    fn encode_and_decode_restores_state() {
        let original = played_state();
        let restored = decode(&encode(&original).unwrap()).unwrap();

        assert!((restored.bank - original.bank).abs() < 1e-9);
        assert_eq!(restored.lifetime_earned, 12_345.0);
        assert_eq!(
            restored.unlocked_coins,
            vec![CoinKind::Penny, CoinKind::Nickel, CoinKind::Dime]
        );
        assert_eq!(restored.slots.len(), 4);
        assert_eq!(restored.slots[0].assigned_coin, Some(CoinKind::Dime));
        assert_eq!(restored.slots[1].assigned_coin, Some(CoinKind::Nickel));
        assert_eq!(restored.tool_count(ToolKind::FidgetFinger), 2);
        assert_eq!(restored.tool_count(ToolKind::DrinkingBird), 1);
        assert!(restored.owned_upgrades.contains(&UpgradeKind::WeightedZinc));
        assert_eq!(restored.stats, original.stats);
        assert_eq!(restored.prestige_count, 2);
        assert_eq!(restored.achievements, original.achievements);
    }

    #[test]
    fn heads_streak_progress_survives_reload() {
        let original = played_state();
        assert_eq!(original.slots[3].heads_streak, 2);
        let restored = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(restored.slots[3].heads_streak, 2);
        assert_eq!(restored.slots[0].heads_streak, 0);
    }

    #[test]
    fn flipping_flag_does_not_survive_reload() {
        let original = played_state();
        assert!(original.slots[2].is_flipping);
        let restored = decode(&encode(&original).unwrap()).unwrap();
        assert!(restored.slots.iter().all(|s| !s.is_flipping));
    }

    #[test]
    fn snapshot_json_uses_catalog_ids() {
        let json = encode(&played_state()).unwrap();
        assert!(json.contains("\"fidgetFinger\":2"), "{json}");
        assert!(json.contains("\"weightedZinc\""), "{json}");
        assert!(json.contains("\"version\":1"), "{json}");
        assert!(json.contains("\"big_money\""), "{json}");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{
            "version": 1,
            "game": {
                "bank": 42.0,
                "slots": [{"coin": "penny"}]
            }
        }"#;
        let state = decode(json).unwrap();
        assert_eq!(state.bank, 42.0);
        assert_eq!(state.unlocked_coins, vec![CoinKind::Penny]);
        assert_eq!(state.stats, Stats::default());
        assert!(state.owned_tool_counts.is_empty());
        assert!(state.achievements.is_empty());
        assert_eq!(state.slots[0].heads_streak, 0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "version": 1,
            "game": {
                "bank": 1.0,
                "slots": [{"coin": "penny", "is_flipping": true}],
                "future_unknown_field": "should be ignored"
            }
        }"#;
        let state = decode(json).unwrap();
        assert_eq!(state.bank, 1.0);
        assert!(!state.slots[0].is_flipping);
    }

    #[test]
    fn starter_coin_is_restored_and_locked_coins_unequipped() {
        let json = r#"{
            "version": 1,
            "game": {
                "unlocked_coins": ["nickel", "nickel"],
                "slots": [{"coin": "goldBar"}, {"coin": "nickel"}]
            }
        }"#;
        let state = decode(json).unwrap();
        assert_eq!(state.unlocked_coins, vec![CoinKind::Penny, CoinKind::Nickel]);
        assert_eq!(state.slots[0].assigned_coin, Some(CoinKind::Penny));
        assert_eq!(state.slots[1].assigned_coin, Some(CoinKind::Nickel));
    }

    #[test]
    fn negative_bank_is_corrupt() {
        let json = r#"{"version": 1, "game": {"bank": -5.0, "slots": [{}]}}"#;
        assert!(matches!(decode(json), Err(SaveError::Corrupt(_))));
    }

    #[test]
    fn odd_slot_count_is_corrupt() {
        let json = r#"{"version": 1, "game": {"slots": [{}, {}, {}]}}"#;
        assert!(matches!(decode(json), Err(SaveError::Corrupt(_))));
    }

    #[test]
    fn old_version_is_rejected() {
        let json = r#"{"version": 0, "game": {"slots": [{}]}}"#;
        assert!(matches!(
            decode(json),
            Err(SaveError::IncompatibleVersion { saved: 0, min: 1 })
        ));
    }

    #[test]
    fn load_missing_snapshot_gives_default() {
        let mut store = MemoryStore::new();
        assert_eq!(load_state(&mut store, KEY), PlayerState::default());
    }

    #[test]
    fn load_corrupt_snapshot_falls_back_and_deletes() {
        let mut store = MemoryStore::new();
        store.write(KEY, "{ this is not json").unwrap();
        assert_eq!(load_state(&mut store, KEY), PlayerState::default());
        assert!(store.get(KEY).is_none());
    }

    #[test]
    fn unknown_coin_id_is_corrupt() {
        let mut store = MemoryStore::new();
        store
            .write(KEY, r#"{"version": 1, "game": {"unlocked_coins": ["drachma"], "slots": [{}]}}"#)
            .unwrap();
        assert_eq!(load_state(&mut store, KEY), PlayerState::default());
    }

    #[test]
    fn save_then_load_through_store() {
        let mut store = MemoryStore::new();
        let original = played_state();
        save_state(&mut store, KEY, &original).unwrap();
        assert_eq!(store.write_count(), 1);
        let loaded = load_state(&mut store, KEY);
        assert_eq!(loaded.tool_count(ToolKind::FidgetFinger), 2);
        assert_eq!(loaded.prestige_count, 2);
    }
}
