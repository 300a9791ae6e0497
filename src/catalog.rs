//! Static reference data: coin tiers, table milestones, automation tools,
//! upgrades and achievements.
//!
//! Every catalog entry is keyed by a closed enum. The tables below are laid out
//! in the same order as the enum's `all()` list so `kind.tier()` and friends
//! are plain index lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::Stats;

/// Coin tiers, cheapest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoinKind {
    Penny,
    Nickel,
    Dime,
    Yen,
    Rupee,
    Quarter,
    Yuan,
    HalfDollar,
    Loonie,
    Euro,
    Pound,
    Toonie,
    Chip,
    TenDollar,
    Doubloon,
    Krugerrand,
    GoldBar,
    Ethereum,
    Bitcoin,
    PlatinumCoin,
    Nft,
    MoonRock,
    Antimatter,
    StarFragment,
    Singularity,
}

/// One coin tier.
#[derive(Clone, Debug, PartialEq)]
pub struct CoinTier {
    pub id: CoinKind,
    pub name: &'static str,
    /// Payout of a plain Heads before modifiers.
    pub base_value: f64,
    pub unlock_cost: f64,
    pub flavor_text: &'static str,
}

const fn coin(
    id: CoinKind,
    name: &'static str,
    base_value: f64,
    unlock_cost: f64,
    flavor_text: &'static str,
) -> CoinTier {
    CoinTier {
        id,
        name,
        base_value,
        unlock_cost,
        flavor_text,
    }
}

pub static COIN_TIERS: [CoinTier; 25] = [
    coin(CoinKind::Penny, "Penny", 0.01, 0.0, "Find a penny, pick it up."),
    coin(CoinKind::Nickel, "Nickel", 0.05, 5.0, "Five times the copper. Sort of."),
    coin(CoinKind::Dime, "Dime", 0.10, 25.0, "Smaller, yet more valuable. Economics is weird."),
    coin(CoinKind::Yen, "Japanese Yen", 0.0067, 50.0, "Small value, big culture."),
    coin(CoinKind::Rupee, "Indian Rupee", 0.012, 75.0, "Spice trade profits."),
    coin(CoinKind::Quarter, "Quarter", 0.25, 100.0, "The laundry machine standard."),
    coin(CoinKind::Yuan, "Chinese Yuan", 0.14, 150.0, "The dragon's treasure."),
    coin(CoinKind::HalfDollar, "Half Dollar", 0.50, 250.0, "Rare in the wild, common in your pocket."),
    coin(CoinKind::Loonie, "Loonie", 1.0, 500.0, "A golden bird from the north."),
    coin(CoinKind::Euro, "Euro", 1.08, 650.0, "United in currency, divided by borders."),
    coin(CoinKind::Pound, "British Pound", 1.27, 750.0, "The Queen's currency. God save the flip."),
    coin(CoinKind::Toonie, "Toonie", 2.0, 1_000.0, "Two-tone Canadian excellence."),
    coin(CoinKind::Chip, "Casino Chip", 5.0, 2_500.0, "The house always wins. Now you are the house."),
    coin(CoinKind::TenDollar, "Ten Dollar Coin", 10.0, 5_000.0, "Commemorative and collectible."),
    coin(CoinKind::Doubloon, "Gold Doubloon", 50.0, 25_000.0, "Yarr! Genuine pirate treasure."),
    coin(CoinKind::Krugerrand, "Krugerrand", 100.0, 50_000.0, "South African gold standard."),
    coin(CoinKind::GoldBar, "Gold Bar", 500.0, 250_000.0, "Fort Knox approved."),
    coin(CoinKind::Ethereum, "Ethereum", 2_500.0, 750_000.0, "Smart contracts, smarter flips."),
    coin(CoinKind::Bitcoin, "Bitcoin", 35_000.0, 10_000_000.0, "Volatile, but digital."),
    coin(CoinKind::PlatinumCoin, "Platinum Coin", 75_000.0, 25_000_000.0, "Rarer than gold, shinier than silver."),
    coin(CoinKind::Nft, "Rare NFT", 150_000.0, 50_000_000.0, "Right-click save this flip."),
    coin(CoinKind::MoonRock, "Moon Rock", 500_000.0, 250_000_000.0, "Literally out of this world."),
    coin(CoinKind::Antimatter, "Antimatter Coin", 5_000_000.0, 2_500_000_000.0, "Don't let it touch regular matter."),
    coin(CoinKind::StarFragment, "Star Fragment", 50_000_000.0, 25_000_000_000.0, "Forged in the heart of a dying star."),
    coin(CoinKind::Singularity, "Singularity Token", 1_000_000_000.0, 500_000_000_000.0, "The event horizon of wealth."),
];

impl CoinKind {
    /// All coin kinds in catalog order.
    pub fn all() -> &'static [CoinKind] {
        &[
            CoinKind::Penny,
            CoinKind::Nickel,
            CoinKind::Dime,
            CoinKind::Yen,
            CoinKind::Rupee,
            CoinKind::Quarter,
            CoinKind::Yuan,
            CoinKind::HalfDollar,
            CoinKind::Loonie,
            CoinKind::Euro,
            CoinKind::Pound,
            CoinKind::Toonie,
            CoinKind::Chip,
            CoinKind::TenDollar,
            CoinKind::Doubloon,
            CoinKind::Krugerrand,
            CoinKind::GoldBar,
            CoinKind::Ethereum,
            CoinKind::Bitcoin,
            CoinKind::PlatinumCoin,
            CoinKind::Nft,
            CoinKind::MoonRock,
            CoinKind::Antimatter,
            CoinKind::StarFragment,
            CoinKind::Singularity,
        ]
    }

    /// The tier every fresh table starts with.
    pub fn starter() -> CoinKind {
        CoinKind::Penny
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn tier(self) -> &'static CoinTier {
        &COIN_TIERS[self.index()]
    }

    /// Stable id used in snapshots and by the presentation layer.
    pub fn id(self) -> &'static str {
        match self {
            CoinKind::Penny => "penny",
            CoinKind::Nickel => "nickel",
            CoinKind::Dime => "dime",
            CoinKind::Yen => "yen",
            CoinKind::Rupee => "rupee",
            CoinKind::Quarter => "quarter",
            CoinKind::Yuan => "yuan",
            CoinKind::HalfDollar => "halfDollar",
            CoinKind::Loonie => "loonie",
            CoinKind::Euro => "euro",
            CoinKind::Pound => "pound",
            CoinKind::Toonie => "toonie",
            CoinKind::Chip => "chip",
            CoinKind::TenDollar => "tenDollar",
            CoinKind::Doubloon => "doubloon",
            CoinKind::Krugerrand => "krugerrand",
            CoinKind::GoldBar => "goldBar",
            CoinKind::Ethereum => "ethereum",
            CoinKind::Bitcoin => "bitcoin",
            CoinKind::PlatinumCoin => "platinumCoin",
            CoinKind::Nft => "nft",
            CoinKind::MoonRock => "moonRock",
            CoinKind::Antimatter => "antimatter",
            CoinKind::StarFragment => "starFragment",
            CoinKind::Singularity => "singularity",
        }
    }
}

/// One step of table growth.
#[derive(Clone, Debug, PartialEq)]
pub struct TableMilestone {
    pub id: &'static str,
    pub name: &'static str,
    pub slot_count: usize,
    pub cost: f64,
    pub description: &'static str,
}

const fn milestone(
    id: &'static str,
    name: &'static str,
    slot_count: usize,
    cost: f64,
    description: &'static str,
) -> TableMilestone {
    TableMilestone {
        id,
        name,
        slot_count,
        cost,
        description,
    }
}

/// Ascending by slot count. The first entry is the starting table.
pub static TABLE_MILESTONES: [TableMilestone; 11] = [
    milestone("space0", "Coaster", 1, 0.0, "It's just a cardboard circle."),
    milestone("space1", "Mousepad", 2, 15.0, "Double the friction, double the fun."),
    milestone("space2", "Cafeteria Tray", 4, 150.0, "Smells like old french fries."),
    milestone("space3", "Coffee Table", 6, 500.0, "Perfect for casual flipping."),
    milestone("space4", "Card Table", 8, 1_200.0, "Felt surface for professional action."),
    milestone("space5", "Poker Table", 12, 5_000.0, "All-in on coin flips."),
    milestone("space6", "Craps Table", 16, 15_000.0, "High stakes require high surface area."),
    milestone("space7", "Roulette Wheel", 24, 75_000.0, "Spin to win, flip to profit."),
    milestone("space8", "Server Rack", 32, 500_000.0, "Digitized flipping slots. High density."),
    milestone("space9", "Mainframe", 48, 5_000_000.0, "Industrial-scale coin operations."),
    milestone("space10", "Quantum Array", 64, 50_000_000.0, "Superposition flipping technology."),
];

/// The milestone a fresh table starts at.
pub fn starting_milestone() -> &'static TableMilestone {
    &TABLE_MILESTONES[0]
}

/// The first milestone with more slots than `current_slots`, if any.
pub fn next_milestone(current_slots: usize) -> Option<&'static TableMilestone> {
    TABLE_MILESTONES
        .iter()
        .find(|m| m.slot_count > current_slots)
}

/// Which slots a tool flips when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Targeting {
    SingleSlot(usize),
    RandomSlot,
    FirstNSlots(usize),
    AllSlots,
}

/// Automation tools. Repeatable purchases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    FidgetFinger,
    ThumbTwitch,
    DrinkingBird,
    DealerHand,
    IndustrialFan,
    MechanicalArm,
    TeslaCoil,
    TimeDilator,
    QuantumTunneler,
    NanoSwarm,
    AiOverlord,
    GodHand,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolDefinition {
    pub id: ToolKind,
    pub name: &'static str,
    pub base_cost: f64,
    pub base_interval_ms: u32,
    pub targeting: Targeting,
    pub description: &'static str,
}

const fn tool(
    id: ToolKind,
    name: &'static str,
    base_cost: f64,
    base_interval_ms: u32,
    targeting: Targeting,
    description: &'static str,
) -> ToolDefinition {
    ToolDefinition {
        id,
        name,
        base_cost,
        base_interval_ms,
        targeting,
        description,
    }
}

pub static TOOLS: [ToolDefinition; 12] = [
    tool(ToolKind::FidgetFinger, "Fidget Finger", 50.0, 5_000, Targeting::SingleSlot(0), "Flips Slot #1 every 5s."),
    tool(ToolKind::ThumbTwitch, "Thumb Twitch", 100.0, 4_000, Targeting::SingleSlot(1), "Flips Slot #2 every 4s."),
    tool(ToolKind::DrinkingBird, "Drinking Bird", 250.0, 2_000, Targeting::RandomSlot, "Flips a Random Slot every 2s."),
    tool(ToolKind::DealerHand, "Dealer's Hand", 1_000.0, 3_000, Targeting::FirstNSlots(4), "Flips first 4 slots every 3s."),
    tool(ToolKind::IndustrialFan, "Industrial Fan", 5_000.0, 4_000, Targeting::AllSlots, "Flips ALL slots every 4s."),
    tool(ToolKind::MechanicalArm, "Mechanical Arm", 25_000.0, 2_000, Targeting::AllSlots, "Flips ALL slots every 2s."),
    tool(ToolKind::TeslaCoil, "Tesla Coil", 100_000.0, 1_000, Targeting::AllSlots, "Flips ALL slots every 1s."),
    tool(ToolKind::TimeDilator, "Time Dilator", 500_000.0, 500, Targeting::AllSlots, "Flips ALL slots 2x/sec."),
    tool(ToolKind::QuantumTunneler, "Quantum Tunneler", 2_500_000.0, 200, Targeting::AllSlots, "Flips ALL slots 5x/sec."),
    tool(ToolKind::NanoSwarm, "Nano Swarm", 10_000_000.0, 100, Targeting::AllSlots, "Flips ALL slots 10x/sec."),
    tool(ToolKind::AiOverlord, "AI Overlord", 100_000_000.0, 50, Targeting::AllSlots, "Flips ALL slots 20x/sec."),
    tool(ToolKind::GodHand, "God Hand", 1_000_000_000.0, 25, Targeting::AllSlots, "Flips ALL slots 40x/sec."),
];

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::FidgetFinger,
            ToolKind::ThumbTwitch,
            ToolKind::DrinkingBird,
            ToolKind::DealerHand,
            ToolKind::IndustrialFan,
            ToolKind::MechanicalArm,
            ToolKind::TeslaCoil,
            ToolKind::TimeDilator,
            ToolKind::QuantumTunneler,
            ToolKind::NanoSwarm,
            ToolKind::AiOverlord,
            ToolKind::GodHand,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static ToolDefinition {
        &TOOLS[self.index()]
    }

    pub fn id(self) -> &'static str {
        match self {
            ToolKind::FidgetFinger => "fidgetFinger",
            ToolKind::ThumbTwitch => "thumbTwitch",
            ToolKind::DrinkingBird => "drinkingBird",
            ToolKind::DealerHand => "dealerHand",
            ToolKind::IndustrialFan => "industrialFan",
            ToolKind::MechanicalArm => "mechanicalArm",
            ToolKind::TeslaCoil => "teslaCoil",
            ToolKind::TimeDilator => "timeDilator",
            ToolKind::QuantumTunneler => "quantumTunneler",
            ToolKind::NanoSwarm => "nanoSwarm",
            ToolKind::AiOverlord => "aiOverlord",
            ToolKind::GodHand => "godHand",
        }
    }
}

/// What an upgrade changes. Adding a variant forces the modifier
/// aggregation match to handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Added to the 50% Heads chance.
    HeadsBonus,
    /// Added to the payout multiplier bonus.
    ValueMultiplier,
    /// Added to the critical chance.
    CriticalChance,
    /// Fraction of the coin value paid on Tails. Best one wins.
    TailsSalvage,
    /// Added to the automation speed bonus.
    SpeedBonus,
    /// Multiplies the 100x critical payout. Best one wins.
    CriticalPayout,
    /// Heads in a row on one slot that earn a bonus flip. Shortest wins.
    HeadsStreak,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeEffect {
    pub kind: EffectKind,
    pub magnitude: f64,
}

/// One-time purchases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKind {
    WeightedZinc,
    MagnetCore,
    InsiderTrading,
    QuantumBias,
    PolishedEdges,
    GoldPlating,
    DiamondCoating,
    CosmicEnhancement,
    LuckyClover,
    RabbitFoot,
    Horseshoe,
    WishingWell,
    FloorMats,
    SafetyNet,
    InsurancePolicy,
    CaffeinePills,
    OverclockModule,
    TimeCompression,
    DoubleDown,
    LuckyStreak,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDefinition {
    pub id: UpgradeKind,
    pub name: &'static str,
    pub cost: f64,
    pub effect: UpgradeEffect,
    pub description: &'static str,
}

const fn upgrade(
    id: UpgradeKind,
    name: &'static str,
    cost: f64,
    kind: EffectKind,
    magnitude: f64,
    description: &'static str,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id,
        name,
        cost,
        effect: UpgradeEffect { kind, magnitude },
        description,
    }
}

pub static UPGRADES: [UpgradeDefinition; 20] = [
    // Luck
    upgrade(UpgradeKind::WeightedZinc, "Weighted Zinc", 100.0, EffectKind::HeadsBonus, 0.05, "Heads Chance +5%."),
    upgrade(UpgradeKind::MagnetCore, "Magnet Core", 2_500.0, EffectKind::HeadsBonus, 0.08, "Heads Chance +8%."),
    upgrade(UpgradeKind::InsiderTrading, "Insider Trading", 10_000.0, EffectKind::HeadsBonus, 0.10, "Heads Chance +10%."),
    upgrade(UpgradeKind::QuantumBias, "Quantum Bias", 100_000.0, EffectKind::HeadsBonus, 0.15, "Heads Chance +15%."),
    // Value
    upgrade(UpgradeKind::PolishedEdges, "Polished Edges", 500.0, EffectKind::ValueMultiplier, 0.10, "Coin Value +10%."),
    upgrade(UpgradeKind::GoldPlating, "Gold Plating", 5_000.0, EffectKind::ValueMultiplier, 0.25, "Coin Value +25%."),
    upgrade(UpgradeKind::DiamondCoating, "Diamond Coating", 50_000.0, EffectKind::ValueMultiplier, 0.50, "Coin Value +50%."),
    upgrade(UpgradeKind::CosmicEnhancement, "Cosmic Enhancement", 500_000.0, EffectKind::ValueMultiplier, 1.00, "Coin Value +100%."),
    // Critical
    upgrade(UpgradeKind::LuckyClover, "Lucky Clover", 750.0, EffectKind::CriticalChance, 0.01, "Crit Chance +1%."),
    upgrade(UpgradeKind::RabbitFoot, "Rabbit's Foot", 5_000.0, EffectKind::CriticalChance, 0.02, "Crit Chance +2%."),
    upgrade(UpgradeKind::Horseshoe, "Golden Horseshoe", 25_000.0, EffectKind::CriticalChance, 0.03, "Crit Chance +3%."),
    upgrade(UpgradeKind::WishingWell, "Wishing Well", 100_000.0, EffectKind::CriticalChance, 0.05, "Crit Chance +5%."),
    // Pity
    upgrade(UpgradeKind::FloorMats, "Floor Mats", 2_000.0, EffectKind::TailsSalvage, 0.10, "Tails pays 10% value."),
    upgrade(UpgradeKind::SafetyNet, "Safety Net", 15_000.0, EffectKind::TailsSalvage, 0.25, "Tails pays 25% value."),
    upgrade(UpgradeKind::InsurancePolicy, "Insurance Policy", 75_000.0, EffectKind::TailsSalvage, 0.50, "Tails pays 50% value."),
    // Speed
    upgrade(UpgradeKind::CaffeinePills, "Caffeine Pills", 4_000.0, EffectKind::SpeedBonus, 0.25, "Auto-flip 25% faster."),
    upgrade(UpgradeKind::OverclockModule, "Overclock Module", 25_000.0, EffectKind::SpeedBonus, 0.50, "Auto-flip 50% faster."),
    upgrade(UpgradeKind::TimeCompression, "Time Compression", 200_000.0, EffectKind::SpeedBonus, 1.00, "Auto-flip 100% faster."),
    // Special
    upgrade(UpgradeKind::DoubleDown, "Double Down", 50_000.0, EffectKind::CriticalPayout, 2.0, "Critical hits pay 200x instead of 100x."),
    upgrade(UpgradeKind::LuckyStreak, "Lucky Streak", 250_000.0, EffectKind::HeadsStreak, 3.0, "3 Heads in a row = bonus flip."),
];

impl UpgradeKind {
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::WeightedZinc,
            UpgradeKind::MagnetCore,
            UpgradeKind::InsiderTrading,
            UpgradeKind::QuantumBias,
            UpgradeKind::PolishedEdges,
            UpgradeKind::GoldPlating,
            UpgradeKind::DiamondCoating,
            UpgradeKind::CosmicEnhancement,
            UpgradeKind::LuckyClover,
            UpgradeKind::RabbitFoot,
            UpgradeKind::Horseshoe,
            UpgradeKind::WishingWell,
            UpgradeKind::FloorMats,
            UpgradeKind::SafetyNet,
            UpgradeKind::InsurancePolicy,
            UpgradeKind::CaffeinePills,
            UpgradeKind::OverclockModule,
            UpgradeKind::TimeCompression,
            UpgradeKind::DoubleDown,
            UpgradeKind::LuckyStreak,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static UpgradeDefinition {
        &UPGRADES[self.index()]
    }

    pub fn id(self) -> &'static str {
        match self {
            UpgradeKind::WeightedZinc => "weightedZinc",
            UpgradeKind::MagnetCore => "magnetCore",
            UpgradeKind::InsiderTrading => "insiderTrading",
            UpgradeKind::QuantumBias => "quantumBias",
            UpgradeKind::PolishedEdges => "polishedEdges",
            UpgradeKind::GoldPlating => "goldPlating",
            UpgradeKind::DiamondCoating => "diamondCoating",
            UpgradeKind::CosmicEnhancement => "cosmicEnhancement",
            UpgradeKind::LuckyClover => "luckyClover",
            UpgradeKind::RabbitFoot => "rabbitFoot",
            UpgradeKind::Horseshoe => "horseshoe",
            UpgradeKind::WishingWell => "wishingWell",
            UpgradeKind::FloorMats => "floorMats",
            UpgradeKind::SafetyNet => "safetyNet",
            UpgradeKind::InsurancePolicy => "insurancePolicy",
            UpgradeKind::CaffeinePills => "caffeinePills",
            UpgradeKind::OverclockModule => "overclockModule",
            UpgradeKind::TimeCompression => "timeCompression",
            UpgradeKind::DoubleDown => "doubleDown",
            UpgradeKind::LuckyStreak => "luckyStreak",
        }
    }
}

/// Milestones tracked over the whole career. Never reset by prestige.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstDollar,
    HundredFlips,
    ThousandFlips,
    LuckyStreak,
    BigMoney,
    MegaMoney,
}

/// What has to be true for an achievement to unlock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementGoal {
    LifetimeEarned(f64),
    TotalFlips(u64),
    /// Heads share of all flips, once at least `min_flips` were made.
    HeadsRate { min_flips: u64, rate: f64 },
}

impl AchievementGoal {
    pub fn is_met(&self, stats: &Stats, lifetime_earned: f64) -> bool {
        match *self {
            AchievementGoal::LifetimeEarned(amount) => lifetime_earned >= amount,
            AchievementGoal::TotalFlips(flips) => stats.total_flips >= flips,
            AchievementGoal::HeadsRate { min_flips, rate } => {
                stats.total_flips >= min_flips.max(1)
                    && stats.heads_count as f64 / stats.total_flips as f64 >= rate
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AchievementDefinition {
    pub id: AchievementKind,
    pub name: &'static str,
    pub description: &'static str,
    pub goal: AchievementGoal,
}

pub static ACHIEVEMENTS: [AchievementDefinition; 6] = [
    AchievementDefinition {
        id: AchievementKind::FirstDollar,
        name: "First Dollar",
        description: "Earn $1",
        goal: AchievementGoal::LifetimeEarned(1.0),
    },
    AchievementDefinition {
        id: AchievementKind::HundredFlips,
        name: "Century Club",
        description: "100 flips",
        goal: AchievementGoal::TotalFlips(100),
    },
    AchievementDefinition {
        id: AchievementKind::ThousandFlips,
        name: "Flip Master",
        description: "1,000 flips",
        goal: AchievementGoal::TotalFlips(1_000),
    },
    AchievementDefinition {
        id: AchievementKind::LuckyStreak,
        name: "Lucky Streak",
        description: "75% success rate with 100+ flips",
        goal: AchievementGoal::HeadsRate {
            min_flips: 100,
            rate: 0.75,
        },
    },
    AchievementDefinition {
        id: AchievementKind::BigMoney,
        name: "High Roller",
        description: "Earn $1,000",
        goal: AchievementGoal::LifetimeEarned(1_000.0),
    },
    AchievementDefinition {
        id: AchievementKind::MegaMoney,
        name: "Tycoon",
        description: "Earn $100,000",
        goal: AchievementGoal::LifetimeEarned(100_000.0),
    },
];

impl AchievementKind {
    pub fn all() -> &'static [AchievementKind] {
        &[
            AchievementKind::FirstDollar,
            AchievementKind::HundredFlips,
            AchievementKind::ThousandFlips,
            AchievementKind::LuckyStreak,
            AchievementKind::BigMoney,
            AchievementKind::MegaMoney,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static AchievementDefinition {
        &ACHIEVEMENTS[self.index()]
    }

    pub fn id(self) -> &'static str {
        match self {
            AchievementKind::FirstDollar => "first_dollar",
            AchievementKind::HundredFlips => "hundred_flips",
            AchievementKind::ThousandFlips => "thousand_flips",
            AchievementKind::LuckyStreak => "lucky_streak",
            AchievementKind::BigMoney => "big_money",
            AchievementKind::MegaMoney => "mega_money",
        }
    }
}

macro_rules! catalog_id_impls {
    ($($kind:ident),+) => {$(
        impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl FromStr for $kind {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $kind::all()
                    .iter()
                    .copied()
                    .find(|k| k.id() == s)
                    .ok_or_else(|| EngineError::InvalidReference(s.to_string()))
            }
        }
    )+};
}

catalog_id_impls!(CoinKind, ToolKind, UpgradeKind, AchievementKind);
