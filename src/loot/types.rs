use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Quality bucket of a reward. Declaration order is rarity order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    pub const ALL: [RarityTier; 5] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// One tier less rare, or `None` at Common.
    pub fn step_down(self) -> Option<RarityTier> {
        match self {
            RarityTier::Common => None,
            RarityTier::Uncommon => Some(RarityTier::Common),
            RarityTier::Rare => Some(RarityTier::Uncommon),
            RarityTier::Epic => Some(RarityTier::Rare),
            RarityTier::Legendary => Some(RarityTier::Epic),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Scrap,
    Component,
    Valuable,
    Module,
    Artifact,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Scrap,
        ItemCategory::Component,
        ItemCategory::Valuable,
        ItemCategory::Module,
        ItemCategory::Artifact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Scrap => "Scrap",
            ItemCategory::Component => "Component",
            ItemCategory::Valuable => "Valuable",
            ItemCategory::Module => "Module",
            ItemCategory::Artifact => "Artifact",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of searchable container found aboard a derelict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    ScrapPile,
    SupplyCrate,
    CargoHold,
    SecureLocker,
    Vault,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 5] = [
        ContainerKind::ScrapPile,
        ContainerKind::SupplyCrate,
        ContainerKind::CargoHold,
        ContainerKind::SecureLocker,
        ContainerKind::Vault,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::ScrapPile => "Scrap Pile",
            ContainerKind::SupplyCrate => "Supply Crate",
            ContainerKind::CargoHold => "Cargo Hold",
            ContainerKind::SecureLocker => "Secure Locker",
            ContainerKind::Vault => "Vault",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sparse per-key weights or multipliers.
///
/// A key with no authored entry reads as `1.0`, so a missing modifier is
/// neutral. Only an explicitly authored `0.0` forbids an outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound(deserialize = "K: Ord + Deserialize<'de>"))]
pub struct WeightMap<K>(BTreeMap<K, f64>);

impl<K: Ord> Default for WeightMap<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> WeightMap<K> {
    pub const NEUTRAL: f64 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: K, value: f64) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn get(&self, key: K) -> f64 {
        self.0.get(&key).copied().unwrap_or(Self::NEUTRAL)
    }

    pub fn entries(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Ord> FromIterator<(K, f64)> for WeightMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
