use crate::loot::content;
use crate::loot::error::{LootError, MissingProfile, Result};
use crate::loot::fallback::{FallbackPolicy, TableKind};
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier, WeightMap};
use crate::loot::weights::WeightTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MIN_SHIP_TIER: u8 = 1;
pub const MAX_SHIP_TIER: u8 = 5;
pub const MAX_DANGER_MODIFIER: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipProfile {
    pub tier: u8,
    #[serde(default)]
    pub rarity_modifiers: WeightMap<RarityTier>,
    /// Ordered container table for this tier.
    #[serde(default)]
    pub container_weights: Vec<(ContainerKind, f64)>,
}

impl ShipProfile {
    pub fn container_table(&self) -> WeightTable<ContainerKind> {
        if self.container_weights.is_empty() {
            return FallbackPolicy::container_table();
        }
        WeightTable::from_entries(
            TableKind::Container,
            self.container_weights.clone(),
            FallbackPolicy::CONTAINER,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProfile {
    pub kind: ContainerKind,
    #[serde(default)]
    pub rarity_modifiers: WeightMap<RarityTier>,
    #[serde(default)]
    pub category_weights: WeightMap<ItemCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionProfile {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tier_weights: WeightMap<u8>,
    /// Above 1.0 the faction haunts the far reaches, below 1.0 it stays close to base.
    #[serde(default = "neutral_danger")]
    pub danger_modifier: f64,
    #[serde(default)]
    pub rarity_modifiers: WeightMap<RarityTier>,
    #[serde(default)]
    pub category_weights: WeightMap<ItemCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: ItemCategory,
    pub rarity: RarityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_exclusive: Option<String>,
    #[serde(default = "default_drop_weight")]
    pub drop_weight: f64,
    #[serde(default)]
    pub value: u32,
}

fn neutral_danger() -> f64 {
    1.0
}

fn default_drop_weight() -> f64 {
    1.0
}

/// Authored catalog content as it appears on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_rarity_weights: WeightMap<RarityTier>,
    #[serde(default)]
    pub ships: Vec<ShipProfile>,
    #[serde(default)]
    pub containers: Vec<ContainerProfile>,
    #[serde(default)]
    pub factions: Vec<FactionProfile>,
    #[serde(default)]
    pub items: Vec<ItemProfile>,
}

/// Which faction-exclusive items an item query admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactionFilter<'a> {
    /// Unlocked items plus those exclusive to this faction.
    Matching(&'a str),
    /// Unlocked items only.
    Neutral,
    /// Every item, whoever it is locked to.
    Unrestricted,
}

impl FactionFilter<'_> {
    pub fn admits(&self, item: &ItemProfile) -> bool {
        match (self, item.faction_exclusive.as_deref()) {
            (FactionFilter::Unrestricted, _) => true,
            (_, None) => true,
            (FactionFilter::Matching(code), Some(owner)) => *code == owner,
            (FactionFilter::Neutral, Some(_)) => false,
        }
    }
}

/// Read-only store of every profile a roll may consult.
///
/// Built once before the first roll and shared by reference afterwards.
#[derive(Clone, Debug)]
pub struct CatalogRegistry {
    base_rarity_weights: WeightMap<RarityTier>,
    ships: BTreeMap<u8, ShipProfile>,
    containers: BTreeMap<ContainerKind, ContainerProfile>,
    factions: Vec<FactionProfile>,
    items: Vec<ItemProfile>,
}

impl CatalogRegistry {
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        validate(&config)?;
        let catalog = Self::assemble(config);
        log::info!(
            "catalog loaded: {} ships, {} containers, {} factions, {} items",
            catalog.ships.len(),
            catalog.containers.len(),
            catalog.factions.len(),
            catalog.items.len()
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// The content shipped with the game.
    pub fn builtin() -> Self {
        Self::assemble(content::builtin_config())
    }

    fn assemble(config: CatalogConfig) -> Self {
        let items = config
            .items
            .into_iter()
            .map(|mut item| {
                item.faction_exclusive = item.faction_exclusive.filter(|code| !code.is_empty());
                item
            })
            .collect();

        Self {
            base_rarity_weights: config.base_rarity_weights,
            ships: config.ships.into_iter().map(|s| (s.tier, s)).collect(),
            containers: config.containers.into_iter().map(|c| (c.kind, c)).collect(),
            factions: config.factions,
            items,
        }
    }

    pub fn to_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_rarity_weights: self.base_rarity_weights.clone(),
            ships: self.ships.values().cloned().collect(),
            containers: self.containers.values().cloned().collect(),
            factions: self.factions.clone(),
            items: self.items.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_config())?)
    }

    pub fn base_rarity_weights(&self) -> &WeightMap<RarityTier> {
        &self.base_rarity_weights
    }

    pub fn ship_profile(&self, tier: u8) -> Result<&ShipProfile> {
        self.ships
            .get(&tier)
            .ok_or(LootError::InvalidCatalog(MissingProfile::ShipTier(tier)))
    }

    pub fn container_profile(&self, kind: ContainerKind) -> Result<&ContainerProfile> {
        self.containers
            .get(&kind)
            .ok_or(LootError::InvalidCatalog(MissingProfile::Container(kind)))
    }

    pub fn faction_profile(&self, code: &str) -> Result<&FactionProfile> {
        self.factions
            .iter()
            .find(|f| f.code == code)
            .ok_or_else(|| LootError::InvalidCatalog(MissingProfile::Faction(code.to_string())))
    }

    /// Factions in registration order.
    pub fn factions(&self) -> &[FactionProfile] {
        &self.factions
    }

    pub fn items(&self) -> &[ItemProfile] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&ItemProfile> {
        self.items.iter().find(|item| item.id == id)
    }

    /// `(item id, drop weight)` for every item in the slot, in catalog order.
    pub fn items_matching(
        &self,
        category: ItemCategory,
        rarity: RarityTier,
        filter: FactionFilter<'_>,
    ) -> Vec<(&str, f64)> {
        self.items
            .iter()
            .filter(|item| item.category == category && item.rarity == rarity)
            .filter(|item| filter.admits(item))
            .map(|item| (item.id.as_str(), item.drop_weight))
            .collect()
    }
}

fn check_weight(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LootError::Config(format!(
            "{what} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn check_map<K: Ord + Copy + std::fmt::Debug>(owner: &str, map: &WeightMap<K>) -> Result<()> {
    for (key, value) in map.entries() {
        check_weight(&format!("{owner} entry {key:?}"), value)?;
    }
    Ok(())
}

fn validate(config: &CatalogConfig) -> Result<()> {
    check_map("base rarity weights", &config.base_rarity_weights)?;

    let mut tiers = HashSet::new();
    for ship in &config.ships {
        if !(MIN_SHIP_TIER..=MAX_SHIP_TIER).contains(&ship.tier) {
            return Err(LootError::Config(format!(
                "ship tier {} outside {MIN_SHIP_TIER}..={MAX_SHIP_TIER}",
                ship.tier
            )));
        }
        if !tiers.insert(ship.tier) {
            return Err(LootError::Config(format!("duplicate ship tier {}", ship.tier)));
        }
        let owner = format!("ship tier {}", ship.tier);
        check_map(&owner, &ship.rarity_modifiers)?;
        for (kind, weight) in &ship.container_weights {
            check_weight(&format!("{owner} container weight {kind:?}"), *weight)?;
        }
    }

    let mut kinds = HashSet::new();
    for container in &config.containers {
        if !kinds.insert(container.kind) {
            return Err(LootError::Config(format!(
                "duplicate container profile {:?}",
                container.kind
            )));
        }
        let owner = format!("container {:?}", container.kind);
        check_map(&owner, &container.rarity_modifiers)?;
        check_map(&owner, &container.category_weights)?;
    }

    // Every kind a ship can draw, including the fallback, needs a profile.
    for ship in &config.ships {
        let table = ship.container_table();
        for (kind, _) in table.entries() {
            if !kinds.contains(kind) {
                return Err(LootError::Config(format!(
                    "ship tier {} draws container {kind:?} with no profile",
                    ship.tier
                )));
            }
        }
        if table.is_degenerate() && !kinds.contains(table.fallback()) {
            return Err(LootError::Config(format!(
                "ship tier {} has no positive container weight and no {:?} profile to fall back on",
                ship.tier,
                table.fallback()
            )));
        }
    }

    let mut codes = HashSet::new();
    for faction in &config.factions {
        if faction.code.is_empty() {
            return Err(LootError::Config("faction with empty code".to_string()));
        }
        if !codes.insert(faction.code.as_str()) {
            return Err(LootError::Config(format!("duplicate faction {:?}", faction.code)));
        }
        let owner = format!("faction {}", faction.code);
        check_map(&owner, &faction.tier_weights)?;
        check_map(&owner, &faction.rarity_modifiers)?;
        check_map(&owner, &faction.category_weights)?;
        check_weight(&format!("{owner} danger modifier"), faction.danger_modifier)?;
        if faction.danger_modifier > MAX_DANGER_MODIFIER {
            return Err(LootError::Config(format!(
                "{owner} danger modifier {} above {MAX_DANGER_MODIFIER}",
                faction.danger_modifier
            )));
        }
    }

    let mut ids = HashSet::new();
    for item in &config.items {
        if !ids.insert(item.id.as_str()) {
            return Err(LootError::Config(format!("duplicate item id {:?}", item.id)));
        }
        check_weight(&format!("item {} drop weight", item.id), item.drop_weight)?;
        match item.faction_exclusive.as_deref() {
            Some(code) if !code.is_empty() && !codes.contains(code) => {
                return Err(LootError::Config(format!(
                    "item {} is exclusive to unknown faction {code:?}",
                    item.id
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
