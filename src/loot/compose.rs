use crate::loot::catalog::CatalogRegistry;
use crate::loot::error::Result;
use crate::loot::fallback::{FallbackPolicy, TableKind};
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier};
use crate::loot::weights::WeightTable;
use serde::{Deserialize, Serialize};

/// Distances above this favour dangerous factions.
pub const FAR_DISTANCE: f64 = 0.7;
/// Distances below this favour tame factions.
pub const NEAR_DISTANCE: f64 = 0.3;

/// How an unpinned faction is chosen. The two are alternatives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactionStrategy {
    /// Each faction's authored weight for the ship tier.
    #[default]
    TierBiased,
    /// Each faction's danger modifier, read against distance from base.
    DistanceBiased,
}

/// Faction weight for a distance from base in `[0, 1]`.
pub fn distance_bias(danger_modifier: f64, distance: Option<f64>) -> f64 {
    match distance {
        Some(d) if d > FAR_DISTANCE => danger_modifier,
        Some(d) if d < NEAR_DISTANCE => 2.0 - danger_modifier,
        _ => 1.0,
    }
}

/// Builds fresh weight tables from catalog profiles.
///
/// Nothing here mutates the catalog, and every call returns a new table, so
/// compositions for different contexts never share state.
#[derive(Clone, Copy, Debug)]
pub struct ModifierComposer<'a> {
    catalog: &'a CatalogRegistry,
}

impl<'a> ModifierComposer<'a> {
    pub fn new(catalog: &'a CatalogRegistry) -> Self {
        Self { catalog }
    }

    /// base × ship × container × faction, per rarity tier.
    pub fn rarity_table(
        &self,
        ship_tier: u8,
        container: ContainerKind,
        faction: Option<&str>,
    ) -> Result<WeightTable<RarityTier>> {
        let ship = self.catalog.ship_profile(ship_tier)?;
        let container = self.catalog.container_profile(container)?;
        let faction = faction
            .map(|code| self.catalog.faction_profile(code))
            .transpose()?;
        let base = self.catalog.base_rarity_weights();

        let mut table = WeightTable::new(TableKind::Rarity, FallbackPolicy::RARITY);
        for tier in RarityTier::ALL {
            let faction_factor = faction.map_or(1.0, |f| f.rarity_modifiers.get(tier));
            let weight = base.get(tier)
                * ship.rarity_modifiers.get(tier)
                * container.rarity_modifiers.get(tier)
                * faction_factor;
            table.push(tier, weight);
        }
        Ok(table)
    }

    /// container × faction, per item category.
    pub fn category_table(
        &self,
        container: ContainerKind,
        faction: Option<&str>,
    ) -> Result<WeightTable<ItemCategory>> {
        let container = self.catalog.container_profile(container)?;
        let faction = faction
            .map(|code| self.catalog.faction_profile(code))
            .transpose()?;

        let mut table = WeightTable::new(TableKind::Category, FallbackPolicy::CATEGORY);
        for category in ItemCategory::ALL {
            let faction_factor = faction.map_or(1.0, |f| f.category_weights.get(category));
            table.push(category, container.category_weights.get(category) * faction_factor);
        }
        Ok(table)
    }

    /// One entry per registered faction, or `None` when there are none.
    pub fn faction_table(
        &self,
        strategy: FactionStrategy,
        ship_tier: u8,
        distance: Option<f64>,
    ) -> Option<WeightTable<String>> {
        let fallback = FallbackPolicy::faction(self.catalog)?;
        let mut table = WeightTable::new(TableKind::Faction, fallback.to_string());
        for faction in self.catalog.factions() {
            let weight = match strategy {
                FactionStrategy::TierBiased => faction.tier_weights.get(ship_tier),
                FactionStrategy::DistanceBiased => {
                    distance_bias(faction.danger_modifier, distance)
                }
            };
            table.push(faction.code.clone(), weight);
        }
        Some(table)
    }
}
