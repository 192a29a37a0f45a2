use crate::loot::catalog::{
    CatalogConfig, ContainerProfile, FactionProfile, ItemProfile, ShipProfile,
};
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier, WeightMap};

use ContainerKind::*;
use ItemCategory::*;
use RarityTier::*;

const BASE_RARITY: [f64; 5] = [60.0, 25.0, 10.0, 4.0, 1.0];

// Rarity modifiers are listed Common..Legendary.
const SHIPS: &[(u8, [f64; 5], &[(ContainerKind, f64)])] = &[
    (
        1,
        [1.5, 0.8, 0.3, 0.1, 0.0],
        &[(ScrapPile, 5.0), (SupplyCrate, 3.0), (CargoHold, 1.0)],
    ),
    (
        2,
        [1.2, 1.0, 0.6, 0.25, 0.05],
        &[
            (ScrapPile, 3.0),
            (SupplyCrate, 4.0),
            (CargoHold, 2.0),
            (SecureLocker, 1.0),
        ],
    ),
    (
        3,
        [1.0, 1.0, 1.0, 0.6, 0.2],
        &[
            (ScrapPile, 2.0),
            (SupplyCrate, 3.0),
            (CargoHold, 3.0),
            (SecureLocker, 2.0),
            (Vault, 0.5),
        ],
    ),
    (
        4,
        [0.7, 1.0, 1.3, 1.0, 0.5],
        &[
            (SupplyCrate, 2.0),
            (CargoHold, 3.0),
            (SecureLocker, 3.0),
            (Vault, 1.5),
        ],
    ),
    (
        5,
        [0.4, 0.8, 1.5, 1.6, 1.0],
        &[(CargoHold, 2.0), (SecureLocker, 3.0), (Vault, 3.0)],
    ),
];

// Category weights are listed Scrap, Component, Valuable, Module, Artifact.
const CONTAINERS: &[(ContainerKind, [f64; 5], [f64; 5])] = &[
    (ScrapPile, [1.3, 1.0, 0.6, 0.3, 0.05], [6.0, 2.0, 0.5, 0.2, 0.05]),
    (SupplyCrate, [1.2, 1.2, 0.8, 0.4, 0.1], [3.0, 4.0, 1.0, 0.5, 0.1]),
    (CargoHold, [1.0, 1.1, 1.0, 0.7, 0.3], [2.0, 3.0, 3.0, 1.0, 0.3]),
    (SecureLocker, [0.6, 1.0, 1.4, 1.2, 0.6], [0.5, 2.0, 3.0, 3.0, 0.8]),
    (Vault, [0.3, 0.7, 1.5, 1.8, 1.5], [0.0, 1.0, 4.0, 3.0, 2.0]),
];

struct FactionSeed {
    code: &'static str,
    name: &'static str,
    tier_weights: &'static [(u8, f64)],
    danger: f64,
    rarity: &'static [(RarityTier, f64)],
    categories: &'static [(ItemCategory, f64)],
}

const FACTIONS: &[FactionSeed] = &[
    FactionSeed {
        code: "CCG",
        name: "Colonial Commerce Guild",
        tier_weights: &[(1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0), (5, 0.5)],
        danger: 0.5,
        rarity: &[(Uncommon, 1.2)],
        categories: &[(Component, 1.2), (Valuable, 1.5)],
    },
    FactionSeed {
        code: "NEX",
        name: "Nexus Corporation",
        tier_weights: &[(1, 1.0), (2, 2.0), (3, 3.0), (4, 3.0), (5, 2.0)],
        danger: 1.0,
        rarity: &[(Rare, 1.2), (Epic, 1.1)],
        categories: &[(Component, 1.5), (Module, 1.3)],
    },
    FactionSeed {
        code: "VOID",
        name: "Void Reavers",
        tier_weights: &[(1, 0.5), (2, 1.0), (3, 1.5), (4, 2.0), (5, 3.0)],
        danger: 1.8,
        rarity: &[(Epic, 1.3), (Legendary, 1.5)],
        categories: &[(Scrap, 0.8), (Module, 1.5), (Artifact, 1.4)],
    },
    FactionSeed {
        code: "IND",
        name: "Independent Salvagers",
        tier_weights: &[],
        danger: 1.0,
        rarity: &[],
        categories: &[(Scrap, 1.3)],
    },
];

// id, name, category, rarity, exclusive faction, drop weight, value
type ItemSeed = (
    &'static str,
    &'static str,
    ItemCategory,
    RarityTier,
    Option<&'static str>,
    f64,
    u32,
);

const ITEMS: &[ItemSeed] = &[
    ("scrap_metal", "Scrap Metal", Scrap, Common, None, 2.0, 5),
    ("scrap_plastics", "Scrap Plastics", Scrap, Common, None, 1.5, 4),
    ("scrap_electronics", "Scrap Electronics", Scrap, Common, None, 1.0, 8),
    ("scrap_mechanical", "Scrap Mechanical", Scrap, Common, None, 1.0, 7),
    ("wire_bundle", "Wire Bundle", Scrap, Common, None, 1.0, 6),
    ("hull_fragment", "Hull Fragment", Scrap, Common, None, 1.5, 5),
    ("corroded_pipe", "Corroded Pipe", Scrap, Common, None, 1.0, 3),
    ("broken_lens", "Broken Lens", Scrap, Common, None, 0.8, 6),
    ("copper_wire", "Copper Wire", Scrap, Uncommon, None, 1.0, 15),
    ("coolant_tube", "Coolant Tube", Scrap, Uncommon, None, 1.0, 18),
    ("data_chip", "Data Chip", Component, Uncommon, None, 1.2, 25),
    ("fuel_cell", "Fuel Cell", Component, Uncommon, None, 1.0, 30),
    ("med_kit", "Med Kit", Component, Uncommon, None, 1.0, 28),
    ("oxygen_canister", "Oxygen Canister", Component, Uncommon, None, 1.0, 20),
    ("nav_beacon", "Nav Beacon", Component, Uncommon, None, 0.8, 32),
    ("encrypted_drive", "Encrypted Drive", Component, Rare, None, 1.0, 80),
    ("processor_unit", "Processor Unit", Component, Rare, None, 1.0, 75),
    ("plasma_coil", "Plasma Coil", Component, Rare, None, 1.0, 90),
    ("cryo_sample", "Cryo Sample", Component, Rare, None, 0.8, 85),
    ("nav_computer", "Nav Computer", Component, Rare, None, 0.8, 95),
    ("targeting_array", "Targeting Array", Component, Rare, Some("NEX"), 0.8, 110),
    ("quantum_cpu", "Quantum CPU", Component, Epic, None, 1.0, 240),
    ("fusion_cell", "Fusion Cell", Component, Epic, None, 1.0, 220),
    ("quantum_core", "Quantum Core", Component, Epic, Some("NEX"), 0.6, 300),
    ("rare_alloy", "Rare Alloy", Valuable, Rare, None, 1.0, 120),
    ("gold_bar", "Gold Bar", Valuable, Epic, Some("CCG"), 1.0, 350),
    ("dark_matter_vial", "Dark Matter Vial", Valuable, Epic, Some("VOID"), 0.7, 420),
    ("weapon_core", "Weapon Core", Module, Rare, None, 1.0, 140),
    ("stealth_plating", "Stealth Plating", Module, Rare, Some("VOID"), 0.8, 160),
    ("module_engine_booster", "Engine Booster Module", Module, Epic, None, 1.0, 280),
    ("module_laser_amp", "Laser Amplifier Module", Module, Epic, Some("VOID"), 1.0, 300),
    ("module_scanner", "Scanner Module", Module, Epic, Some("NEX"), 1.0, 260),
    ("module_shield", "Shield Module", Module, Epic, Some("CCG"), 1.0, 290),
    ("module_targeting", "Targeting Module", Module, Epic, None, 1.0, 270),
    ("module_thrusters", "Thruster Module", Module, Epic, None, 1.0, 250),
    ("gravity_dampener", "Gravity Dampener", Module, Epic, Some("NEX"), 0.6, 330),
    ("prototype_engine", "Prototype Engine", Module, Legendary, Some("NEX"), 1.0, 900),
    ("singularity_gem", "Singularity Gem", Artifact, Legendary, None, 0.8, 1200),
    ("ancient_relic", "Ancient Relic", Artifact, Legendary, None, 1.0, 1000),
    ("alien_artifact", "Alien Artifact", Artifact, Legendary, None, 1.0, 1100),
    ("void_shard", "Void Shard", Artifact, Legendary, Some("VOID"), 0.7, 1300),
    ("captains_log", "Captain's Log", Artifact, Legendary, None, 1.2, 800),
];

fn per_rarity(values: [f64; 5]) -> WeightMap<RarityTier> {
    RarityTier::ALL.into_iter().zip(values).collect()
}

fn per_category(values: [f64; 5]) -> WeightMap<ItemCategory> {
    ItemCategory::ALL.into_iter().zip(values).collect()
}

/// Authored catalog shipped with the game.
pub fn builtin_config() -> CatalogConfig {
    let ships = SHIPS
        .iter()
        .map(|(tier, rarity, containers)| ShipProfile {
            tier: *tier,
            rarity_modifiers: per_rarity(*rarity),
            container_weights: containers.to_vec(),
        })
        .collect();

    let containers = CONTAINERS
        .iter()
        .map(|(kind, rarity, categories)| ContainerProfile {
            kind: *kind,
            rarity_modifiers: per_rarity(*rarity),
            category_weights: per_category(*categories),
        })
        .collect();

    let factions = FACTIONS
        .iter()
        .map(|seed| FactionProfile {
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            tier_weights: seed.tier_weights.iter().copied().collect(),
            danger_modifier: seed.danger,
            rarity_modifiers: seed.rarity.iter().copied().collect(),
            category_weights: seed.categories.iter().copied().collect(),
        })
        .collect();

    let items = ITEMS
        .iter()
        .map(
            |(id, name, category, rarity, exclusive, drop_weight, value)| ItemProfile {
                id: id.to_string(),
                name: name.to_string(),
                category: *category,
                rarity: *rarity,
                faction_exclusive: exclusive.map(str::to_string),
                drop_weight: *drop_weight,
                value: *value,
            },
        )
        .collect();

    CatalogConfig {
        base_rarity_weights: per_rarity(BASE_RARITY),
        ships,
        containers,
        factions,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::catalog::{CatalogRegistry, FactionFilter};

    #[test]
    fn builtin_config_validates() {
        let catalog = CatalogRegistry::from_config(builtin_config()).unwrap();
        assert_eq!(catalog.factions()[0].code, "CCG");
        assert_eq!(catalog.items().len(), ITEMS.len());
    }

    #[test]
    fn every_faction_exclusive_has_a_neutral_alternative_or_lower_tier() {
        let catalog = CatalogRegistry::builtin();
        for item in catalog.items() {
            if item.faction_exclusive.is_none() {
                continue;
            }
            let neutral = catalog.items_matching(item.category, item.rarity, FactionFilter::Neutral);
            let below = item
                .rarity
                .step_down()
                .map(|r| catalog.items_matching(item.category, r, FactionFilter::Unrestricted))
                .unwrap_or_default();
            assert!(
                !neutral.is_empty() || !below.is_empty(),
                "{} leaves its slot empty for other factions",
                item.id
            );
        }
    }

    #[test]
    fn tier_one_forbids_legendary() {
        let config = builtin_config();
        let tier_one = config.ships.iter().find(|s| s.tier == 1).unwrap();
        assert_eq!(tier_one.rarity_modifiers.get(Legendary), 0.0);
    }
}
