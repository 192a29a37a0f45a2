use crate::loot::catalog::CatalogRegistry;
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier};
use crate::loot::weights::WeightTable;
use std::fmt;

/// Which pipeline table a draw is made from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    Container,
    Faction,
    Rarity,
    Category,
    Item,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Container => "container",
            TableKind::Faction => "faction",
            TableKind::Rarity => "rarity",
            TableKind::Category => "category",
            TableKind::Item => "item",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Substitute outcomes for tables whose total weight is not positive.
///
/// Every table built by the crate takes its fallback key from here; call
/// sites never pick their own default.
pub struct FallbackPolicy;

impl FallbackPolicy {
    pub const CONTAINER: ContainerKind = ContainerKind::ScrapPile;
    pub const RARITY: RarityTier = RarityTier::Common;
    pub const CATEGORY: ItemCategory = ItemCategory::Scrap;

    /// First faction in catalog order, or `None` for a catalog without factions.
    pub fn faction(catalog: &CatalogRegistry) -> Option<&str> {
        catalog.factions().first().map(|f| f.code.as_str())
    }

    /// First candidate in query order.
    pub fn item<'a>(candidates: &[(&'a str, f64)]) -> Option<&'a str> {
        candidates.first().map(|(id, _)| *id)
    }

    /// Table used for a ship whose profile authors no container weights.
    pub fn container_table() -> WeightTable<ContainerKind> {
        WeightTable::from_entries(
            TableKind::Container,
            vec![(Self::CONTAINER, 0.0)],
            Self::CONTAINER,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::weights::ScriptedRng;

    #[test]
    fn default_container_table_is_single_basic_entry() {
        let table = FallbackPolicy::container_table();
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.total(), 0.0);

        for u in [0.0, 0.25, 0.5, 0.999_999] {
            let mut rng = ScriptedRng::new(&[u]);
            assert_eq!(table.draw(&mut rng), ContainerKind::ScrapPile);
        }
    }

    #[test]
    fn item_fallback_is_first_candidate() {
        let candidates = [("void_shard", 0.0), ("ancient_relic", 0.0)];
        assert_eq!(FallbackPolicy::item(&candidates), Some("void_shard"));
        assert_eq!(FallbackPolicy::item(&[]), None);
    }
}
