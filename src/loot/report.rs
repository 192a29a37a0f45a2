use crate::loot::error::Result;
use crate::loot::pipeline::{LootPipeline, Relaxation, RollContext, RollResult};
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Outcome counts over a batch of rolls.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub rolls: usize,
    pub rarity: BTreeMap<RarityTier, usize>,
    pub category: BTreeMap<ItemCategory, usize>,
    pub containers: BTreeMap<ContainerKind, usize>,
    pub factions: BTreeMap<String, usize>,
    pub nothing: usize,
    pub relaxed: usize,
}

impl Distribution {
    /// Rolls `ctx` with seeds `ctx.seed`, `ctx.seed + 1`, ...
    pub fn sample(pipeline: &LootPipeline<'_>, ctx: &RollContext, rolls: usize) -> Result<Self> {
        let mut dist = Self::default();
        for offset in 0..rolls as u64 {
            let seeded = RollContext {
                seed: ctx.seed.wrapping_add(offset),
                ..ctx.clone()
            };
            dist.record(&pipeline.roll_loot(&seeded)?);
        }
        Ok(dist)
    }

    pub fn record(&mut self, result: &RollResult) {
        self.rolls += 1;
        *self.rarity.entry(result.rarity).or_default() += 1;
        *self.category.entry(result.category).or_default() += 1;
        *self.containers.entry(result.container_kind).or_default() += 1;
        let faction = result.faction_code.as_deref().unwrap_or("none");
        *self.factions.entry(faction.to_string()).or_default() += 1;
        if result.item.is_nothing() {
            self.nothing += 1;
        }
        if !matches!(result.relaxation, Relaxation::Strict | Relaxation::Exhausted) {
            self.relaxed += 1;
        }
    }

    fn share(&self, count: usize) -> f64 {
        if self.rolls == 0 {
            0.0
        } else {
            count as f64 / self.rolls as f64
        }
    }

    pub fn rarity_share(&self, tier: RarityTier) -> f64 {
        self.share(self.rarity.get(&tier).copied().unwrap_or(0))
    }

    pub fn category_share(&self, category: ItemCategory) -> f64 {
        self.share(self.category.get(&category).copied().unwrap_or(0))
    }
}

pub fn loot_report(pipeline: &LootPipeline<'_>, ctx: &RollContext, rolls: usize) -> Result<String> {
    let dist = Distribution::sample(pipeline, ctx, rolls)?;

    let mut output = String::new();
    let _ = writeln!(
        output,
        "Loot report: tier {} ship, {} rolls (seed {})",
        ctx.ship_tier, dist.rolls, ctx.seed
    );

    // Expected odds only make sense once container and faction are fixed.
    let expected = match ctx.container_kind {
        Some(kind) => {
            let composer = pipeline.composer();
            let faction = ctx.faction_code.as_deref();
            Some((
                composer.rarity_table(ctx.ship_tier, kind, faction)?,
                composer.category_table(kind, faction)?,
            ))
        }
        None => None,
    };

    let _ = writeln!(output, "Rarity:");
    for tier in RarityTier::ALL {
        let odds = expected
            .as_ref()
            .map(|(rarity, _)| format!(" (expected {:.2}%)", rarity.probability(&tier) * 100.0))
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "  {:<10} {:>6.2}%{}",
            tier.label(),
            dist.rarity_share(tier) * 100.0,
            odds
        );
    }

    let _ = writeln!(output, "Category:");
    for category in ItemCategory::ALL {
        let odds = expected
            .as_ref()
            .map(|(_, cats)| format!(" (expected {:.2}%)", cats.probability(&category) * 100.0))
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "  {:<10} {:>6.2}%{}",
            category.label(),
            dist.category_share(category) * 100.0,
            odds
        );
    }

    let containers = dist
        .containers
        .iter()
        .map(|(kind, n)| format!("{kind}={n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(output, "Containers: {containers}");

    let factions = dist
        .factions
        .iter()
        .map(|(code, n)| format!("{code}={n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(output, "Factions: {factions}");

    let _ = writeln!(
        output,
        "Relaxed item queries: {}, currency only: {}",
        dist.relaxed, dist.nothing
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::catalog::CatalogRegistry;

    #[test]
    fn sampled_rarities_track_composed_odds() {
        let catalog = CatalogRegistry::builtin();
        let pipeline = LootPipeline::new(&catalog);
        let ctx = RollContext::new(3, 1_000)
            .in_container(ContainerKind::CargoHold)
            .with_faction("IND");

        let dist = Distribution::sample(&pipeline, &ctx, 20_000).unwrap();
        let table = pipeline
            .composer()
            .rarity_table(3, ContainerKind::CargoHold, Some("IND"))
            .unwrap();

        assert_eq!(dist.rolls, 20_000);
        for tier in RarityTier::ALL {
            let expected = table.probability(&tier);
            let observed = dist.rarity_share(tier);
            assert!(
                (observed - expected).abs() < 0.02,
                "{tier}: observed {observed:.4}, expected {expected:.4}"
            );
        }
    }

    #[test]
    fn counts_add_up() {
        let catalog = CatalogRegistry::builtin();
        let pipeline = LootPipeline::new(&catalog);
        let dist = Distribution::sample(&pipeline, &RollContext::new(2, 5), 500).unwrap();

        assert_eq!(dist.rarity.values().sum::<usize>(), 500);
        assert_eq!(dist.category.values().sum::<usize>(), 500);
        assert_eq!(dist.containers.values().sum::<usize>(), 500);
        assert_eq!(dist.factions.values().sum::<usize>(), 500);
        assert!(dist.nothing <= 500);
    }

    #[test]
    fn report_lists_every_tier_and_category() {
        let catalog = CatalogRegistry::builtin();
        let pipeline = LootPipeline::new(&catalog);
        let ctx = RollContext::new(4, 9).in_container(ContainerKind::Vault);
        let report = loot_report(&pipeline, &ctx, 200).unwrap();

        assert!(report.starts_with("Loot report: tier 4 ship, 200 rolls (seed 9)"));
        for tier in RarityTier::ALL {
            assert!(report.contains(tier.label()));
        }
        for category in ItemCategory::ALL {
            assert!(report.contains(category.label()));
        }
        assert!(report.contains("expected"));
        assert!(report.contains("Containers: Vault=200"));
    }

    #[test]
    fn report_propagates_catalog_errors() {
        let catalog = CatalogRegistry::builtin();
        let pipeline = LootPipeline::new(&catalog);
        assert!(loot_report(&pipeline, &RollContext::new(0, 1), 10).is_err());
    }
}
