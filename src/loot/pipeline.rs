use crate::loot::catalog::{CatalogRegistry, FactionFilter, ShipProfile};
use crate::loot::compose::{FactionStrategy, ModifierComposer};
use crate::loot::error::Result;
use crate::loot::fallback::{FallbackPolicy, TableKind};
use crate::loot::types::{ContainerKind, ItemCategory, RarityTier};
use crate::loot::weights::{LootRng, RngSource, WeightTable};
use serde::{Deserialize, Serialize};

/// Everything known about one loot event before rolling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollContext {
    pub ship_tier: u8,
    /// Skips container selection when set.
    #[serde(default)]
    pub container_kind: Option<ContainerKind>,
    /// Skips faction selection when set.
    #[serde(default)]
    pub faction_code: Option<String>,
    #[serde(default)]
    pub distance_factor: Option<f64>,
    #[serde(default)]
    pub faction_strategy: FactionStrategy,
    #[serde(default)]
    pub seed: u64,
}

impl RollContext {
    pub fn new(ship_tier: u8, seed: u64) -> Self {
        Self {
            ship_tier,
            container_kind: None,
            faction_code: None,
            distance_factor: None,
            faction_strategy: FactionStrategy::default(),
            seed,
        }
    }

    pub fn in_container(mut self, kind: ContainerKind) -> Self {
        self.container_kind = Some(kind);
        self
    }

    pub fn with_faction(mut self, code: impl Into<String>) -> Self {
        self.faction_code = Some(code.into());
        self
    }

    pub fn at_distance(mut self, distance: f64) -> Self {
        self.distance_factor = Some(distance);
        self
    }

    pub fn with_strategy(mut self, strategy: FactionStrategy) -> Self {
        self.faction_strategy = strategy;
        self
    }

    /// Distance clamped to `[0, 1]`; non-finite values count as unknown.
    pub fn distance(&self) -> Option<f64> {
        self.distance_factor
            .filter(|d| d.is_finite())
            .map(|d| d.clamp(0.0, 1.0))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LootDrop {
    Item { id: String, rarity: RarityTier },
    /// Nothing fits; the caller grants currency instead.
    Nothing,
}

impl LootDrop {
    pub fn item_id(&self) -> Option<&str> {
        match self {
            LootDrop::Item { id, .. } => Some(id),
            LootDrop::Nothing => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, LootDrop::Nothing)
    }
}

/// How far the item query had to loosen before it found candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relaxation {
    Strict,
    AnyFaction,
    SteppedDown { steps: u8 },
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub container_kind: ContainerKind,
    pub faction_code: Option<String>,
    pub rarity: RarityTier,
    pub category: ItemCategory,
    pub item: LootDrop,
    pub relaxation: Relaxation,
}

/// Runs the five roll stages against a catalog.
#[derive(Clone, Copy, Debug)]
pub struct LootPipeline<'a> {
    catalog: &'a CatalogRegistry,
    composer: ModifierComposer<'a>,
}

impl<'a> LootPipeline<'a> {
    pub fn new(catalog: &'a CatalogRegistry) -> Self {
        Self {
            catalog,
            composer: ModifierComposer::new(catalog),
        }
    }

    pub fn catalog(&self) -> &'a CatalogRegistry {
        self.catalog
    }

    pub fn composer(&self) -> &ModifierComposer<'a> {
        &self.composer
    }

    /// Rolls with a generator seeded from the context alone.
    pub fn roll_loot(&self, ctx: &RollContext) -> Result<RollResult> {
        let mut rng = LootRng::new(ctx.seed);
        self.roll_loot_with(ctx, &mut rng)
    }

    /// Rolls from a caller-owned stream, one draw per stage that runs.
    pub fn roll_loot_with<R: RngSource + ?Sized>(
        &self,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<RollResult> {
        let ship = self.catalog.ship_profile(ctx.ship_tier)?;

        let container_kind = self.select_container(ship, ctx, rng);
        let faction_code = self.select_faction(ctx, rng)?;
        let faction = faction_code.as_deref();

        let rarity = self
            .composer
            .rarity_table(ctx.ship_tier, container_kind, faction)?
            .draw(rng);
        let category = self
            .composer
            .category_table(container_kind, faction)?
            .draw(rng);
        let (item, relaxation) = self.select_item(category, rarity, faction, rng);

        log::debug!(
            "tier {} {container_kind} faction={faction:?}: {rarity} {category} -> {item:?} ({relaxation:?})",
            ctx.ship_tier
        );

        Ok(RollResult {
            container_kind,
            faction_code,
            rarity,
            category,
            item,
            relaxation,
        })
    }

    fn select_container<R: RngSource + ?Sized>(
        &self,
        ship: &ShipProfile,
        ctx: &RollContext,
        rng: &mut R,
    ) -> ContainerKind {
        match ctx.container_kind {
            Some(kind) => kind,
            None => ship.container_table().draw(rng),
        }
    }

    fn select_faction<R: RngSource + ?Sized>(
        &self,
        ctx: &RollContext,
        rng: &mut R,
    ) -> Result<Option<String>> {
        if let Some(code) = &ctx.faction_code {
            let profile = self.catalog.faction_profile(code)?;
            return Ok(Some(profile.code.clone()));
        }

        let table =
            self.composer
                .faction_table(ctx.faction_strategy, ctx.ship_tier, ctx.distance());
        Ok(table.map(|t| t.draw(rng)))
    }

    /// Strict query first, then any faction, then one rarity lower at a time.
    fn select_item<R: RngSource + ?Sized>(
        &self,
        category: ItemCategory,
        rarity: RarityTier,
        faction: Option<&str>,
        rng: &mut R,
    ) -> (LootDrop, Relaxation) {
        let strict = match faction {
            Some(code) => FactionFilter::Matching(code),
            None => FactionFilter::Neutral,
        };

        let mut attempts = vec![(rarity, strict, Relaxation::Strict)];
        let mut tier = Some(rarity);
        let mut steps = 0u8;
        while let Some(current) = tier {
            let relaxation = if steps == 0 {
                Relaxation::AnyFaction
            } else {
                Relaxation::SteppedDown { steps }
            };
            attempts.push((current, FactionFilter::Unrestricted, relaxation));
            tier = current.step_down();
            steps += 1;
        }

        for (tier, filter, relaxation) in attempts {
            let candidates = self.catalog.items_matching(category, tier, filter);
            let Some(fallback) = FallbackPolicy::item(&candidates) else {
                continue;
            };
            let id = WeightTable::from_entries(TableKind::Item, candidates, fallback).draw(rng);
            if relaxation != Relaxation::Strict {
                log::debug!("item query for {rarity} {category} relaxed to {relaxation:?}");
            }
            return (
                LootDrop::Item {
                    id: id.to_string(),
                    rarity: tier,
                },
                relaxation,
            );
        }

        log::warn!("no {category} item at or below {rarity}, granting currency only");
        (LootDrop::Nothing, Relaxation::Exhausted)
    }
}

/// Rolls one loot event against `catalog`.
pub fn roll_loot(catalog: &CatalogRegistry, ctx: &RollContext) -> Result<RollResult> {
    LootPipeline::new(catalog).roll_loot(ctx)
}
