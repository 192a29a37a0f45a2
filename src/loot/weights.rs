use crate::loot::fallback::TableKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Debug;

/// Uniform source of draws in `[0, 1)`.
pub trait RngSource {
    fn next_float(&mut self) -> f64;
}

impl RngSource for ChaCha8Rng {
    fn next_float(&mut self) -> f64 {
        self.gen()
    }
}

/// Seeded generator owned by a single roll.
#[derive(Clone, Debug)]
pub struct LootRng {
    rng: ChaCha8Rng,
}

impl LootRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RngSource for LootRng {
    fn next_float(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Ordered `(key, weight)` candidates plus the key to use when the table is
/// degenerate. Entry order is authoring order and breaks ties.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable<K> {
    kind: TableKind,
    entries: Vec<(K, f64)>,
    fallback: K,
}

impl<K: Clone + PartialEq + Debug> WeightTable<K> {
    pub fn new(kind: TableKind, fallback: K) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            fallback,
        }
    }

    pub fn from_entries(kind: TableKind, entries: Vec<(K, f64)>, fallback: K) -> Self {
        debug_assert!(
            entries.iter().all(|(_, w)| *w >= 0.0),
            "negative weight in {kind} table"
        );
        Self {
            kind,
            entries,
            fallback,
        }
    }

    pub fn push(&mut self, key: K, weight: f64) {
        debug_assert!(weight >= 0.0, "negative weight in {} table", self.kind);
        self.entries.push((key, weight));
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn fallback(&self) -> &K {
        &self.fallback
    }

    pub fn weight_of(&self, key: &K) -> f64 {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, w)| w.max(0.0))
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w.max(0.0)).sum()
    }

    /// True when a multi-entry draw would have to consult the fallback.
    pub fn is_degenerate(&self) -> bool {
        if self.entries.len() == 1 {
            return false;
        }
        let total = self.total();
        !(total > 0.0 && total.is_finite())
    }

    /// Chance that a draw lands on `key`.
    pub fn probability(&self, key: &K) -> f64 {
        match self.entries.as_slice() {
            [(only, _)] => {
                if only == key {
                    1.0
                } else {
                    0.0
                }
            }
            _ if self.is_degenerate() => {
                if &self.fallback == key {
                    1.0
                } else {
                    0.0
                }
            }
            _ => self.weight_of(key) / self.total(),
        }
    }

    /// Consumes exactly one value from `rng`, whatever the table holds.
    pub fn draw<R: RngSource + ?Sized>(&self, rng: &mut R) -> K {
        let u = rng.next_float();
        self.pick(u)
    }

    /// Maps a unit draw onto the table.
    ///
    /// Each entry owns `(previous cumulative, cumulative]` of `u * total`, so an
    /// exact boundary stays with the lower entry. Zero-weight entries are
    /// skipped and never picked while the total is positive.
    pub fn pick(&self, u: f64) -> K {
        let entries = match self.entries.as_slice() {
            [] => {
                log::warn!("empty {} table, using fallback {:?}", self.kind, self.fallback);
                return self.fallback.clone();
            }
            [(only, _)] => return only.clone(),
            entries => entries,
        };

        if self.is_degenerate() {
            log::warn!(
                "{} table of {} entries has no positive weight, using fallback {:?}",
                self.kind,
                entries.len(),
                self.fallback
            );
            return self.fallback.clone();
        }

        let r = u.clamp(0.0, 1.0) * self.total();
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (key, weight) in entries {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(key);
            if r <= cumulative {
                return key.clone();
            }
        }

        // Rounding can leave r at the very top of the range.
        last_positive
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedRng {
    values: Vec<f64>,
    next: usize,
    pub(crate) consumed: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
            consumed: 0,
        }
    }
}

#[cfg(test)]
impl RngSource for ScriptedRng {
    fn next_float(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        self.consumed += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::types::RarityTier;

    fn rarity_table(weights: [f64; 5]) -> WeightTable<RarityTier> {
        WeightTable::from_entries(
            TableKind::Rarity,
            RarityTier::ALL.into_iter().zip(weights).collect(),
            RarityTier::Common,
        )
    }

    #[test]
    fn boundaries_belong_to_the_lower_entry() {
        let table = rarity_table([1.0, 1.0, 1.0, 1.0, 0.0]);

        assert_eq!(table.pick(0.0), RarityTier::Common);
        assert_eq!(table.pick(0.25), RarityTier::Common);
        assert_eq!(table.pick(0.250_001), RarityTier::Uncommon);
        assert_eq!(table.pick(0.5), RarityTier::Uncommon);
        assert_eq!(table.pick(0.75), RarityTier::Rare);
        assert_eq!(table.pick(0.999_999), RarityTier::Epic);
        assert_eq!(table.pick(1.0), RarityTier::Epic);
    }

    #[test]
    fn leading_zero_weight_is_skipped_at_the_bottom_of_the_range() {
        let table = rarity_table([0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(table.pick(0.0), RarityTier::Uncommon);
        assert_eq!(table.pick(0.5), RarityTier::Uncommon);
        assert_eq!(table.pick(0.500_001), RarityTier::Rare);
    }

    #[test]
    fn zero_weight_entries_are_never_picked() {
        let table = rarity_table([0.0, 2.0, 0.0, 1.0, 0.0]);
        for step in 0..1000 {
            let u = step as f64 / 1000.0;
            let picked = table.pick(u);
            assert!(
                picked == RarityTier::Uncommon || picked == RarityTier::Epic,
                "u={u} picked {picked:?}"
            );
        }
        // Top of the range rounds onto the last positive entry.
        assert_eq!(table.pick(1.0), RarityTier::Epic);
    }

    #[test]
    fn single_entry_table_ignores_weight_and_draw() {
        let table = WeightTable::from_entries(
            TableKind::Rarity,
            vec![(RarityTier::Epic, 0.0)],
            RarityTier::Common,
        );
        for u in [0.0, 0.3, 0.999] {
            assert_eq!(table.pick(u), RarityTier::Epic);
        }
        assert!(!table.is_degenerate());
        assert_eq!(table.probability(&RarityTier::Epic), 1.0);
    }

    #[test]
    fn degenerate_table_returns_fallback_for_every_seed() {
        let table = rarity_table([0.0; 5]);
        assert!(table.is_degenerate());
        for seed in 0..64 {
            let mut rng = LootRng::new(seed);
            assert_eq!(table.draw(&mut rng), RarityTier::Common);
        }

        let empty: WeightTable<RarityTier> = WeightTable::new(TableKind::Rarity, RarityTier::Rare);
        assert_eq!(empty.pick(0.5), RarityTier::Rare);
    }

    #[test]
    fn every_draw_consumes_one_value() {
        let mut rng = ScriptedRng::new(&[0.1, 0.9]);
        rarity_table([1.0; 5]).draw(&mut rng);
        rarity_table([0.0; 5]).draw(&mut rng);
        WeightTable::from_entries(TableKind::Rarity, vec![(RarityTier::Rare, 1.0)], RarityTier::Common)
            .draw(&mut rng);
        assert_eq!(rng.consumed, 3);
    }

    #[test]
    fn sampling_converges_to_authored_proportions() {
        let table = rarity_table([50.0, 25.0, 15.0, 8.0, 2.0]);
        let mut rng = LootRng::new(2024);
        let draws = 100_000;
        let mut counts = [0usize; 5];
        for _ in 0..draws {
            counts[table.draw(&mut rng).ordinal()] += 1;
        }

        for tier in RarityTier::ALL {
            let observed = counts[tier.ordinal()] as f64 / draws as f64;
            let expected = table.probability(&tier);
            assert!(
                (observed - expected).abs() < 0.01,
                "{tier}: observed {observed:.4}, expected {expected:.4}"
            );
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let table = rarity_table([5.0, 4.0, 3.0, 2.0, 1.0]);
        let mut a = LootRng::new(7);
        let mut b = LootRng::new(7);
        let run_a: Vec<_> = (0..32).map(|_| table.draw(&mut a)).collect();
        let run_b: Vec<_> = (0..32).map(|_| table.draw(&mut b)).collect();
        assert_eq!(run_a, run_b);
    }
}
