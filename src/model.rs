//! The gram-statistics model: three interlocking count tables.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::Granularity;
use crate::error::{GramsegError, Result};
use crate::serialization;

/// Table key: a contiguous window of units rendered through [`Granularity::join`].
pub type Gram = String;
/// Occurrence count stored in the model tables.
pub type Count = u64;

/// Inner mapping of a neighbor table: adjacent unit → observation count.
pub type NeighborCounts = FxHashMap<Gram, Count>;

/// Trained statistics over grams of length 1 through `max_n`.
///
/// Three tables are kept in lockstep: a frequency table over every observed
/// gram, a successor table counting the single unit seen immediately after
/// each gram occurrence, and a predecessor table counting the unit seen
/// immediately before.  Every outer key of the successor and predecessor
/// tables is also present in the frequency table.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GramModel {
    counts: FxHashMap<Gram, Count>,
    successors: FxHashMap<Gram, NeighborCounts>,
    predecessors: FxHashMap<Gram, NeighborCounts>,
    max_n: usize,
    granularity: Granularity,
}

impl GramModel {
    /// Constructs an empty model for the given gram-length bound and unit stream.
    pub fn new(max_n: usize, granularity: Granularity) -> Result<Self> {
        if max_n == 0 {
            return Err(GramsegError::InvalidConfig(
                "max_n must be at least 1".into(),
            ));
        }
        Ok(Self {
            counts: FxHashMap::default(),
            successors: FxHashMap::default(),
            predecessors: FxHashMap::default(),
            max_n,
            granularity,
        })
    }

    /// Largest gram length trained into this model.
    #[must_use]
    pub fn max_n(&self) -> usize {
        self.max_n
    }

    /// Unit stream this model was trained over.
    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Rejects gram lengths outside the trained range `[1, max_n]`.
    pub fn check_n(&self, n: usize) -> Result<()> {
        if n == 0 || n > self.max_n {
            return Err(GramsegError::InvalidParameter(format!(
                "gram length {n} is outside the trained range [1, {}]",
                self.max_n
            )));
        }
        Ok(())
    }

    /// Frequency table over every observed gram.
    #[must_use]
    pub fn counts(&self) -> &FxHashMap<Gram, Count> {
        &self.counts
    }

    /// Successor table: gram → following unit → count.
    #[must_use]
    pub fn successors(&self) -> &FxHashMap<Gram, NeighborCounts> {
        &self.successors
    }

    /// Predecessor table: gram → preceding unit → count.
    #[must_use]
    pub fn predecessors(&self) -> &FxHashMap<Gram, NeighborCounts> {
        &self.predecessors
    }

    /// Occurrence count of a gram, 0 when unseen.
    #[must_use]
    pub fn frequency(&self, gram: &str) -> Count {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Number of distinct units observed immediately after a gram.
    #[must_use]
    pub fn successor_freedom(&self, gram: &str) -> usize {
        self.successors.get(gram).map_or(0, NeighborCounts::len)
    }

    /// Number of distinct units observed immediately before a gram.
    #[must_use]
    pub fn predecessor_freedom(&self, gram: &str) -> usize {
        self.predecessors.get(gram).map_or(0, NeighborCounts::len)
    }

    /// How often `unit` was observed immediately after `gram`.
    #[must_use]
    pub fn successor_count(&self, gram: &str, unit: &str) -> Count {
        self.successors
            .get(gram)
            .and_then(|inner| inner.get(unit))
            .copied()
            .unwrap_or(0)
    }

    /// How often `unit` was observed immediately before `gram`.
    #[must_use]
    pub fn predecessor_count(&self, gram: &str, unit: &str) -> Count {
        self.predecessors
            .get(gram)
            .and_then(|inner| inner.get(unit))
            .copied()
            .unwrap_or(0)
    }

    /// Records one gram occurrence together with its adjacent units.
    pub(crate) fn observe(&mut self, gram: &str, prev: Option<&str>, next: Option<&str>) {
        *self.counts.entry(gram.to_owned()).or_insert(0) += 1;
        if let Some(next) = next {
            *self
                .successors
                .entry(gram.to_owned())
                .or_default()
                .entry(next.to_owned())
                .or_insert(0) += 1;
        }
        if let Some(prev) = prev {
            *self
                .predecessors
                .entry(gram.to_owned())
                .or_default()
                .entry(prev.to_owned())
                .or_insert(0) += 1;
        }
    }

    /// Adds another model's counts into this one, key by key.
    ///
    /// Missing keys are created with a zero base count, so merging is
    /// commutative and associative regardless of accumulation order.
    pub fn merge(&mut self, other: &GramModel) -> Result<()> {
        if self.max_n != other.max_n || self.granularity != other.granularity {
            return Err(GramsegError::InvalidConfig(format!(
                "cannot merge model (max_n={}, {}) into model (max_n={}, {})",
                other.max_n, other.granularity, self.max_n, self.granularity
            )));
        }
        for (gram, &count) in &other.counts {
            *self.counts.entry(gram.clone()).or_insert(0) += count;
        }
        for (table, other_table) in [
            (&mut self.successors, &other.successors),
            (&mut self.predecessors, &other.predecessors),
        ] {
            for (gram, neighbors) in other_table {
                let inner = table.entry(gram.clone()).or_default();
                for (unit, &count) in neighbors {
                    *inner.entry(unit.clone()).or_insert(0) += count;
                }
            }
        }
        Ok(())
    }

    /// Irreversibly drops low-mass entries from all three tables.
    ///
    /// Within the frequency table, and independently within every inner
    /// mapping of the neighbor tables, entries whose count falls below
    /// `threshold` × that mapping's total count are removed.  Entries tied
    /// for a mapping's maximum count are always retained, so a non-empty
    /// mapping never empties.  Neighbor-table outer keys whose gram left the
    /// frequency table are dropped with it.  Surviving counts are never
    /// altered, and a non-positive threshold is a no-op.
    pub fn compress(&mut self, threshold: f64) {
        if threshold <= 0.0 {
            return;
        }
        compress_counts(&mut self.counts, threshold);
        let counts = &self.counts;
        for table in [&mut self.successors, &mut self.predecessors] {
            table.retain(|gram, _| counts.contains_key(gram));
            for inner in table.values_mut() {
                compress_counts(inner, threshold);
            }
        }
    }

    /// Total number of distinct keys across the frequency table and all inner
    /// neighbor mappings — a model-size diagnostic, not an event count.
    #[must_use]
    pub fn size(&self) -> usize {
        self.counts.len()
            + self
                .successors
                .values()
                .map(NeighborCounts::len)
                .sum::<usize>()
            + self
                .predecessors
                .values()
                .map(NeighborCounts::len)
                .sum::<usize>()
    }

    /// Persists the model, including `max_n` and granularity, to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        serialization::save_model(self, path)
    }

    /// Restores a model previously written by [`GramModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        serialization::load_model(path)
    }
}

fn compress_counts(map: &mut FxHashMap<Gram, Count>, threshold: f64) {
    if map.is_empty() {
        return;
    }
    let total: Count = map.values().sum();
    let cutoff = threshold * total as f64;
    let top = map.values().copied().max().unwrap_or(0);
    map.retain(|_, count| *count == top || *count as f64 >= cutoff);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use crate::trainer::Trainer;

    fn trained(corpus: &[&str], max_n: usize) -> GramModel {
        let cfg = TrainerConfig::builder()
            .max_n(max_n)
            .granularity(Granularity::Chars)
            .show_progress(false)
            .build()
            .expect("valid config");
        Trainer::new(cfg)
            .train_from_texts(corpus)
            .expect("training")
            .model
    }

    fn count_table(entries: &[(&str, Count)]) -> FxHashMap<Gram, Count> {
        entries
            .iter()
            .map(|&(gram, count)| (gram.to_owned(), count))
            .collect()
    }

    fn neighbor_table(entries: &[(&str, &[(&str, Count)])]) -> FxHashMap<Gram, NeighborCounts> {
        entries
            .iter()
            .map(|&(gram, inner)| (gram.to_owned(), count_table(inner)))
            .collect()
    }

    #[test]
    fn pig_corpus_matches_reference_tables() {
        let model = trained(&["pig"], 2);
        assert_eq!(model.size(), 11);
        assert_eq!(
            model.counts(),
            &count_table(&[("p", 1), ("i", 1), ("g", 1), ("pi", 1), ("ig", 1)])
        );
        assert_eq!(
            model.successors(),
            &neighbor_table(&[
                ("p", &[("i", 1)]),
                ("i", &[("g", 1)]),
                ("pi", &[("g", 1)]),
            ])
        );
        assert_eq!(
            model.predecessors(),
            &neighbor_table(&[
                ("i", &[("p", 1)]),
                ("g", &[("i", 1)]),
                ("ig", &[("p", 1)]),
            ])
        );
    }

    #[test]
    fn ding_dong_corpus_merges_elementwise() {
        let model = trained(&["ding", "dong"], 2);
        assert_eq!(model.size(), 28);
        assert_eq!(
            model.counts(),
            &count_table(&[
                ("d", 2),
                ("i", 1),
                ("n", 2),
                ("g", 2),
                ("o", 1),
                ("di", 1),
                ("in", 1),
                ("ng", 2),
                ("do", 1),
                ("on", 1),
            ])
        );
        assert_eq!(
            model.successors(),
            &neighbor_table(&[
                ("d", &[("i", 1), ("o", 1)]),
                ("i", &[("n", 1)]),
                ("n", &[("g", 2)]),
                ("o", &[("n", 1)]),
                ("di", &[("n", 1)]),
                ("in", &[("g", 1)]),
                ("do", &[("n", 1)]),
                ("on", &[("g", 1)]),
            ])
        );
        assert_eq!(
            model.predecessors(),
            &neighbor_table(&[
                ("i", &[("d", 1)]),
                ("n", &[("i", 1), ("o", 1)]),
                ("g", &[("n", 2)]),
                ("o", &[("d", 1)]),
                ("in", &[("d", 1)]),
                ("ng", &[("i", 1), ("o", 1)]),
                ("on", &[("d", 1)]),
            ])
        );
    }

    #[test]
    fn compress_with_zero_threshold_is_identity() {
        let mut model = trained(&["ding", "dong"], 2);
        let before = model.clone();
        model.compress(0.0);
        assert_eq!(model, before);
    }

    #[test]
    fn compress_drops_rare_entries_but_keeps_top() {
        let mut model = trained(&["aaab"], 1);
        // "a" count 3, "b" count 1; total 4, threshold 0.3 → cutoff 1.2 drops "b".
        model.compress(0.3);
        assert_eq!(model.frequency("a"), 3);
        assert_eq!(model.frequency("b"), 0);
        // Surviving neighbor tables no longer reference the dropped gram as a key.
        assert!(!model.successors().contains_key("b"));
        assert!(!model.predecessors().contains_key("b"));
    }

    #[test]
    fn compress_never_empties_a_mapping() {
        let mut model = trained(&["ab"], 1);
        model.compress(0.99);
        assert!(!model.counts().is_empty());
        for inner in model.successors().values() {
            assert!(!inner.is_empty());
        }
    }

    #[test]
    fn merge_rejects_mismatched_models() {
        let mut chars = GramModel::new(2, Granularity::Chars).expect("model");
        let tokens = GramModel::new(2, Granularity::Tokens).expect("model");
        assert!(chars.merge(&tokens).is_err());
        let wider = GramModel::new(3, Granularity::Chars).expect("model");
        assert!(chars.merge(&wider).is_err());
    }

    #[test]
    fn unknown_grams_report_zero_everywhere() {
        let model = trained(&["pig"], 2);
        assert_eq!(model.frequency("xy"), 0);
        assert_eq!(model.successor_freedom("xy"), 0);
        assert_eq!(model.predecessor_freedom("xy"), 0);
        assert_eq!(model.successor_count("xy", "z"), 0);
    }

    #[test]
    fn check_n_bounds_the_trained_range() {
        let model = trained(&["pig"], 2);
        assert!(model.check_n(1).is_ok());
        assert!(model.check_n(2).is_ok());
        assert!(model.check_n(0).is_err());
        assert!(model.check_n(3).is_err());
    }
}
