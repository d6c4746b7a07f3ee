//! Batch training loop populating the gram-statistics tables.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::{Granularity, IngestConfig, TrainerBuilder, TrainerConfig};
use crate::corpus::load_text_corpus;
use crate::error::{GramsegError, Result};
use crate::metrics::TrainingMetrics;
use crate::model::GramModel;
use crate::preprocess::normalize;

/// High-level façade configuring and executing training passes.
#[derive(Debug, Clone)]
pub struct Trainer {
    cfg: TrainerConfig,
}

/// Artifacts returned after a training pass over a fresh model.
#[must_use]
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Trained gram-statistics model.
    pub model: GramModel,
    /// Metrics captured during the pass.
    pub metrics: TrainingMetrics,
}

impl Trainer {
    /// Creates a new trainer for the supplied configuration.
    #[must_use]
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg }
    }

    /// Returns a [`TrainerBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerConfig::builder()
    }

    /// Returns an immutable reference to the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Trains a fresh model by loading texts from disk according to [`IngestConfig`].
    pub fn train_from_paths<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        ingest: &IngestConfig,
    ) -> Result<TrainerArtifacts> {
        let texts = load_text_corpus(inputs, ingest)?;
        self.train_from_texts(&texts)
    }

    /// Trains a fresh model from in-memory texts.
    pub fn train_from_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<TrainerArtifacts> {
        let mut model = GramModel::new(self.cfg.max_n, self.cfg.granularity)?;
        let metrics = self.train_into(&mut model, texts)?;
        Ok(TrainerArtifacts { model, metrics })
    }

    /// Trains into an existing model, merging new counts over old ones.
    ///
    /// Per-text subtotals are accumulated into a working model and merged
    /// key-wise after each text, so chained calls and one whole-corpus pass
    /// produce identical tables.
    pub fn train_into<S: AsRef<str>>(
        &self,
        model: &mut GramModel,
        texts: &[S],
    ) -> Result<TrainingMetrics> {
        self.cfg.validate()?;
        if texts.is_empty() {
            return Err(GramsegError::InvalidConfig(
                "training requires at least one text".into(),
            ));
        }
        if model.max_n() != self.cfg.max_n || model.granularity() != self.cfg.granularity {
            return Err(GramsegError::InvalidConfig(format!(
                "model (max_n={}, {}) does not match trainer config (max_n={}, {})",
                model.max_n(),
                model.granularity(),
                self.cfg.max_n,
                self.cfg.granularity
            )));
        }

        let start = Instant::now();
        let mut metrics = TrainingMetrics::new();
        for text in texts {
            let normalized = normalize(text.as_ref());
            let units = self.cfg.granularity.units(&normalized);
            let mut subtotal = GramModel::new(self.cfg.max_n, self.cfg.granularity)?;
            for n in 1..=self.cfg.max_n {
                metrics.observations += scan_grams(&mut subtotal, &units, n, self.cfg.granularity);
            }
            model.merge(&subtotal)?;
            metrics.texts_processed += 1;
            metrics.total_units += units.len();
            if self.cfg.show_progress {
                info!(
                    "text {:>6}: units {:>6} model size {:>8}",
                    metrics.texts_processed,
                    units.len(),
                    model.size()
                );
            }
        }
        metrics.model_size = model.size();
        metrics.total_duration = start.elapsed();

        if self.cfg.show_progress {
            info!(
                "trained {} texts ({} units) in {:.2?}; model size {}",
                metrics.texts_processed,
                metrics.total_units,
                metrics.total_duration,
                metrics.model_size
            );
        }
        Ok(metrics)
    }
}

/// Scans every complete window of length `n`, recording the gram and its
/// single adjacent units on either side.  Returns the number of gram
/// occurrences recorded.
fn scan_grams(model: &mut GramModel, units: &[String], n: usize, granularity: Granularity) -> u64 {
    if n == 0 || units.len() < n {
        return 0;
    }
    let mut observed = 0u64;
    for i in 0..=units.len() - n {
        let gram = granularity.join(&units[i..i + n]);
        let prev = (i > 0).then(|| units[i - 1].as_str());
        let next = (i + n < units.len()).then(|| units[i + n].as_str());
        model.observe(&gram, prev, next);
        observed += 1;
    }
    observed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trainer(max_n: usize, granularity: Granularity) -> Trainer {
        let cfg = TrainerConfig::builder()
            .max_n(max_n)
            .granularity(granularity)
            .show_progress(false)
            .build()
            .expect("valid config");
        Trainer::new(cfg)
    }

    #[test]
    fn chained_training_equals_one_pass() {
        let trainer = trainer(2, Granularity::Chars);
        let one_pass = trainer
            .train_from_texts(&["ding", "dong"])
            .expect("training")
            .model;

        let mut chained = trainer.train_from_texts(&["ding"]).expect("training").model;
        trainer
            .train_into(&mut chained, &["dong"])
            .expect("training");
        assert_eq!(chained, one_pass);
    }

    #[test]
    fn token_granularity_counts_token_windows() {
        let trainer = trainer(2, Granularity::Tokens);
        let model = trainer
            .train_from_texts(&["to be or not to be"])
            .expect("training")
            .model;
        assert_eq!(model.frequency("to"), 2);
        assert_eq!(model.frequency("to be"), 2);
        assert_eq!(model.successor_count("to", "be"), 2);
        assert_eq!(model.predecessor_count("be", "to"), 2);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let trainer = trainer(2, Granularity::Chars);
        let err = trainer
            .train_from_texts(&Vec::<String>::new())
            .expect_err("empty corpus should fail");
        assert!(matches!(err, GramsegError::InvalidConfig(_)));
    }

    #[test]
    fn blank_text_contributes_nothing() {
        let trainer = trainer(2, Granularity::Chars);
        let artifacts = trainer
            .train_from_texts(&["  \t ", "pig"])
            .expect("training");
        assert_eq!(artifacts.metrics.texts_processed, 2);
        assert_eq!(artifacts.model.size(), 11);
    }

    #[test]
    fn mismatched_target_model_is_rejected() {
        let trainer = trainer(2, Granularity::Chars);
        let mut model = GramModel::new(3, Granularity::Chars).expect("model");
        assert!(trainer.train_into(&mut model, &["pig"]).is_err());
    }

    #[test]
    fn metrics_count_observations() {
        let trainer = trainer(2, Granularity::Chars);
        let artifacts = trainer.train_from_texts(&["pig"]).expect("training");
        // 3 unigram windows plus 2 bigram windows.
        assert_eq!(artifacts.metrics.observations, 5);
        assert_eq!(artifacts.metrics.total_units, 3);
        assert_eq!(artifacts.metrics.model_size, 11);
    }
}
