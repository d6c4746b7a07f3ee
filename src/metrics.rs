//! Metrics describing a completed training pass.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregate metrics produced by one call into the trainer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingMetrics {
    /// Number of corpus texts scanned.
    pub texts_processed: usize,
    /// Total units (characters or tokens) seen across all texts.
    pub total_units: usize,
    /// Total gram occurrences recorded into the frequency table.
    pub observations: u64,
    /// Model size diagnostic after the pass completed.
    pub model_size: usize,
    /// Wall-clock duration of the pass.
    pub total_duration: Duration,
}

impl TrainingMetrics {
    /// Creates an empty metrics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            texts_processed: 0,
            total_units: 0,
            observations: 0,
            model_size: 0,
            total_duration: Duration::ZERO,
        }
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
