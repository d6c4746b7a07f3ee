//! Scores one segmentation configuration against the reference tokenizer.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{GramsegError, Result};
use crate::model::GramModel;
use crate::preprocess::normalize;
use crate::profile::{Metric, ProfileVariant};
use crate::reference::reference_tokenize;
use crate::score::f1;
use crate::segment::segment_text;

/// One segmentation configuration to score.
#[derive(Debug, Clone, Serialize)]
pub struct EvalConfig {
    /// Forward boundary metric.
    pub forward: Metric,
    /// Backward metric; selects the opposite-metrics policy when present.
    pub backward: Option<Metric>,
    /// Gram lengths aggregated into the profile.
    pub n_list: Vec<usize>,
    /// Boundary threshold applied to the normalized profile.
    pub threshold: f64,
    /// Profile variant the metrics are computed from.
    pub variant: ProfileVariant,
    /// Keeps space-only tokens in both sequences when scoring.
    pub keep_spaces: bool,
}

/// Scored configuration: the evaluation leaf consumed by an external sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Gram lengths the configuration aggregated over.
    pub n_list: Vec<usize>,
    /// Boundary threshold the configuration applied.
    pub threshold: f64,
    /// Mean F1 across all texts, rounded to two decimals.
    pub mean_f1: f64,
}

/// Segments every text, scores it against the reference tokenization of the
/// same normalized text, and averages the F1 scores.
///
/// Texts are scored independently with read-only model access, so the
/// per-text work fans out across threads and reduces by summation.  The
/// function evaluates exactly one configuration; sweeping over thresholds or
/// gram-length sets is the caller's concern.
pub fn evaluate(model: &GramModel, texts: &[String], cfg: &EvalConfig) -> Result<Evaluation> {
    if texts.is_empty() {
        return Err(GramsegError::InvalidConfig(
            "evaluation requires at least one text".into(),
        ));
    }

    let scores = texts
        .par_iter()
        .map(|text| {
            let normalized = normalize(text);
            let mut predicted = segment_text(
                model,
                &normalized,
                cfg.forward,
                cfg.backward,
                &cfg.n_list,
                cfg.threshold,
                cfg.variant,
            )?;
            let mut reference = reference_tokenize(&normalized);
            if !cfg.keep_spaces {
                drop_space_tokens(&mut predicted);
                drop_space_tokens(&mut reference);
            }
            Ok(f1(&reference, &predicted))
        })
        .collect::<Result<Vec<f64>>>()?;

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(Evaluation {
        n_list: cfg.n_list.clone(),
        threshold: cfg.threshold,
        mean_f1: (mean * 100.0).round() / 100.0,
    })
}

fn drop_space_tokens(tokens: &mut Vec<String>) {
    tokens.retain(|token| !token.chars().all(|ch| ch == ' '));
}
