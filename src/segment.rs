//! Threshold-based boundary detection over an aggregated profile.

use log::trace;

use crate::aggregate::{aggregate, AggregatedProfile};
use crate::error::{GramsegError, Result};
use crate::model::GramModel;
use crate::preprocess::normalize;
use crate::profile::{Metric, ProfileVariant};

/// Splits a raw text into tokens with one model, metric pair, and threshold.
///
/// Normalizes the text, aggregates the chosen profile variant across
/// `n_list`, and applies the opposite-metrics boundary policy when a
/// backward metric is given, the forward-only policy otherwise.
pub fn segment_text(
    model: &GramModel,
    text: &str,
    forward: Metric,
    backward: Option<Metric>,
    n_list: &[usize],
    threshold: f64,
    variant: ProfileVariant,
) -> Result<Vec<String>> {
    let normalized = normalize(text);
    let units = model.granularity().units(&normalized);
    let mut metrics = vec![forward];
    if let Some(backward) = backward {
        metrics.push(backward);
    }
    let profile = aggregate(model, &units, &metrics, n_list, variant)?;
    match backward {
        Some(backward) => {
            segment_with_opposite_metrics(&profile, model, forward, backward, threshold)
        }
        None => segment_with_forward_metric(&profile, model, forward, threshold),
    }
}

/// Scans the profile declaring a boundary after position `i` when the next
/// row's backward metric or the current row's forward metric reaches the
/// threshold.
pub fn segment_with_opposite_metrics(
    profile: &AggregatedProfile,
    model: &GramModel,
    forward: Metric,
    backward: Metric,
    threshold: f64,
) -> Result<Vec<String>> {
    let fwd = column(profile, forward)?;
    let bwd = column(profile, backward)?;
    Ok(scan(profile, model, threshold, |i| {
        let brk_back = i + 1 < profile.len() && profile.value(i + 1, bwd) >= threshold;
        brk_back || profile.value(i, fwd) >= threshold
    }))
}

/// Scans the profile declaring a boundary solely on the forward metric.
pub fn segment_with_forward_metric(
    profile: &AggregatedProfile,
    model: &GramModel,
    forward: Metric,
    threshold: f64,
) -> Result<Vec<String>> {
    let fwd = column(profile, forward)?;
    Ok(scan(profile, model, threshold, |i| {
        profile.value(i, fwd) >= threshold
    }))
}

fn column(profile: &AggregatedProfile, metric: Metric) -> Result<usize> {
    profile.column(metric).ok_or_else(|| {
        GramsegError::InvalidParameter(format!(
            "aggregated profile does not carry metric {metric}"
        ))
    })
}

/// Single left-to-right pass with a unit accumulator.  The trailing
/// accumulator is always flushed, so the emitted tokens rebuild the full
/// unit sequence for any threshold.
fn scan<F>(
    profile: &AggregatedProfile,
    model: &GramModel,
    threshold: f64,
    is_boundary: F,
) -> Vec<String>
where
    F: Fn(usize) -> bool,
{
    let granularity = model.granularity();
    let mut tokens = Vec::new();
    let mut accumulator: Vec<&str> = Vec::new();
    for (i, row) in profile.rows().iter().enumerate() {
        accumulator.push(row.unit.as_str());
        if is_boundary(i) {
            trace!("boundary after unit {:>5} {:?} (threshold {threshold})", i, row.unit);
            tokens.push(granularity.join(&accumulator));
            accumulator.clear();
        }
    }
    if !accumulator.is_empty() {
        tokens.push(granularity.join(&accumulator));
    }
    tokens
}
