//! Combines per-n profiles into one normalized profile.

use serde::Serialize;

use crate::error::{GramsegError, Result};
use crate::model::GramModel;
use crate::profile::{profile, Metric, ProfileVariant};

/// One unit position of an aggregated profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    /// Unit index within the text.
    pub pos: usize,
    /// The single unit at this position.
    pub unit: String,
    values: Vec<f64>,
}

impl AggregatedRow {
    /// Values of the requested metric columns, in request order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Profile summed across a gram-length list and normalized per column.
///
/// The profile carries one row per unit of the text.  Positions where a
/// complete gram of some length does not fit contribute nothing for that
/// length, so a scan over the rows always covers the whole unit sequence.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedProfile {
    metrics: Vec<Metric>,
    rows: Vec<AggregatedRow>,
}

impl AggregatedProfile {
    /// Metric columns carried by every row, in request order.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Rows ordered by unit position.
    #[must_use]
    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    /// Number of rows (equal to the unit count of the text).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the profile carries no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of a metric, if it was requested.
    #[must_use]
    pub fn column(&self, metric: Metric) -> Option<usize> {
        self.metrics.iter().position(|&m| m == metric)
    }

    /// Value of one column at one row.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.rows[row].values[column]
    }
}

/// Computes the chosen profile variant once per gram length, sums each
/// requested metric column at matching positions, and divides every summed
/// column by its own maximum.
///
/// Every output value lies in `[0, 1]`: a column whose maximum is not
/// positive is left identically zero rather than divided, and residual
/// negative values clamp to zero.  An empty `n_list` is rejected, as is any
/// gram length outside the model's trained range.
pub fn aggregate(
    model: &GramModel,
    units: &[String],
    metrics: &[Metric],
    n_list: &[usize],
    variant: ProfileVariant,
) -> Result<AggregatedProfile> {
    if n_list.is_empty() {
        return Err(GramsegError::InvalidParameter(
            "n_list must contain at least one gram length".into(),
        ));
    }
    for &n in n_list {
        model.check_n(n)?;
    }

    let mut columns = vec![vec![0.0f64; units.len()]; metrics.len()];
    for &n in n_list {
        let rows = profile(model, units, n, variant)?;
        for row in &rows {
            for (column, &metric) in columns.iter_mut().zip(metrics) {
                column[row.pos] += metric.value(row);
            }
        }
    }

    for column in &mut columns {
        let max = column.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if max > 0.0 {
            for value in column.iter_mut() {
                *value = (*value / max).max(0.0);
            }
        } else {
            for value in column.iter_mut() {
                *value = 0.0;
            }
        }
    }

    let rows = units
        .iter()
        .enumerate()
        .map(|(pos, unit)| AggregatedRow {
            pos,
            unit: unit.clone(),
            values: columns.iter().map(|column| column[pos]).collect(),
        })
        .collect();

    Ok(AggregatedProfile {
        metrics: metrics.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Granularity, TrainerConfig};
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

    fn units(text: &str) -> Vec<String> {
        Granularity::Chars.units(text)
    }

    #[test]
    fn values_are_bounded_to_unit_interval() {
        let model = trained(&["ding", "dong", "dung"], 3);
        let profile = aggregate(
            &model,
            &units("ding dong"),
            &Metric::ALL,
            &[1, 2, 3],
            ProfileVariant::Freedom,
        )
        .expect("aggregate");
        for row in profile.rows() {
            for &value in row.values() {
                assert!((0.0..=1.0).contains(&value), "value {value} out of range");
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn zero_columns_survive_normalization_as_zero() {
        let model = trained(&["ding", "dong"], 2);
        // Every gram of "xyz" is unknown, so every column sums to zero.
        let profile = aggregate(
            &model,
            &units("xyz"),
            &Metric::ALL,
            &[1, 2],
            ProfileVariant::Freedom,
        )
        .expect("aggregate");
        for row in profile.rows() {
            assert!(row.values().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn profile_covers_every_unit_position() {
        let model = trained(&["ding", "dong"], 2);
        let text = "dingdong";
        let profile = aggregate(
            &model,
            &units(text),
            &[Metric::Fwd],
            &[2],
            ProfileVariant::Freedom,
        )
        .expect("aggregate");
        assert_eq!(profile.len(), text.chars().count());
        let rebuilt: String = profile.rows().iter().map(|row| row.unit.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn aggregation_sums_across_gram_lengths_before_normalizing() {
        let model = trained(&["ding", "dong"], 2);
        let text = units("ding");
        let single = aggregate(&model, &text, &[Metric::Fwd], &[1], ProfileVariant::Freedom)
            .expect("aggregate");
        let combined = aggregate(
            &model,
            &text,
            &[Metric::Fwd],
            &[1, 2],
            ProfileVariant::Freedom,
        )
        .expect("aggregate");
        assert_eq!(single.len(), combined.len());
        // The summed column normalizes to a different shape than the single-n one.
        let column = combined.column(Metric::Fwd).expect("column");
        let max = (0..combined.len())
            .map(|row| combined.value(row, column))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn empty_n_list_is_rejected() {
        let model = trained(&["ding"], 2);
        let err = aggregate(
            &model,
            &units("ding"),
            &[Metric::Fwd],
            &[],
            ProfileVariant::Freedom,
        )
        .expect_err("empty n_list");
        assert!(matches!(err, GramsegError::InvalidParameter(_)));
    }

    #[test]
    fn empty_text_aggregates_to_empty_profile() {
        let model = trained(&["ding"], 2);
        let profile = aggregate(
            &model,
            &units(""),
            &[Metric::Fwd],
            &[1],
            ProfileVariant::Freedom,
        )
        .expect("aggregate");
        assert!(profile.is_empty());
    }
}
