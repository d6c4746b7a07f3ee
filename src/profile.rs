//! Per-position freedom and probability profiles over one text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GramsegError, Result};
use crate::model::{Gram, GramModel};

/// Primary signal a profile is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileVariant {
    /// Distinct-neighbor cardinalities (how many different units follow/precede).
    Freedom,
    /// Conditional transition probabilities of the actually observed neighbors.
    Probability,
}

impl fmt::Display for ProfileVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Freedom => "freedom",
            Self::Probability => "probability",
        };
        f.write_str(label)
    }
}

impl FromStr for ProfileVariant {
    type Err = GramsegError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "freedom" => Ok(Self::Freedom),
            "probability" => Ok(Self::Probability),
            other => Err(GramsegError::InvalidParameter(format!(
                "unknown profile variant {other:?}; expected \"freedom\" or \"probability\""
            ))),
        }
    }
}

/// Named column of a profile row.
///
/// `Fwd`/`Bwd` are the primary pair; the rest are the derived suite computed
/// from them.  `Either` columns sum a forward value with the next position's
/// backward value, `Both` columns multiply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Primary forward metric.
    Fwd,
    /// Primary backward metric.
    Bwd,
    /// Mean-centered forward deviation clipped at zero.
    DevFwd,
    /// Mean-centered backward deviation clipped at zero.
    DevBwd,
    /// `dev_fwd[i] + dev_bwd[i+1]`.
    DevEither,
    /// `dev_fwd[i] × dev_bwd[i+1]`.
    DevBoth,
    /// First difference of the forward metric.
    DiffFwd,
    /// Negated, shifted first difference of the backward metric.
    DiffBwd,
    /// `diff_fwd[i] + diff_bwd[i]`.
    DiffEither,
    /// `diff_fwd[i] × diff_bwd[i]`.
    DiffBoth,
    /// Second-order forward peak (freedom variant only).
    PeakFwd,
    /// Second-order backward peak (freedom variant only).
    PeakBwd,
    /// `fwd[i] + bwd[i+1]`.
    Either,
    /// `fwd[i] × bwd[i+1]`.
    Both,
}

impl Metric {
    /// Every metric column, in row layout order.
    pub const ALL: [Metric; 14] = [
        Metric::Fwd,
        Metric::Bwd,
        Metric::DevFwd,
        Metric::DevBwd,
        Metric::DevEither,
        Metric::DevBoth,
        Metric::DiffFwd,
        Metric::DiffBwd,
        Metric::DiffEither,
        Metric::DiffBoth,
        Metric::PeakFwd,
        Metric::PeakBwd,
        Metric::Either,
        Metric::Both,
    ];

    /// Stable textual name used by the CLI and reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fwd => "fwd",
            Self::Bwd => "bwd",
            Self::DevFwd => "dev-fwd",
            Self::DevBwd => "dev-bwd",
            Self::DevEither => "dev-either",
            Self::DevBoth => "dev-both",
            Self::DiffFwd => "diff-fwd",
            Self::DiffBwd => "diff-bwd",
            Self::DiffEither => "diff-either",
            Self::DiffBoth => "diff-both",
            Self::PeakFwd => "peak-fwd",
            Self::PeakBwd => "peak-bwd",
            Self::Either => "either",
            Self::Both => "both",
        }
    }

    /// Reads this column's value from a row.
    #[must_use]
    pub fn value(self, row: &ProfileRow) -> f64 {
        match self {
            Self::Fwd => row.fwd,
            Self::Bwd => row.bwd,
            Self::DevFwd => row.dev_fwd,
            Self::DevBwd => row.dev_bwd,
            Self::DevEither => row.dev_either,
            Self::DevBoth => row.dev_both,
            Self::DiffFwd => row.diff_fwd,
            Self::DiffBwd => row.diff_bwd,
            Self::DiffEither => row.diff_either,
            Self::DiffBoth => row.diff_both,
            Self::PeakFwd => row.peak_fwd,
            Self::PeakBwd => row.peak_bwd,
            Self::Either => row.either,
            Self::Both => row.both,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = GramsegError;

    fn from_str(value: &str) -> Result<Self> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == value)
            .ok_or_else(|| {
                GramsegError::InvalidParameter(format!("unknown metric {value:?}"))
            })
    }
}

/// One position of a profile: the gram starting there, the primary pair, and
/// the derived suite.  Rows are strictly ordered by position; derived columns
/// reference neighboring rows by that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    /// Unit index the gram starts at.
    pub pos: usize,
    /// The gram spanning `[pos, pos + n)`.
    pub gram: Gram,
    /// Primary forward metric.
    pub fwd: f64,
    /// Primary backward metric.
    pub bwd: f64,
    /// `max(0, fwd − mean(fwd))`.
    pub dev_fwd: f64,
    /// `max(0, bwd − mean(bwd))`.
    pub dev_bwd: f64,
    /// `dev_fwd[i] + dev_bwd[i+1]`.
    pub dev_either: f64,
    /// `dev_fwd[i] × dev_bwd[i+1]`.
    pub dev_both: f64,
    /// `fwd[i] − fwd[i−1]`, 0 at the first row.
    pub diff_fwd: f64,
    /// `−(bwd[i+1] − bwd[i])`, 0 at the last row.
    pub diff_bwd: f64,
    /// `diff_fwd + diff_bwd`.
    pub diff_either: f64,
    /// `diff_fwd × diff_bwd`.
    pub diff_both: f64,
    /// `diff_fwd[i] − diff_fwd[i+1]`; 0 under the probability variant.
    pub peak_fwd: f64,
    /// `diff_bwd[i] − diff_bwd[i−1]`; 0 under the probability variant.
    pub peak_bwd: f64,
    /// `fwd[i] + bwd[i+1]`.
    pub either: f64,
    /// `fwd[i] × bwd[i+1]`.
    pub both: f64,
}

impl ProfileRow {
    fn new(pos: usize, gram: Gram, fwd: f64, bwd: f64) -> Self {
        Self {
            pos,
            gram,
            fwd,
            bwd,
            dev_fwd: 0.0,
            dev_bwd: 0.0,
            dev_either: 0.0,
            dev_both: 0.0,
            diff_fwd: 0.0,
            diff_bwd: 0.0,
            diff_either: 0.0,
            diff_both: 0.0,
            peak_fwd: 0.0,
            peak_bwd: 0.0,
            either: 0.0,
            both: 0.0,
        }
    }
}

/// Computes a profile for one gram length over a unit sequence.
///
/// The profile covers every position where a complete gram of length `n`
/// starts, so it holds `len(units) − n + 1` rows; a text shorter than `n`
/// (including the empty text) yields an empty profile.  Requesting an `n`
/// outside the model's trained range is an [`GramsegError::InvalidParameter`]
/// error.
pub fn profile(
    model: &GramModel,
    units: &[String],
    n: usize,
    variant: ProfileVariant,
) -> Result<Vec<ProfileRow>> {
    model.check_n(n)?;
    if units.len() < n {
        return Ok(Vec::new());
    }
    let granularity = model.granularity();
    let mut rows = Vec::with_capacity(units.len() - n + 1);
    for i in 0..=units.len() - n {
        let gram = granularity.join(&units[i..i + n]);
        let (fwd, bwd) = match variant {
            ProfileVariant::Freedom => (
                model.successor_freedom(&gram) as f64,
                model.predecessor_freedom(&gram) as f64,
            ),
            ProfileVariant::Probability => {
                let freq = model.frequency(&gram);
                if freq == 0 {
                    (0.0, 0.0)
                } else {
                    let fwd = match units.get(i + n) {
                        Some(next) => model.successor_count(&gram, next) as f64 / freq as f64,
                        None => 0.0,
                    };
                    let bwd = if i > 0 {
                        model.predecessor_count(&gram, &units[i - 1]) as f64 / freq as f64
                    } else {
                        0.0
                    };
                    (fwd, bwd)
                }
            }
        };
        rows.push(ProfileRow::new(i, gram, fwd, bwd));
    }

    // Unigram probabilities are rescaled by their own maximum over the text.
    if variant == ProfileVariant::Probability && n == 1 {
        renormalize_by_max(&mut rows);
    }
    derive_columns(&mut rows, variant);
    Ok(rows)
}

fn renormalize_by_max(rows: &mut [ProfileRow]) {
    let max_fwd = rows.iter().fold(0.0f64, |acc, row| acc.max(row.fwd));
    let max_bwd = rows.iter().fold(0.0f64, |acc, row| acc.max(row.bwd));
    for row in rows {
        if max_fwd > 0.0 {
            row.fwd /= max_fwd;
        }
        if max_bwd > 0.0 {
            row.bwd /= max_bwd;
        }
    }
}

/// Fills the derived columns.  Any reference to a row outside the profile
/// resolves to 0, never to a non-numeric value.
fn derive_columns(rows: &mut [ProfileRow], variant: ProfileVariant) {
    let len = rows.len();
    if len == 0 {
        return;
    }
    let mean_fwd = rows.iter().map(|row| row.fwd).sum::<f64>() / len as f64;
    let mean_bwd = rows.iter().map(|row| row.bwd).sum::<f64>() / len as f64;
    for row in rows.iter_mut() {
        row.dev_fwd = (row.fwd - mean_fwd).max(0.0);
        row.dev_bwd = (row.bwd - mean_bwd).max(0.0);
    }
    for i in 0..len {
        rows[i].diff_fwd = if i > 0 { rows[i].fwd - rows[i - 1].fwd } else { 0.0 };
        rows[i].diff_bwd = if i + 1 < len {
            -(rows[i + 1].bwd - rows[i].bwd)
        } else {
            0.0
        };
    }
    for i in 0..len {
        let dev_bwd_next = if i + 1 < len { rows[i + 1].dev_bwd } else { 0.0 };
        rows[i].dev_either = rows[i].dev_fwd + dev_bwd_next;
        rows[i].dev_both = rows[i].dev_fwd * dev_bwd_next;
        rows[i].diff_either = rows[i].diff_fwd + rows[i].diff_bwd;
        rows[i].diff_both = rows[i].diff_fwd * rows[i].diff_bwd;
        let bwd_next = if i + 1 < len { rows[i + 1].bwd } else { 0.0 };
        rows[i].either = rows[i].fwd + bwd_next;
        rows[i].both = rows[i].fwd * bwd_next;
    }
    if variant == ProfileVariant::Freedom {
        for i in 0..len {
            let diff_fwd_next = if i + 1 < len { rows[i + 1].diff_fwd } else { 0.0 };
            rows[i].peak_fwd = rows[i].diff_fwd - diff_fwd_next;
            let diff_bwd_prev = if i > 0 { rows[i - 1].diff_bwd } else { 0.0 };
            rows[i].peak_bwd = rows[i].diff_bwd - diff_bwd_prev;
        }
    }
}
