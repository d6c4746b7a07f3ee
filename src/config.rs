//! Configuration builders controlling training and corpus ingestion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GramsegError, Result};

/// Unit stream a model is trained over, fixed at model construction.
///
/// `Chars` is the legacy granularity used by the original freedom-tokenization
/// experiments; `Tokens` operates over the whitespace-delimited token stream of
/// the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One unit per character of the normalized text, spaces included.
    Chars,
    /// One unit per whitespace-delimited token of the normalized text.
    Tokens,
}

impl Granularity {
    /// Splits a normalized text into its unit sequence.
    #[must_use]
    pub fn units(self, text: &str) -> Vec<String> {
        match self {
            Self::Chars => text.chars().map(String::from).collect(),
            Self::Tokens => text.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Joins a window of units back into a single gram or token string.
    ///
    /// Token units never contain whitespace, so the space-joined form is an
    /// unambiguous table key that re-splits into the original units.
    #[must_use]
    pub fn join<S: AsRef<str>>(self, units: &[S]) -> String {
        let sep = match self {
            Self::Chars => "",
            Self::Tokens => " ",
        };
        let mut out = String::new();
        for (idx, unit) in units.iter().enumerate() {
            if idx > 0 {
                out.push_str(sep);
            }
            out.push_str(unit.as_ref());
        }
        out
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Chars => "chars",
            Self::Tokens => "tokens",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = GramsegError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "chars" => Ok(Self::Chars),
            "tokens" => Ok(Self::Tokens),
            other => Err(GramsegError::InvalidParameter(format!(
                "unknown granularity {other:?}; expected \"chars\" or \"tokens\""
            ))),
        }
    }
}

/// Configuration for gram-statistics training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Largest gram length collected into the model tables.
    pub max_n: usize,
    /// Unit stream the model observes.
    pub granularity: Granularity,
    /// Enables per-text logging through the `log` facade.
    pub show_progress: bool,
}

impl TrainerConfig {
    /// Returns a builder initialised with [`TrainerConfig::default`].
    #[must_use]
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    /// Validates the invariants required for training.
    pub fn validate(&self) -> Result<()> {
        if self.max_n == 0 {
            return Err(GramsegError::InvalidConfig(
                "max_n must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_n: 7,
            granularity: Granularity::Chars,
            show_progress: true,
        }
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default, Clone)]
pub struct TrainerBuilder {
    cfg: TrainerConfig,
}

impl TrainerBuilder {
    /// Creates a builder with [`TrainerConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest gram length collected during training.
    #[must_use]
    pub fn max_n(mut self, value: usize) -> Self {
        self.cfg.max_n = value;
        self
    }

    /// Selects the unit stream the model observes.
    #[must_use]
    pub fn granularity(mut self, value: Granularity) -> Self {
        self.cfg.granularity = value;
        self
    }

    /// Enables or disables per-text logging.
    #[must_use]
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.cfg.show_progress = enabled;
        self
    }

    /// Finalises the builder, returning a validated [`TrainerConfig`].
    pub fn build(self) -> Result<TrainerConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how text corpora are read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Treats every non-empty line as one text; `false` loads whole files.
    pub line_delimited: bool,
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            line_delimited: true,
            recursive: true,
            follow_symlinks: false,
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Creates a new builder with [`IngestConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether each non-empty line is loaded as its own text.
    #[must_use]
    pub fn line_delimited(mut self, enabled: bool) -> Self {
        self.cfg.line_delimited = enabled;
        self
    }

    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_zero_max_n() {
        let err = TrainerConfig::builder()
            .max_n(0)
            .build()
            .expect_err("validation should fail");
        assert!(matches!(
            err,
            GramsegError::InvalidConfig(message) if message.contains("max_n")
        ));
    }

    #[test]
    fn granularity_round_trips_through_strings() {
        for granularity in [Granularity::Chars, Granularity::Tokens] {
            let parsed: Granularity = granularity.to_string().parse().expect("parse");
            assert_eq!(parsed, granularity);
        }
        assert!("words".parse::<Granularity>().is_err());
    }

    #[test]
    fn chars_units_split_and_rejoin() {
        let units = Granularity::Chars.units("ab c");
        assert_eq!(units, vec!["a", "b", " ", "c"]);
        assert_eq!(Granularity::Chars.join(&units), "ab c");
    }

    #[test]
    fn token_units_drop_whitespace_runs() {
        let units = Granularity::Tokens.units("ab  c\td");
        assert_eq!(units, vec!["ab", "c", "d"]);
        assert_eq!(Granularity::Tokens.join(&units), "ab c d");
    }

    #[test]
    fn ingest_builder_overrides_defaults() {
        let cfg = IngestConfig::builder()
            .line_delimited(false)
            .recursive(false)
            .follow_symlinks(true)
            .build();
        assert!(!cfg.line_delimited);
        assert!(!cfg.recursive);
        assert!(cfg.follow_symlinks);
    }
}
