//! Unsupervised word-boundary detection library and CLI.
//!
//! The crate learns character or token n-gram statistics from an unlabeled
//! corpus and turns them into token boundaries.  Typical usage trains a
//! [`GramModel`], profiles a text across several gram lengths, and segments
//! it at a threshold; the evaluator scores a configuration against a
//! reference tokenization.
//!
//! ```no_run
//! use gramseg::{segment_text, Metric, ProfileVariant, Trainer, TrainerConfig};
//!
//! # fn main() -> gramseg::Result<()> {
//! let cfg = TrainerConfig::builder()
//!     .max_n(5)
//!     .show_progress(false)
//!     .build()?;
//! let trainer = Trainer::new(cfg);
//! let artifacts = trainer.train_from_texts(&["first corpus text", "second corpus text"])?;
//! let tokens = segment_text(
//!     &artifacts.model,
//!     "firstsecond",
//!     Metric::DevBoth,
//!     None,
//!     &[1, 2, 3],
//!     0.5,
//!     ProfileVariant::Freedom,
//! )?;
//! println!("{tokens:?}");
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting
//! the library portion only can disable default features to avoid the CLI
//! dependencies: `gramseg = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod metrics;
pub mod model;
pub mod preprocess;
pub mod profile;
pub mod reference;
pub mod score;
pub mod segment;
pub mod serialization;
pub mod trainer;

pub use aggregate::{aggregate, AggregatedProfile, AggregatedRow};
pub use config::{Granularity, IngestBuilder, IngestConfig, TrainerBuilder, TrainerConfig};
pub use error::{GramsegError, Result};
pub use eval::{evaluate, EvalConfig, Evaluation};
pub use metrics::TrainingMetrics;
pub use model::{Count, Gram, GramModel};
pub use profile::{profile, Metric, ProfileRow, ProfileVariant};
pub use score::f1;
pub use segment::{segment_text, segment_with_forward_metric, segment_with_opposite_metrics};
pub use trainer::{Trainer, TrainerArtifacts};
