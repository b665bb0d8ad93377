//! Turning alignments into METEOR scores.
//!
//! The pipeline is:
//!
//! 1. [`derive_stats`]: snapshot to raw sufficient statistics
//! 2. [`compute_metrics`]: precision, recall, F-mean, penalty and score
//! 3. [`aggregate`] / [`aggregate_par`]: sum sentence statistics into a corpus,
//!    then rescore with [`compute_metrics`]
//!
//! [`Scorer`] wraps the whole pipeline around an [`Aligner`].

pub mod aggregate;
pub mod derive;
pub mod engine;
pub mod metrics;
pub mod params;

pub use aggregate::{add_stats, aggregate, aggregate_par};
pub use derive::derive_stats;
pub use engine::{Aligner, Scorer, ScoringError};
pub use metrics::compute_metrics;
pub use params::{validate_module_weights, ConfigError, ScoringParams};
