//! Command-line interface for meteor-scorer.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **derive**: Turn JSON-lines alignment snapshots into statistics lines
//! - **score**: Score statistics lines per segment and for the whole corpus
//! - **aggregate**: Sum statistics lines into one corpus line
//!
//! ## Usage
//!
//! ```text
//! # Derive statistics from aligner output
//! meteor-scorer derive alignments.jsonl > segments.stats
//!
//! # Score them with custom parameters
//! meteor-scorer score segments.stats --params params.json --gamma 0.5
//!
//! # Merge statistics computed on several machines
//! cat part-*.stats | meteor-scorer aggregate - > corpus.stats
//!
//! # JSON output for scripting
//! meteor-scorer score segments.stats --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::{LengthMode, CATEGORY_COUNT};
use crate::scoring::ScoringParams;

pub mod aggregate;
pub mod derive;
pub mod score;

#[derive(Parser)]
#[command(name = "meteor-scorer")]
#[command(version)]
#[command(about = "Compute METEOR statistics and scores from sentence alignments")]
#[command(
    long_about = "meteor-scorer turns aligned sentence pairs into METEOR sufficient statistics and scores them.\n\nStatistics lines are additive, so they can be computed in parallel, stored, merged and rescored with different parameters:\n- derive: alignment snapshots to statistics lines\n- score: per-segment and corpus scores\n- aggregate: one corpus statistics line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive statistics lines from JSON-lines alignment snapshots
    Derive(derive::DeriveArgs),

    /// Score statistics lines per segment and for the corpus
    Score(score::ScoreArgs),

    /// Aggregate statistics lines into one corpus line
    Aggregate(aggregate::AggregateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Scoring parameter options shared by the commands that score
#[derive(clap::Args, Debug, Default)]
pub struct ParamArgs {
    /// JSON parameter file; the flags below override its values
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Precision/recall balance (0-1)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Fragmentation penalty exponent
    #[arg(long)]
    pub beta: Option<f64>,

    /// Maximum fragmentation penalty (0-1)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Content word weight (0-1); function words get 1 - delta
    #[arg(long)]
    pub delta: Option<f64>,

    /// Comma-separated weight per alignment stage
    #[arg(long, value_delimiter = ',')]
    pub module_weights: Option<Vec<f64>>,

    /// Comma-separated weights for adj/adv, noun, other and verb
    #[arg(long, value_delimiter = ',')]
    pub category_weights: Option<Vec<f64>>,
}

impl ParamArgs {
    /// Build validated parameters from the file (or defaults) plus flag overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter file cannot be loaded or a value is
    /// out of range.
    pub fn resolve(&self) -> anyhow::Result<ScoringParams> {
        let mut params = match &self.params {
            Some(path) => ScoringParams::load_from_file(path)?,
            None => ScoringParams::default(),
        };

        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            params.beta = beta;
        }
        if let Some(gamma) = self.gamma {
            params.gamma = gamma;
        }
        if let Some(delta) = self.delta {
            params.delta = delta;
        }
        if let Some(weights) = &self.module_weights {
            params.module_weights.clone_from(weights);
        }
        if let Some(weights) = &self.category_weights {
            params.category_weights = <[f64; CATEGORY_COUNT]>::try_from(weights.as_slice())
                .map_err(|_| {
                    anyhow::anyhow!(
                        "Expected {CATEGORY_COUNT} category weights, got {}",
                        weights.len()
                    )
                })?;
        }

        params.validate()?;
        Ok(params)
    }

    /// Same as [`ParamArgs::resolve`], with character lengths when `char_based`
    ///
    /// # Errors
    ///
    /// See [`ParamArgs::resolve`].
    pub fn resolve_with_mode(&self, char_based: bool) -> anyhow::Result<ScoringParams> {
        let params = self.resolve()?;
        Ok(if char_based {
            params.with_length_mode(LengthMode::Characters)
        } else {
            params
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let params = ParamArgs::default().resolve().unwrap();
        assert_eq!(params, ScoringParams::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"alpha": 0.5, "gamma": 0.4}"#).unwrap();

        let args = ParamArgs {
            params: Some(file.path().to_path_buf()),
            gamma: Some(0.1),
            module_weights: Some(vec![1.0, 0.5]),
            ..ParamArgs::default()
        };
        let params = args.resolve().unwrap();
        assert!((params.alpha - 0.5).abs() < f64::EPSILON);
        assert!((params.gamma - 0.1).abs() < f64::EPSILON);
        assert_eq!(params.module_weights, vec![1.0, 0.5]);
    }

    #[test]
    fn test_category_weights_need_four_values() {
        let args = ParamArgs {
            category_weights: Some(vec![1.0, 2.0]),
            ..ParamArgs::default()
        };
        assert!(args.resolve().is_err());

        let args = ParamArgs {
            category_weights: Some(vec![1.0, 2.0, 0.5, 1.0]),
            ..ParamArgs::default()
        };
        assert_eq!(args.resolve().unwrap().category_weights, [1.0, 2.0, 0.5, 1.0]);
    }

    #[test]
    fn test_out_of_range_flag_rejected() {
        let args = ParamArgs {
            delta: Some(1.5),
            ..ParamArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_char_mode() {
        let params = ParamArgs::default().resolve_with_mode(true).unwrap();
        assert_eq!(params.length_mode, LengthMode::Characters);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
