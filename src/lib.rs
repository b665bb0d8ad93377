//! # meteor-scorer
//!
//! A library for computing METEOR machine-translation scores from sentence
//! alignments.
//!
//! METEOR compares a candidate (test) translation with a reference by
//! aligning their words in stages of decreasing confidence (exact, stem,
//! synonym, paraphrase). This crate takes those alignments and does
//! everything after them:
//!
//! - **Sufficient statistics**: additive per-sentence counts that can be
//!   stored, merged across machines and rescored later
//! - **Two scoring schemes**: the content/function-word scheme and a
//!   category-weighted scheme over adjectives/adverbs, nouns, verbs and the rest
//! - **Corpus scoring**: aggregation of statistics, sequential or parallel,
//!   followed by rescoring
//! - **A text codec**: one fixed-width line of numbers per sentence
//!
//! ## Example
//!
//! ```rust
//! use meteor_scorer::{AlignmentSnapshot, MatchEvidence, ScoringParams};
//! use meteor_scorer::scoring::{compute_metrics, derive_stats};
//!
//! let mut snapshot = AlignmentSnapshot::from_tokens(["the", "cat", "sat"], ["the", "cat", "sat"]);
//! snapshot.record_match(MatchEvidence::new(0, 3, 0, 3, 0), 1.0).unwrap();
//! snapshot.recount_chunks();
//!
//! let params = ScoringParams::default();
//! let mut stats = derive_stats(&snapshot, params.length_mode).unwrap();
//! compute_metrics(&mut stats, &params).unwrap();
//! assert!((stats.score() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Alignment snapshots, sentence statistics and shared enums
//! - [`scoring`]: Derivation, metrics, aggregation and the [`Scorer`] front end
//! - [`tagging`]: Part-of-speech taggers and the tag to category table
//! - [`parsing`]: Statistics codec and snapshot readers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod scoring;
pub mod tagging;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::alignment::{AlignmentSnapshot, MatchEvidence};
pub use core::stats::SentenceStats;
pub use core::types::*;
pub use scoring::engine::{Aligner, Scorer, ScoringError};
pub use scoring::params::ScoringParams;
