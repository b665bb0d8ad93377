//! Core data types for METEOR scoring.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`MatchEvidence`]: One aligned span between test and reference
//! - [`AlignmentSnapshot`]: Tokens, category partitions, match slots and running totals for one sentence pair
//! - [`SentenceStats`]: Sufficient statistics for a sentence or a corpus, with the
//!   [`LegacyStats`] and [`CategoryStats`] sub-records
//! - [`Stage`], [`Category`], [`Side`], [`LengthMode`]: Shared enums
//!
//! ## Two scoring schemes
//!
//! | Scheme   | Splits tokens by         | Mix weights                 |
//! |----------|--------------------------|-----------------------------|
//! | Legacy   | content vs function word | `delta`                     |
//! | Category | adj/adv, noun, other, verb | four `category_weights`  |
//!
//! Both share the lengths, chunk count and fragmentation penalty.

pub mod alignment;
pub mod stats;
pub mod types;

pub use alignment::{AlignmentSnapshot, CategoryPartition, MatchEvidence, SnapshotError, StageCounts, StageTotals};
pub use stats::{CategoryStats, LegacyStats, SentenceStats};
pub use types::{Category, LengthMode, Side, Stage, CATEGORY_COUNT, MAX_MODULES};
