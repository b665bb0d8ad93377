//! Part-of-speech tagging seam.
//!
//! The tagger model itself lives outside this crate. This module defines:
//!
//! - [`Tagger`]: the capability an external tagger implements
//! - [`CategoryMap`]: the configuration-driven table from tags to the four
//!   grammatical categories (adjective/adverb, noun, other, verb)
//! - [`split_tagged`]: a reader for `word_TAG` tagger output

pub mod categories;
pub mod tagger;

pub use categories::{CategoryLists, CategoryMap, CategoryMapError};
pub use tagger::{split_tagged, LookupTagger, Tagger, TaggerError};
