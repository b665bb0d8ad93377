use serde::{Deserialize, Serialize};

use crate::core::types::{Category, CATEGORY_COUNT};

/// Content/function-word statistics behind the classic METEOR score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyStats {
    // === Aggregable ===
    pub test_function_words: f64,
    pub reference_function_words: f64,

    /// Raw (unweighted) matches, always the sum of the stage arrays
    pub test_total_matches: f64,
    pub reference_total_matches: f64,

    pub test_stage_content: Vec<f64>,
    pub reference_stage_content: Vec<f64>,
    pub test_stage_function: Vec<f64>,
    pub reference_stage_function: Vec<f64>,

    // === Derived by scoring ===
    pub test_weighted_matches: f64,
    pub reference_weighted_matches: f64,
    pub test_weighted_length: f64,
    pub reference_weighted_length: f64,

    pub precision: f64,
    pub recall: f64,
    /// Diagnostic only; NaN when precision and recall are both zero or undefined
    pub f1: f64,
    pub f_mean: f64,
    pub score: f64,
}

impl LegacyStats {
    /// Re-sum the raw totals from the stage arrays
    pub fn recompute_totals(&mut self) {
        self.test_total_matches =
            self.test_stage_content.iter().sum::<f64>() + self.test_stage_function.iter().sum::<f64>();
        self.reference_total_matches = self.reference_stage_content.iter().sum::<f64>()
            + self.reference_stage_function.iter().sum::<f64>();
    }

    fn stage_arrays_mut(&mut self) -> [&mut Vec<f64>; 4] {
        [
            &mut self.test_stage_content,
            &mut self.reference_stage_content,
            &mut self.test_stage_function,
            &mut self.reference_stage_function,
        ]
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        [
            &self.test_stage_content,
            &self.reference_stage_content,
            &self.test_stage_function,
            &self.reference_stage_function,
        ]
        .iter()
        .map(|v| v.len())
        .max()
        .unwrap_or(0)
    }

    fn clear_derived(&mut self) {
        self.test_weighted_matches = 0.0;
        self.reference_weighted_matches = 0.0;
        self.test_weighted_length = 0.0;
        self.reference_weighted_length = 0.0;
        self.precision = 0.0;
        self.recall = 0.0;
        self.f1 = 0.0;
        self.f_mean = 0.0;
        self.score = 0.0;
    }
}

/// Four-category statistics behind the category-weighted score.
///
/// Arrays indexed by category follow [`Category::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    // === Aggregable ===
    pub test_counts: [f64; CATEGORY_COUNT],
    pub reference_counts: [f64; CATEGORY_COUNT],

    /// `test_stage_matches[category][stage]`
    pub test_stage_matches: [Vec<f64>; CATEGORY_COUNT],
    pub reference_stage_matches: [Vec<f64>; CATEGORY_COUNT],

    pub test_total_matches: f64,
    pub reference_total_matches: f64,

    // === Derived by scoring ===
    pub precision_numerator: f64,
    pub recall_numerator: f64,
    pub precision_denominator: f64,
    pub recall_denominator: f64,

    pub precision: f64,
    pub recall: f64,
    /// Diagnostic only; may be NaN
    pub f1: f64,
    pub f_mean: f64,
    pub score: f64,
}

impl CategoryStats {
    #[must_use]
    pub fn test_count(&self, category: Category) -> f64 {
        self.test_counts[category.index()]
    }

    #[must_use]
    pub fn reference_count(&self, category: Category) -> f64 {
        self.reference_counts[category.index()]
    }

    /// Re-sum the raw totals from the stage arrays
    pub fn recompute_totals(&mut self) {
        self.test_total_matches = self.test_stage_matches.iter().flatten().sum();
        self.reference_total_matches = self.reference_stage_matches.iter().flatten().sum();
    }

    fn stage_arrays_mut(&mut self) -> impl Iterator<Item = &mut Vec<f64>> {
        self.test_stage_matches
            .iter_mut()
            .chain(self.reference_stage_matches.iter_mut())
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.test_stage_matches
            .iter()
            .chain(self.reference_stage_matches.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    fn clear_derived(&mut self) {
        self.precision_numerator = 0.0;
        self.recall_numerator = 0.0;
        self.precision_denominator = 0.0;
        self.recall_denominator = 0.0;
        self.precision = 0.0;
        self.recall = 0.0;
        self.f1 = 0.0;
        self.f_mean = 0.0;
        self.score = 0.0;
    }
}

/// Sufficient statistics for one sentence pair, or for a whole corpus.
///
/// Sentence-level instances come from [`crate::scoring::derive_stats`];
/// corpus-level instances only ever come from aggregation. Derived fields are
/// valid for the instance they were computed on and must be recomputed with
/// [`crate::scoring::compute_metrics`] after any aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceStats {
    pub test_length: f64,
    pub reference_length: f64,

    pub chunks: f64,

    /// Matched token counts used for fragmentation, even in character mode
    pub test_word_matches: f64,
    pub reference_word_matches: f64,

    pub legacy: LegacyStats,
    pub category: CategoryStats,

    /// Shared by both schemes; derived
    pub frag_penalty: f64,
}

impl SentenceStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token on both sides matched, in a single chunk
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_perfect(&self) -> bool {
        self.legacy.test_total_matches == self.test_length
            && self.legacy.reference_total_matches == self.reference_length
            && self.chunks == 1.0
    }

    /// Longest per-stage array across both schemes
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.legacy.stage_count().max(self.category.stage_count())
    }

    /// Zero-extend every per-stage array to at least `stages` entries
    pub fn pad_stages(&mut self, stages: usize) {
        for v in self.legacy.stage_arrays_mut() {
            pad(v, stages);
        }
        for v in self.category.stage_arrays_mut() {
            pad(v, stages);
        }
    }

    /// Reset every derived field, keeping only the aggregable ones
    pub fn clear_derived(&mut self) {
        self.legacy.clear_derived();
        self.category.clear_derived();
        self.frag_penalty = 0.0;
    }

    /// Legacy (content/function) score
    #[must_use]
    pub fn score(&self) -> f64 {
        self.legacy.score
    }

    /// Category-weighted score
    #[must_use]
    pub fn category_score(&self) -> f64 {
        self.category.score
    }
}

fn pad(values: &mut Vec<f64>, len: usize) {
    if values.len() < len {
        values.resize(len, 0.0);
    }
}
