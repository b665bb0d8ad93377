//! Corpus aggregation of sentence statistics.
//!
//! A corpus is scored from summed sufficient statistics, never by averaging
//! sentence scores. Perfect sentences (everything matched in one chunk)
//! contribute no chunks, so they do not dilute the corpus fragmentation.

use rayon::prelude::*;

use crate::core::stats::{CategoryStats, LegacyStats, SentenceStats};

impl SentenceStats {
    /// What this sentence adds to a corpus: its aggregable fields, with
    /// `chunks` zeroed when the sentence is perfect.
    #[must_use]
    pub fn corpus_contribution(&self) -> Self {
        let mut contribution = self.clone();
        contribution.clear_derived();
        if self.is_perfect() {
            contribution.chunks = 0.0;
        }
        contribution
    }

    /// Add an increment's aggregable fields into `self`.
    ///
    /// The increment's chunks are skipped when it is perfect. Derived fields
    /// of `self` are reset and must be recomputed.
    pub fn add_stats(&mut self, increment: &Self) {
        let skip_chunks = increment.is_perfect();
        self.accumulate(increment, !skip_chunks);
    }

    /// Plain field-wise sum of two contributions.
    ///
    /// Unlike [`SentenceStats::add_stats`] this never looks at the perfect
    /// predicate, which makes it associative and commutative.
    pub fn merge(&mut self, other: &Self) {
        self.accumulate(other, true);
    }

    fn accumulate(&mut self, other: &Self, with_chunks: bool) {
        self.test_length += other.test_length;
        self.reference_length += other.reference_length;
        if with_chunks {
            self.chunks += other.chunks;
        }
        self.test_word_matches += other.test_word_matches;
        self.reference_word_matches += other.reference_word_matches;

        add_legacy(&mut self.legacy, &other.legacy);
        add_category(&mut self.category, &other.category);
        self.clear_derived();
    }
}

fn add_legacy(acc: &mut LegacyStats, inc: &LegacyStats) {
    acc.test_function_words += inc.test_function_words;
    acc.reference_function_words += inc.reference_function_words;
    acc.test_total_matches += inc.test_total_matches;
    acc.reference_total_matches += inc.reference_total_matches;

    add_stage_array(&mut acc.test_stage_content, &inc.test_stage_content);
    add_stage_array(&mut acc.reference_stage_content, &inc.reference_stage_content);
    add_stage_array(&mut acc.test_stage_function, &inc.test_stage_function);
    add_stage_array(&mut acc.reference_stage_function, &inc.reference_stage_function);
}

fn add_category(acc: &mut CategoryStats, inc: &CategoryStats) {
    for (a, b) in acc.test_counts.iter_mut().zip(&inc.test_counts) {
        *a += b;
    }
    for (a, b) in acc.reference_counts.iter_mut().zip(&inc.reference_counts) {
        *a += b;
    }
    for (a, b) in acc.test_stage_matches.iter_mut().zip(&inc.test_stage_matches) {
        add_stage_array(a, b);
    }
    for (a, b) in acc.reference_stage_matches.iter_mut().zip(&inc.reference_stage_matches) {
        add_stage_array(a, b);
    }
    acc.test_total_matches += inc.test_total_matches;
    acc.reference_total_matches += inc.reference_total_matches;
}

/// Index-wise sum; the shorter side counts as zero past its end
fn add_stage_array(acc: &mut Vec<f64>, inc: &[f64]) {
    if acc.len() < inc.len() {
        acc.resize(inc.len(), 0.0);
    }
    for (a, b) in acc.iter_mut().zip(inc) {
        *a += b;
    }
}

/// Add `increment` into `accumulator`; see [`SentenceStats::add_stats`]
pub fn add_stats(accumulator: &mut SentenceStats, increment: &SentenceStats) {
    accumulator.add_stats(increment);
}

/// Sequential corpus aggregation.
///
/// The result holds only aggregable fields; score it with
/// [`crate::scoring::compute_metrics`].
pub fn aggregate<'a, I>(sentences: I) -> SentenceStats
where
    I: IntoIterator<Item = &'a SentenceStats>,
{
    sentences
        .into_iter()
        .fold(SentenceStats::new(), |mut acc, stats| {
            acc.add_stats(stats);
            acc
        })
}

/// Parallel corpus aggregation, equal to [`aggregate`] up to float rounding
#[must_use]
pub fn aggregate_par(sentences: &[SentenceStats]) -> SentenceStats {
    sentences
        .par_iter()
        .map(SentenceStats::corpus_contribution)
        .reduce(SentenceStats::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Category;

    fn sentence(length: f64, matched: f64, chunks: f64) -> SentenceStats {
        let mut stats = SentenceStats::new();
        stats.test_length = length;
        stats.reference_length = length;
        stats.legacy.test_stage_content = vec![matched];
        stats.legacy.reference_stage_content = vec![matched];
        stats.legacy.recompute_totals();
        stats.test_word_matches = matched;
        stats.reference_word_matches = matched;
        stats.chunks = chunks;
        stats
    }

    #[test]
    fn test_perfect_increment_adds_no_chunks() {
        let mut acc = SentenceStats::new();
        acc.add_stats(&sentence(3.0, 3.0, 1.0));
        assert!(acc.chunks.abs() < f64::EPSILON);
        assert!((acc.test_length - 3.0).abs() < f64::EPSILON);

        acc.add_stats(&sentence(4.0, 2.0, 2.0));
        assert!((acc.chunks - 2.0).abs() < f64::EPSILON);
        assert!((acc.test_length - 7.0).abs() < f64::EPSILON);
        assert!((acc.legacy.test_total_matches - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stage_arrays_extend_both_ways() {
        let mut acc = sentence(3.0, 1.0, 1.0);
        let mut inc = sentence(3.0, 0.0, 0.0);
        inc.legacy.test_stage_content = vec![1.0, 2.0, 3.0];
        acc.add_stats(&inc);
        assert_eq!(acc.legacy.test_stage_content, vec![2.0, 2.0, 3.0]);

        let mut short = SentenceStats::new();
        short.legacy.test_stage_content = vec![5.0];
        let mut long = SentenceStats::new();
        long.legacy.test_stage_content = vec![1.0, 1.0];
        long.merge(&short);
        assert_eq!(long.legacy.test_stage_content, vec![6.0, 1.0]);
    }

    #[test]
    fn test_category_arrays_extend_independently() {
        let noun = Category::Noun.index();
        let verb = Category::Verb.index();
        let mut acc = SentenceStats::new();
        acc.category.test_stage_matches[noun] = vec![1.0];
        let mut inc = SentenceStats::new();
        inc.category.test_stage_matches[noun] = vec![0.0, 2.0];
        inc.category.test_stage_matches[verb] = vec![4.0];
        inc.category.test_counts[verb] = 1.0;

        acc.merge(&inc);
        assert_eq!(acc.category.test_stage_matches[noun], vec![1.0, 2.0]);
        assert_eq!(acc.category.test_stage_matches[verb], vec![4.0]);
        assert!(acc.category.test_stage_matches[0].is_empty());
        assert!((acc.category.test_count(Category::Verb) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derived_fields_are_reset() {
        let mut acc = sentence(2.0, 1.0, 1.0);
        acc.legacy.score = 0.7;
        acc.frag_penalty = 0.3;
        acc.add_stats(&sentence(2.0, 1.0, 1.0));
        assert!(acc.legacy.score.abs() < f64::EPSILON);
        assert!(acc.frag_penalty.abs() < f64::EPSILON);
    }

    #[test]
    fn test_identity() {
        let s = sentence(5.0, 3.0, 2.0);
        let mut acc = SentenceStats::new();
        acc.add_stats(&s);
        assert_eq!(acc, s);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sentences: Vec<SentenceStats> = (1..50)
            .map(|i| {
                let n = f64::from(i % 7 + 1);
                sentence(n, (n - 1.0).max(1.0), f64::from(i % 3 + 1))
            })
            .collect();
        let sequential = aggregate(&sentences);
        let parallel = aggregate_par(&sentences);

        assert!((sequential.chunks - parallel.chunks).abs() < 1e-9);
        assert!((sequential.test_length - parallel.test_length).abs() < 1e-9);
        assert_eq!(
            sequential.legacy.test_stage_content.len(),
            parallel.legacy.test_stage_content.len()
        );
    }

    #[test]
    fn test_empty_corpus() {
        assert_eq!(aggregate(&[]), SentenceStats::new());
        assert_eq!(aggregate_par(&[]), SentenceStats::new());
    }
}
