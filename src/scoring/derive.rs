//! Derivation of sufficient statistics from an alignment snapshot.

use tracing::debug;

use crate::core::alignment::AlignmentSnapshot;
use crate::core::stats::SentenceStats;
use crate::core::types::{Category, LengthMode, Side};
use crate::scoring::engine::ScoringError;
use crate::utils::validation::count_to_f64;

/// Build raw sentence statistics from a populated snapshot.
///
/// Derived fields are left at zero; run [`crate::scoring::compute_metrics`]
/// to fill them.
///
/// Match totals are always re-summed from the per-stage arrays built here.
/// The snapshot's own `test_matches` / `reference_matches` may carry stage
/// weights, and weights are applied only once, at scoring time.
///
/// # Errors
///
/// Returns `ScoringError::Snapshot` if the snapshot fails
/// [`AlignmentSnapshot::validate`].
pub fn derive_stats(
    snapshot: &AlignmentSnapshot,
    mode: LengthMode,
) -> Result<SentenceStats, ScoringError> {
    snapshot.validate()?;

    let mut stats = match mode {
        LengthMode::Tokens => token_stats(snapshot),
        LengthMode::Characters => character_stats(snapshot),
    };

    // Same for token and character mode
    stats.chunks = count_to_f64(snapshot.chunks);

    let totals = &snapshot.stage_totals;
    for stage in 0..totals.stage_count() {
        stats.test_word_matches += count_to_f64(totals.word_matches(Side::Test, stage));
        stats.reference_word_matches += count_to_f64(totals.word_matches(Side::Reference, stage));
    }

    stats.legacy.recompute_totals();
    stats.category.recompute_totals();

    debug!(
        test_length = stats.test_length,
        reference_length = stats.reference_length,
        test_matches = stats.legacy.test_total_matches,
        reference_matches = stats.legacy.reference_total_matches,
        chunks = stats.chunks,
        "derived sentence statistics"
    );

    Ok(stats)
}

fn token_stats(snapshot: &AlignmentSnapshot) -> SentenceStats {
    let mut stats = SentenceStats::new();
    let totals = &snapshot.stage_totals;

    stats.test_length = count_to_f64(snapshot.test_words.len());
    stats.reference_length = count_to_f64(snapshot.reference_words.len());

    let legacy = &mut stats.legacy;
    legacy.test_function_words = count_to_f64(snapshot.test_function_words.len());
    legacy.reference_function_words = count_to_f64(snapshot.reference_function_words.len());
    legacy.test_stage_content = to_f64(&totals.content.test);
    legacy.reference_stage_content = to_f64(&totals.content.reference);
    legacy.test_stage_function = to_f64(&totals.function.test);
    legacy.reference_stage_function = to_f64(&totals.function.reference);

    let category = &mut stats.category;
    for c in Category::ALL {
        let i = c.index();
        category.test_counts[i] = count_to_f64(snapshot.test_categories.count(c));
        category.reference_counts[i] = count_to_f64(snapshot.reference_categories.count(c));
        category.test_stage_matches[i] = to_f64(&totals.category(c).test);
        category.reference_stage_matches[i] = to_f64(&totals.category(c).reference);
    }

    stats
}

/// Character mode: every quantity is a sum of token character lengths.
///
/// Category statistics stay empty in this mode.
fn character_stats(snapshot: &AlignmentSnapshot) -> SentenceStats {
    let mut stats = SentenceStats::new();
    let stages = snapshot.stage_totals.stage_count();

    stats.test_length = char_total(snapshot, Side::Test, 0..snapshot.test_words.len());
    stats.reference_length =
        char_total(snapshot, Side::Reference, 0..snapshot.reference_words.len());
    stats.legacy.test_function_words = snapshot
        .test_function_words
        .iter()
        .map(|&i| char_len(&snapshot.test_words[i]))
        .sum();
    stats.legacy.reference_function_words = snapshot
        .reference_function_words
        .iter()
        .map(|&i| char_len(&snapshot.reference_words[i]))
        .sum();

    let mut test_content = vec![0.0; stages];
    let mut test_function = vec![0.0; stages];
    let mut reference_content = vec![0.0; stages];
    let mut reference_function = vec![0.0; stages];

    for evidence in snapshot.iter_matches() {
        for i in evidence.test_span() {
            let chars = char_len(&snapshot.test_words[i]);
            if snapshot.test_function_words.contains(&i) {
                test_function[evidence.stage] += chars;
            } else {
                test_content[evidence.stage] += chars;
            }
        }
        for i in evidence.reference_span() {
            let chars = char_len(&snapshot.reference_words[i]);
            if snapshot.reference_function_words.contains(&i) {
                reference_function[evidence.stage] += chars;
            } else {
                reference_content[evidence.stage] += chars;
            }
        }
    }

    stats.legacy.test_stage_content = test_content;
    stats.legacy.reference_stage_content = reference_content;
    stats.legacy.test_stage_function = test_function;
    stats.legacy.reference_stage_function = reference_function;

    stats
}

fn char_len(word: &str) -> f64 {
    count_to_f64(word.chars().count())
}

fn char_total(snapshot: &AlignmentSnapshot, side: Side, range: std::ops::Range<usize>) -> f64 {
    snapshot.words(side)[range].iter().map(|w| char_len(w)).sum()
}

fn to_f64(counts: &[usize]) -> Vec<f64> {
    counts.iter().map(|&c| count_to_f64(c)).collect()
}
