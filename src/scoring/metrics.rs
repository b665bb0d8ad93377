//! Final METEOR metrics from sufficient statistics.
//!
//! The legacy and category-weighted schemes are scored by separate functions
//! that each read only their own sub-record plus the shared lengths. They meet
//! only in the fragmentation penalty, which both apply.

use crate::core::stats::{CategoryStats, LegacyStats, SentenceStats};
use crate::core::types::CATEGORY_COUNT;
use crate::scoring::engine::ScoringError;
use crate::scoring::params::ScoringParams;

/// Compute precision, recall, F-mean, fragmentation penalty and score for
/// both schemes, in place.
///
/// Degenerate statistics (zero lengths or zero weighted denominators) produce
/// NaN in the intermediate fields; `f1` may stay NaN, while both final scores
/// are normalized to 0.
///
/// # Errors
///
/// Returns `ScoringError::StageWeightMismatch` if a stage array holds matches
/// at a stage that has no module weight.
pub fn compute_metrics(stats: &mut SentenceStats, params: &ScoringParams) -> Result<(), ScoringError> {
    check_stage_weights(stats, &params.module_weights)?;

    score_legacy(
        &mut stats.legacy,
        stats.test_length,
        stats.reference_length,
        params,
    );
    score_category(&mut stats.category, params);

    let frag = fragmentation(stats);
    stats.frag_penalty = params.gamma * frag.powf(params.beta);

    stats.legacy.score = final_score(stats.legacy.f_mean, stats.frag_penalty);
    stats.category.score = final_score(stats.category.f_mean, stats.frag_penalty);
    Ok(())
}

/// Content/function-weighted precision, recall and F-mean
fn score_legacy(legacy: &mut LegacyStats, test_length: f64, reference_length: f64, params: &ScoringParams) {
    let delta = params.delta;
    let weights = &params.module_weights;

    legacy.test_weighted_length =
        delta * (test_length - legacy.test_function_words) + (1.0 - delta) * legacy.test_function_words;
    legacy.reference_weighted_length = delta * (reference_length - legacy.reference_function_words)
        + (1.0 - delta) * legacy.reference_function_words;

    legacy.test_weighted_matches = weighted_sum(&legacy.test_stage_content, weights) * delta
        + weighted_sum(&legacy.test_stage_function, weights) * (1.0 - delta);
    legacy.reference_weighted_matches = weighted_sum(&legacy.reference_stage_content, weights) * delta
        + weighted_sum(&legacy.reference_stage_function, weights) * (1.0 - delta);

    legacy.precision = legacy.test_weighted_matches / legacy.test_weighted_length;
    legacy.recall = legacy.reference_weighted_matches / legacy.reference_weighted_length;
    legacy.f1 = f1(legacy.precision, legacy.recall);
    legacy.f_mean = f_mean(legacy.precision, legacy.recall, params.alpha);
}

/// Category-weighted precision, recall and F-mean
fn score_category(category: &mut CategoryStats, params: &ScoringParams) {
    let cw = &params.category_weights;
    let weights = &params.module_weights;

    category.precision_denominator = dot(cw, &category.test_counts);
    category.recall_denominator = dot(cw, &category.reference_counts);

    category.precision_numerator = (0..CATEGORY_COUNT)
        .map(|c| cw[c] * weighted_sum(&category.test_stage_matches[c], weights))
        .sum();
    category.recall_numerator = (0..CATEGORY_COUNT)
        .map(|c| cw[c] * weighted_sum(&category.reference_stage_matches[c], weights))
        .sum();

    category.precision = category.precision_numerator / category.precision_denominator;
    category.recall = category.recall_numerator / category.recall_denominator;
    category.f1 = f1(category.precision, category.recall);
    category.f_mean = f_mean(category.precision, category.recall, params.alpha);
}

/// Chunks per average matched word, or 0 for a perfect single-chunk match
fn fragmentation(stats: &SentenceStats) -> f64 {
    if stats.is_perfect() {
        0.0
    } else {
        stats.chunks / ((stats.test_word_matches + stats.reference_word_matches) / 2.0)
    }
}

fn final_score(f_mean: f64, frag_penalty: f64) -> f64 {
    let score = f_mean * (1.0 - frag_penalty);
    if score.is_nan() {
        0.0
    } else {
        score.max(0.0)
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    (2.0 * precision * recall) / (precision + recall)
}

/// Harmonic mean weighted toward recall by `alpha`
fn f_mean(precision: f64, recall: f64, alpha: f64) -> f64 {
    1.0 / ((1.0 - alpha) / precision + alpha / recall)
}

/// Sum of per-stage values times stage weights; missing stages count as zero
fn weighted_sum(stage_values: &[f64], weights: &[f64]) -> f64 {
    stage_values.iter().zip(weights).map(|(v, w)| v * w).sum()
}

fn dot(a: &[f64; CATEGORY_COUNT], b: &[f64; CATEGORY_COUNT]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Any non-zero entry at a stage without a weight is a configuration error;
/// zero padding past the weight vector is fine.
fn check_stage_weights(stats: &SentenceStats, weights: &[f64]) -> Result<(), ScoringError> {
    let legacy = &stats.legacy;
    let arrays = [
        &legacy.test_stage_content,
        &legacy.reference_stage_content,
        &legacy.test_stage_function,
        &legacy.reference_stage_function,
    ]
    .into_iter()
    .chain(stats.category.test_stage_matches.iter())
    .chain(stats.category.reference_stage_matches.iter());

    for values in arrays {
        if let Some(offset) = values.iter().skip(weights.len()).position(|&v| v != 0.0) {
            return Err(ScoringError::StageWeightMismatch {
                stage: weights.len() + offset,
                weights: weights.len(),
            });
        }
    }
    Ok(())
}
