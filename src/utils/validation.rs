//! Centralized validation and helper functions.

/// Maximum number of segments (lines) accepted from a single input (DOS protection)
pub const MAX_SEGMENTS: usize = 1_000_000;

/// Maximum number of tokens accepted on one side of a sentence pair
pub const MAX_TOKENS: usize = 10_000;

/// Convert a count to f64 for statistics.
///
/// Token and character counts are far below the 2^53 mantissa limit, so the
/// precision loss clippy warns about cannot occur in practice.
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Check if adding another segment would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new segment.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_segment_limit(segments.len()).is_some() {
///     return Err(...);
/// }
/// segments.push(stats); // Safe to add
/// ```
#[must_use]
pub fn check_segment_limit(count: usize) -> Option<String> {
    if count >= MAX_SEGMENTS {
        Some(format!(
            "Too many segments: adding another would exceed maximum of {MAX_SEGMENTS}"
        ))
    } else {
        None
    }
}

/// Check that a sentence side is within the token limit.
#[must_use]
pub fn exceeds_token_limit(count: usize) -> bool {
    count > MAX_TOKENS
}

/// A decoded statistic must be a finite, non-negative number.
///
/// # Examples
///
/// ```
/// use meteor_scorer::utils::validation::is_valid_stat;
///
/// assert!(is_valid_stat(15.0));
/// assert!(is_valid_stat(0.0));
/// assert!(!is_valid_stat(-1.0));
/// assert!(!is_valid_stat(f64::NAN));
/// assert!(!is_valid_stat(f64::INFINITY));
/// ```
#[must_use]
pub fn is_valid_stat(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// A weight must be a finite, non-negative number.
#[must_use]
pub fn is_valid_weight(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_limit() {
        assert!(check_segment_limit(0).is_none());
        assert!(check_segment_limit(MAX_SEGMENTS - 1).is_none());
        assert!(check_segment_limit(MAX_SEGMENTS).is_some());
    }

    #[test]
    fn test_token_limit() {
        assert!(!exceeds_token_limit(MAX_TOKENS));
        assert!(exceeds_token_limit(MAX_TOKENS + 1));
    }

    #[test]
    fn test_count_to_f64() {
        assert!((count_to_f64(42) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_is_valid_weight() {
        assert!(is_valid_weight(0.5));
        assert!(!is_valid_weight(-0.1));
        assert!(!is_valid_weight(f64::NAN));
    }
}
