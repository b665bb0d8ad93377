//! Text codec for sentence statistics.
//!
//! A statistics line holds every aggregable field, whitespace-delimited:
//!
//! ```text
//! testLength referenceLength testFunctionWords referenceFunctionWords
//! MAX_MODULES x (testContent referenceContent testFunction referenceFunction)
//! chunks testWordMatches referenceWordMatches
//! testAdjAdv refAdjAdv testNoun refNoun testOther refOther testVerb refVerb
//! MAX_MODULES x (testAdjAdv refAdjAdv testNoun refNoun testOther refOther testVerb refVerb)
//! ```
//!
//! Match totals are not stored; decoding re-sums them from the stage fields.
//! Lines holding only the first (legacy) section are also accepted.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::stats::SentenceStats;
use crate::core::types::{Category, CATEGORY_COUNT, MAX_MODULES};
use crate::parsing::read_input;
use crate::utils::validation::{check_segment_limit, is_valid_stat};

/// Fields in the content/function section of a line
pub const LEGACY_FIELDS: usize = 4 + 4 * MAX_MODULES + 3;

/// Fields in the category section of a line
pub const CATEGORY_FIELDS: usize = 2 * CATEGORY_COUNT + 2 * CATEGORY_COUNT * MAX_MODULES;

/// Fields in a full statistics line
pub const STATS_FIELDS: usize = LEGACY_FIELDS + CATEGORY_FIELDS;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Expected 63 (or 23 legacy) fields, found {0}")]
    FieldCount(usize),

    #[error("Field {index} is not a finite non-negative number: '{value}'")]
    InvalidNumber { index: usize, value: String },

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Too many segments: {0} exceeds maximum allowed (1000000)")]
    TooManySegments(usize),

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// Encode the aggregable fields of `stats` as one line.
///
/// Stage arrays are zero-padded to `MAX_MODULES`; entries beyond it are
/// dropped with a warning. Numbers use the shortest representation that
/// parses back to the same value.
#[must_use]
pub fn encode_stats(stats: &SentenceStats) -> String {
    if stats.stage_count() > MAX_MODULES {
        warn!(
            stages = stats.stage_count(),
            max = MAX_MODULES,
            "Truncating statistics to the supported number of stages"
        );
    }

    let legacy = &stats.legacy;
    let category = &stats.category;
    let mut fields: Vec<f64> = Vec::with_capacity(STATS_FIELDS);

    fields.extend([
        stats.test_length,
        stats.reference_length,
        legacy.test_function_words,
        legacy.reference_function_words,
    ]);
    for stage in 0..MAX_MODULES {
        fields.extend([
            at(&legacy.test_stage_content, stage),
            at(&legacy.reference_stage_content, stage),
            at(&legacy.test_stage_function, stage),
            at(&legacy.reference_stage_function, stage),
        ]);
    }
    fields.extend([
        stats.chunks,
        stats.test_word_matches,
        stats.reference_word_matches,
    ]);

    for c in Category::ALL {
        fields.push(category.test_counts[c.index()]);
        fields.push(category.reference_counts[c.index()]);
    }
    for stage in 0..MAX_MODULES {
        for c in Category::ALL {
            fields.push(at(&category.test_stage_matches[c.index()], stage));
            fields.push(at(&category.reference_stage_matches[c.index()], stage));
        }
    }

    fields
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode one statistics line.
///
/// Derived fields are zero; stage arrays are `MAX_MODULES` long. A legacy
/// line leaves the category sub-record at zero.
///
/// # Errors
///
/// Returns `ParseError::FieldCount` for a line of the wrong length, or
/// `ParseError::InvalidNumber` for a field that is not a finite,
/// non-negative number. No partial result is returned.
pub fn decode_stats(line: &str) -> Result<SentenceStats, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != STATS_FIELDS && tokens.len() != LEGACY_FIELDS {
        return Err(ParseError::FieldCount(tokens.len()));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let value = token
            .parse::<f64>()
            .ok()
            .filter(|v| is_valid_stat(*v))
            .ok_or_else(|| ParseError::InvalidNumber {
                index,
                value: (*token).to_string(),
            })?;
        values.push(value);
    }

    let mut fields = values.into_iter();
    let mut next = || fields.next().unwrap_or(0.0);
    let mut stats = SentenceStats::new();
    stats.pad_stages(MAX_MODULES);

    stats.test_length = next();
    stats.reference_length = next();
    stats.legacy.test_function_words = next();
    stats.legacy.reference_function_words = next();
    for stage in 0..MAX_MODULES {
        stats.legacy.test_stage_content[stage] = next();
        stats.legacy.reference_stage_content[stage] = next();
        stats.legacy.test_stage_function[stage] = next();
        stats.legacy.reference_stage_function[stage] = next();
    }
    stats.chunks = next();
    stats.test_word_matches = next();
    stats.reference_word_matches = next();

    // A legacy line ends here; `next` yields zeros for the rest
    for c in Category::ALL {
        stats.category.test_counts[c.index()] = next();
        stats.category.reference_counts[c.index()] = next();
    }
    for stage in 0..MAX_MODULES {
        for c in Category::ALL {
            stats.category.test_stage_matches[c.index()][stage] = next();
            stats.category.reference_stage_matches[c.index()][stage] = next();
        }
    }

    stats.legacy.recompute_totals();
    stats.category.recompute_totals();
    Ok(stats)
}

fn at(values: &[f64], stage: usize) -> f64 {
    values.get(stage).copied().unwrap_or(0.0)
}

impl fmt::Display for SentenceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_stats(self))
    }
}

impl FromStr for SentenceStats {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_stats(s)
    }
}

/// Parse a statistics file, one segment per line
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is malformed.
pub fn parse_stats_file(path: &Path) -> Result<Vec<SentenceStats>, ParseError> {
    let text = read_input(path)?;
    parse_stats_text(&text)
}

/// Parse statistics lines; blank lines are skipped.
///
/// # Errors
///
/// Returns the first malformed line wrapped with its 1-based line number, or
/// `ParseError::TooManySegments` if the input exceeds the segment limit.
pub fn parse_stats_text(text: &str) -> Result<Vec<SentenceStats>, ParseError> {
    let mut segments = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if check_segment_limit(segments.len()).is_some() {
            return Err(ParseError::TooManySegments(segments.len() + 1));
        }
        segments.push(decode_stats(line).map_err(|e| e.at_line(i + 1))?);
    }

    debug!(segments = segments.len(), "parsed statistics lines");
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SentenceStats {
        let mut stats = SentenceStats::new();
        stats.test_length = 7.0;
        stats.reference_length = 6.0;
        stats.legacy.test_function_words = 2.0;
        stats.legacy.reference_function_words = 1.0;
        stats.legacy.test_stage_content = vec![3.0, 1.0];
        stats.legacy.reference_stage_content = vec![3.0, 1.0];
        stats.legacy.test_stage_function = vec![1.0, 0.0];
        stats.legacy.reference_stage_function = vec![1.0, 0.0];
        stats.chunks = 2.0;
        stats.test_word_matches = 5.0;
        stats.reference_word_matches = 5.0;
        stats.category.test_counts = [1.0, 3.0, 2.0, 1.0];
        stats.category.reference_counts = [0.0, 3.0, 2.0, 1.0];
        stats.category.test_stage_matches[Category::Noun.index()] = vec![2.0, 1.0];
        stats.category.reference_stage_matches[Category::Verb.index()] = vec![0.5];
        stats.legacy.recompute_totals();
        stats.category.recompute_totals();
        stats
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(LEGACY_FIELDS, 23);
        assert_eq!(STATS_FIELDS, 63);
        assert_eq!(encode_stats(&sample()).split(' ').count(), STATS_FIELDS);
    }

    #[test]
    fn test_field_order() {
        let line = encode_stats(&sample());
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(&fields[..8], &["7", "6", "2", "1", "3", "3", "1", "1"]);
        // chunks and word matches close the legacy section
        assert_eq!(&fields[20..23], &["2", "5", "5"]);
        // test/reference noun counts
        assert_eq!(&fields[25..27], &["3", "3"]);
        // stage 0 test noun
        assert_eq!(fields[31 + 2], "2");
        // stage 0 reference verb
        assert_eq!(fields[31 + 7], "0.5");
    }

    #[test]
    fn test_round_trip_is_exact() {
        let mut original = sample();
        original.test_length = 0.1 + 0.2;
        let decoded = decode_stats(&encode_stats(&original)).unwrap();

        original.pad_stages(MAX_MODULES);
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_resums_totals() {
        let decoded = decode_stats(&encode_stats(&sample())).unwrap();
        assert!((decoded.legacy.test_total_matches - 5.0).abs() < f64::EPSILON);
        assert!((decoded.category.test_total_matches - 3.0).abs() < f64::EPSILON);
        assert!((decoded.category.reference_total_matches - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_and_from_str() {
        let line = sample().to_string();
        let parsed: SentenceStats = line.parse().unwrap();
        assert_eq!(parsed.to_string(), line);
    }

    #[test]
    fn test_truncates_extra_stages() {
        let mut stats = sample();
        stats.legacy.test_stage_content = vec![1.0, 1.0, 1.0, 1.0, 9.0];
        let decoded = decode_stats(&encode_stats(&stats)).unwrap();
        assert_eq!(decoded.legacy.test_stage_content, vec![1.0; 4]);

        // The fifth stage is lost, so the line no longer describes the input
        let mut padded = stats.clone();
        padded.pad_stages(stats.stage_count());
        padded.clear_derived();
        assert_eq!(decoded.stage_count(), MAX_MODULES);
        assert_ne!(decoded, padded);
    }

    #[test]
    fn test_decode_legacy_line() {
        let line = encode_stats(&sample());
        let legacy_line: Vec<&str> = line.split(' ').take(LEGACY_FIELDS).collect();
        let decoded = decode_stats(&legacy_line.join(" ")).unwrap();

        assert!((decoded.chunks - 2.0).abs() < f64::EPSILON);
        assert_eq!(decoded.category.test_counts, [0.0; 4]);
        assert_eq!(decoded.category.test_stage_matches[0], vec![0.0; MAX_MODULES]);
    }

    #[test]
    fn test_decode_rejects_short_line() {
        assert!(matches!(decode_stats("1 2 3"), Err(ParseError::FieldCount(3))));
        assert!(matches!(decode_stats(""), Err(ParseError::FieldCount(0))));
    }

    #[test]
    fn test_decode_rejects_bad_numbers() {
        let line = encode_stats(&sample());
        let mut fields: Vec<String> = line.split(' ').map(String::from).collect();

        fields[3] = "abc".to_string();
        assert!(matches!(
            decode_stats(&fields.join(" ")),
            Err(ParseError::InvalidNumber { index: 3, .. })
        ));

        fields[3] = "-1".to_string();
        assert!(decode_stats(&fields.join(" ")).is_err());

        fields[3] = "NaN".to_string();
        assert!(decode_stats(&fields.join(" ")).is_err());
    }

    #[test]
    fn test_parse_text_reports_line() {
        let good = encode_stats(&sample());
        let text = format!("{good}\n\n{good}\n1 2\n");
        let err = parse_stats_text(&text).unwrap_err();
        assert!(matches!(err, ParseError::AtLine { line: 4, .. }));
        assert!(err.to_string().starts_with("Line 4:"));
    }

    #[test]
    fn test_parse_text_skips_blank_lines() {
        let good = encode_stats(&sample());
        let text = format!("\n{good}\n   \n{good}\n");
        assert_eq!(parse_stats_text(&text).unwrap().len(), 2);
    }
}
