//! JSON-lines reader for alignment snapshots.
//!
//! Each non-blank line is one serialized [`AlignmentSnapshot`]. Deserializing
//! validates the snapshot, so a line that parses is structurally sound.

use std::path::Path;

use tracing::debug;

use crate::core::alignment::AlignmentSnapshot;
use crate::parsing::read_input;
use crate::parsing::stats::ParseError;
use crate::utils::validation::check_segment_limit;

/// Parse a snapshot file, one JSON object per line
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is invalid.
pub fn parse_snapshot_file(path: &Path) -> Result<Vec<AlignmentSnapshot>, ParseError> {
    let text = read_input(path)?;
    parse_snapshot_text(&text)
}

/// Parse JSON-lines snapshots; blank lines are skipped.
///
/// # Errors
///
/// Returns the first invalid line wrapped with its 1-based line number, or
/// `ParseError::TooManySegments` if the input exceeds the segment limit.
pub fn parse_snapshot_text(text: &str) -> Result<Vec<AlignmentSnapshot>, ParseError> {
    let mut snapshots = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if check_segment_limit(snapshots.len()).is_some() {
            return Err(ParseError::TooManySegments(snapshots.len() + 1));
        }
        let snapshot: AlignmentSnapshot =
            serde_json::from_str(line).map_err(|e| ParseError::AtLine {
                line: i + 1,
                source: Box::new(ParseError::Json(e)),
            })?;
        snapshots.push(snapshot);
    }

    debug!(snapshots = snapshots.len(), "parsed alignment snapshots");
    Ok(snapshots)
}

/// Serialize one snapshot as a single JSON line
///
/// # Errors
///
/// Returns `ParseError::Json` if serialization fails.
pub fn snapshot_to_line(snapshot: &AlignmentSnapshot) -> Result<String, ParseError> {
    Ok(serde_json::to_string(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::MatchEvidence;

    fn aligned() -> AlignmentSnapshot {
        let mut snapshot = AlignmentSnapshot::from_tokens(["a", "b", "c"], ["a", "c"]);
        snapshot.record_match(MatchEvidence::new(0, 1, 0, 1, 0), 1.0).unwrap();
        snapshot.record_match(MatchEvidence::new(1, 1, 2, 1, 1), 0.5).unwrap();
        snapshot.recount_chunks();
        snapshot
    }

    #[test]
    fn test_lines_round_trip() {
        let line = snapshot_to_line(&aligned()).unwrap();
        assert!(!line.contains('\n'));

        let text = format!("{line}\n\n{line}\n");
        let parsed = parse_snapshot_text(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], aligned());
    }

    #[test]
    fn test_invalid_json_reports_line() {
        let line = snapshot_to_line(&aligned()).unwrap();
        let text = format!("{line}\n{{not json\n");
        assert!(matches!(
            parse_snapshot_text(&text),
            Err(ParseError::AtLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_inconsistent_snapshot_rejected() {
        // The match slot points past the end of the reference
        let line = snapshot_to_line(&aligned())
            .unwrap()
            .replace(r#""reference_words":["a","c"]"#, r#""reference_words":["a"]"#);
        assert!(parse_snapshot_text(&line).is_err());
    }
}
