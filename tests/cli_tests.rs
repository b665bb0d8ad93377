//! Command-line tests: run the binary on small statistics and snapshot files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

use meteor_scorer::parsing::snapshot::snapshot_to_line;
use meteor_scorer::parsing::stats::{decode_stats, encode_stats, STATS_FIELDS};
use meteor_scorer::{AlignmentSnapshot, MatchEvidence, SentenceStats};

fn meteor() -> Command {
    Command::cargo_bin("meteor-scorer").unwrap()
}

fn perfect_snapshot() -> AlignmentSnapshot {
    let mut snapshot = AlignmentSnapshot::from_tokens(["the", "cat", "sat"], ["the", "cat", "sat"]);
    snapshot.record_match(MatchEvidence::new(0, 3, 0, 3, 0), 1.0).unwrap();
    snapshot.recount_chunks();
    snapshot
}

fn partial_snapshot() -> AlignmentSnapshot {
    let mut snapshot = AlignmentSnapshot::from_tokens(["a", "b", "c", "d"], ["d", "b", "x"]);
    snapshot.record_match(MatchEvidence::new(0, 1, 3, 1, 0), 1.0).unwrap();
    snapshot.record_match(MatchEvidence::new(1, 1, 1, 1, 1), 0.5).unwrap();
    snapshot.recount_chunks();
    snapshot
}

fn stats_line(snapshot: &AlignmentSnapshot) -> String {
    let stats = meteor_scorer::scoring::derive_stats(snapshot, meteor_scorer::LengthMode::Tokens).unwrap();
    encode_stats(&stats)
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_score_perfect_segment() {
    let file = write_temp(&format!("{}\n", stats_line(&perfect_snapshot())));

    meteor()
        .arg("score")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Segment 1 score: 1.000000"))
        .stdout(predicate::str::contains("Final score:\t\t1.000000"));
}

#[test]
fn test_score_json() {
    let content = format!(
        "{}\n{}\n",
        stats_line(&perfect_snapshot()),
        stats_line(&partial_snapshot())
    );
    let file = write_temp(&content);

    let output = meteor()
        .args(["score", "--format", "json"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["segments"].as_array().unwrap().len(), 2);
    let corpus = json["corpus"]["score"].as_f64().unwrap();
    assert!(corpus > 0.0 && corpus < 1.0);
    // Perfect segment adds no chunks, the partial one adds two
    assert!((json["corpus"]["chunks"].as_f64().unwrap() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_score_tsv_corpus_only() {
    let file = write_temp(&format!("{}\n", stats_line(&partial_snapshot())));

    meteor()
        .args(["score", "--corpus-only", "--format", "tsv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("segment\tscore"))
        .stdout(predicate::str::contains("corpus\t"))
        .stdout(predicate::str::contains("\n1\t").not());
}

#[test]
fn test_score_flag_overrides() {
    let file = write_temp(&format!("{}\n", stats_line(&partial_snapshot())));

    // A zero gamma turns the fragmentation penalty off
    let output = meteor()
        .args(["score", "--format", "json", "--gamma", "0"])
        .arg(file.path())
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["corpus"]["frag_penalty"].as_f64().unwrap().abs() < f64::EPSILON);
}

#[test]
fn test_score_rejects_bad_params() {
    let file = write_temp(&format!("{}\n", stats_line(&perfect_snapshot())));

    meteor()
        .args(["score", "--alpha", "2.5"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha"));
}

#[test]
fn test_score_rejects_malformed_line() {
    let content = format!("{}\n1 2 3\n", stats_line(&perfect_snapshot()));
    let file = write_temp(&content);

    meteor()
        .arg("score")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2"));
}

#[test]
fn test_aggregate_from_stdin() {
    let input = format!(
        "{}\n{}\n",
        stats_line(&perfect_snapshot()),
        stats_line(&partial_snapshot())
    );

    let output = meteor().args(["aggregate", "-"]).write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    assert_eq!(line.split_whitespace().count(), STATS_FIELDS);
    let corpus: SentenceStats = decode_stats(line.trim()).unwrap();
    assert!((corpus.test_length - 7.0).abs() < f64::EPSILON);
    assert!((corpus.chunks - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_aggregate_gzipped_input() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segments.stats.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    writeln!(encoder, "{}", stats_line(&partial_snapshot())).unwrap();
    encoder.finish().unwrap();

    meteor()
        .arg("aggregate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("4 3 "));
}

#[test]
fn test_derive_snapshots() {
    let content = format!(
        "{}\n{}\n",
        snapshot_to_line(&perfect_snapshot()).unwrap(),
        snapshot_to_line(&partial_snapshot()).unwrap()
    );
    let file = write_temp(&content);

    let output = meteor().arg("derive").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], stats_line(&perfect_snapshot()));

    let partial = decode_stats(lines[1]).unwrap();
    assert!((partial.legacy.test_total_matches - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_derive_verbose_describes_alignment() {
    let file = write_temp(&format!("{}\n", snapshot_to_line(&partial_snapshot()).unwrap()));

    meteor()
        .args(["derive", "--verbose"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Alignment 1"))
        .stderr(predicate::str::contains("b == b"));
}

#[test]
fn test_derive_char_based() {
    let file = write_temp(&format!("{}\n", snapshot_to_line(&perfect_snapshot()).unwrap()));

    let output = meteor()
        .args(["derive", "--char-based"])
        .arg(file.path())
        .output()
        .unwrap();
    let stats = decode_stats(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    // the + cat + sat
    assert!((stats.test_length - 9.0).abs() < f64::EPSILON);
}

#[test]
fn test_derive_rejects_invalid_snapshot() {
    let file = write_temp("{\"test_words\": [\"a\"], \"matches\": [{\"reference_start\": 0, \"reference_length\": 1, \"test_start\": 0, \"test_length\": 1, \"stage\": 0}]}\n");

    meteor()
        .arg("derive")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 1"));
}

#[test]
fn test_missing_file() {
    meteor()
        .args(["score", "/nonexistent/segments.stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}
