use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Category, Side, Stage, MAX_MODULES};
use crate::tagging::{split_tagged, CategoryMap, Tagger, TaggerError};
use crate::utils::validation::{count_to_f64, exceeds_token_limit};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Match at reference index {start} is outside a reference of {len} tokens")]
    SlotOutOfRange { start: usize, len: usize },

    #[error("Reference has {len} tokens but {slots} match slots")]
    SlotCountMismatch { slots: usize, len: usize },

    #[error("Slot {slot} holds a match starting at reference index {start}")]
    MisplacedMatch { slot: usize, start: usize },

    #[error("Match span {start}+{length} exceeds the {side} length of {len} tokens")]
    SpanOutOfRange {
        side: Side,
        start: usize,
        length: usize,
        len: usize,
    },

    #[error("Match at reference index {0} has an empty span")]
    EmptySpan(usize),

    #[error("Reference index {0} already holds a match")]
    SlotOccupied(usize),

    #[error("Matches overlap at {side} index {index}")]
    Overlap { side: Side, index: usize },

    #[error("{side} token {index} is not in exactly one grammatical category")]
    PartitionMismatch { side: Side, index: usize },

    #[error("{side} function word index {index} is outside a sentence of {len} tokens")]
    FunctionWordOutOfRange { side: Side, index: usize, len: usize },

    #[error("Stage totals disagree on the number of stages: {0}")]
    StageCountMismatch(String),

    #[error("Match at reference index {start} uses stage {stage} but {stages} stages are tracked")]
    StageOutOfRange {
        start: usize,
        stage: usize,
        stages: usize,
    },

    #[error("Tagger returned {tags} tags for {tokens} {side} tokens")]
    TagCountMismatch {
        side: Side,
        tokens: usize,
        tags: usize,
    },

    #[error("Tagger error: {0}")]
    Tagger(#[from] TaggerError),

    #[error("Too many tokens: {0} exceeds maximum allowed (10000)")]
    TooManyTokens(usize),
}

/// One aligned span between reference and test, produced by an aligner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchEvidence {
    pub reference_start: usize,
    pub reference_length: usize,
    pub test_start: usize,
    pub test_length: usize,
    /// Index of the alignment stage that found this match
    pub stage: usize,
    /// Stage-specific confidence in [0, 1]
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl MatchEvidence {
    #[must_use]
    pub fn new(
        reference_start: usize,
        reference_length: usize,
        test_start: usize,
        test_length: usize,
        stage: usize,
    ) -> Self {
        Self {
            reference_start,
            reference_length,
            test_start,
            test_length,
            stage,
            confidence: 1.0,
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn reference_span(&self) -> Range<usize> {
        self.reference_start..self.reference_start.saturating_add(self.reference_length)
    }

    #[must_use]
    pub fn test_span(&self) -> Range<usize> {
        self.test_start..self.test_start.saturating_add(self.test_length)
    }

    #[must_use]
    pub fn span(&self, side: Side) -> Range<usize> {
        match side {
            Side::Test => self.test_span(),
            Side::Reference => self.reference_span(),
        }
    }
}

/// Token indices of one sentence, split by grammatical category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPartition {
    pub adj_adv: BTreeSet<usize>,
    pub noun: BTreeSet<usize>,
    pub other: BTreeSet<usize>,
    pub verb: BTreeSet<usize>,
}

impl CategoryPartition {
    /// Build a partition from one category per token
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut partition = Self::default();
        for (index, category) in categories.into_iter().enumerate() {
            partition.insert(category, index);
        }
        partition
    }

    #[must_use]
    pub fn get(&self, category: Category) -> &BTreeSet<usize> {
        match category {
            Category::AdjAdv => &self.adj_adv,
            Category::Noun => &self.noun,
            Category::Other => &self.other,
            Category::Verb => &self.verb,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut BTreeSet<usize> {
        match category {
            Category::AdjAdv => &mut self.adj_adv,
            Category::Noun => &mut self.noun,
            Category::Other => &mut self.other,
            Category::Verb => &mut self.verb,
        }
    }

    pub fn insert(&mut self, category: Category, index: usize) {
        self.get_mut(category).insert(index);
    }

    #[must_use]
    pub fn category_of(&self, index: usize) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&c| self.get(c).contains(&index))
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.get(category).len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|&c| self.count(c)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every index in `0..len` must appear in exactly one category, and no other index may appear
    fn check(&self, side: Side, len: usize) -> Result<(), SnapshotError> {
        let mut seen = vec![0usize; len];
        for category in Category::ALL {
            for &index in self.get(category) {
                match seen.get_mut(index) {
                    Some(n) => *n += 1,
                    None => return Err(SnapshotError::PartitionMismatch { side, index }),
                }
            }
        }
        match seen.iter().position(|&n| n != 1) {
            Some(index) => Err(SnapshotError::PartitionMismatch { side, index }),
            None => Ok(()),
        }
    }
}

/// Per-stage matched token counts for both sides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCounts {
    pub test: Vec<usize>,
    pub reference: Vec<usize>,
}

impl StageCounts {
    #[must_use]
    pub fn side(&self, side: Side) -> &[usize] {
        match side {
            Side::Test => &self.test,
            Side::Reference => &self.reference,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<usize> {
        match side {
            Side::Test => &mut self.test,
            Side::Reference => &mut self.reference,
        }
    }

    fn ensure_stages(&mut self, stages: usize) {
        for counts in [&mut self.test, &mut self.reference] {
            if counts.len() < stages {
                counts.resize(stages, 0);
            }
        }
    }

    #[must_use]
    pub fn total(&self, side: Side) -> usize {
        self.side(side).iter().sum()
    }
}

/// Running per-stage totals kept by the aligner.
///
/// The content/function split and the category split are independent views
/// of the same matched tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTotals {
    pub content: StageCounts,
    pub function: StageCounts,
    pub adj_adv: StageCounts,
    pub noun: StageCounts,
    pub other: StageCounts,
    pub verb: StageCounts,
}

impl StageTotals {
    #[must_use]
    pub fn category(&self, category: Category) -> &StageCounts {
        match category {
            Category::AdjAdv => &self.adj_adv,
            Category::Noun => &self.noun,
            Category::Other => &self.other,
            Category::Verb => &self.verb,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut StageCounts {
        match category {
            Category::AdjAdv => &mut self.adj_adv,
            Category::Noun => &mut self.noun,
            Category::Other => &mut self.other,
            Category::Verb => &mut self.verb,
        }
    }

    /// Number of stages tracked by the content/function view
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.content.test.len()
    }

    /// Grow every array to at least `stages` entries
    pub fn ensure_stages(&mut self, stages: usize) {
        self.content.ensure_stages(stages);
        self.function.ensure_stages(stages);
        for category in Category::ALL {
            self.category_mut(category).ensure_stages(stages);
        }
    }

    /// Matched tokens (content plus function) at `stage` on one side
    #[must_use]
    pub fn word_matches(&self, side: Side, stage: usize) -> usize {
        let content = self.content.side(side).get(stage).copied().unwrap_or(0);
        let function = self.function.side(side).get(stage).copied().unwrap_or(0);
        content + function
    }

    fn check(&self) -> Result<(), SnapshotError> {
        let stages = self.stage_count();
        let legacy = [
            ("content.reference", &self.content.reference),
            ("function.test", &self.function.test),
            ("function.reference", &self.function.reference),
        ];
        for (name, counts) in legacy {
            if counts.len() != stages {
                return Err(SnapshotError::StageCountMismatch(format!(
                    "content.test has {stages}, {name} has {}",
                    counts.len()
                )));
            }
        }

        // Category totals are either absent (untagged input) or track every stage
        let category_lens: Vec<usize> = Category::ALL
            .iter()
            .flat_map(|&c| {
                let counts = self.category(c);
                [counts.test.len(), counts.reference.len()]
            })
            .collect();
        let all_empty = category_lens.iter().all(|&n| n == 0);
        if !all_empty && category_lens.iter().any(|&n| n != stages) {
            return Err(SnapshotError::StageCountMismatch(format!(
                "content.test has {stages}, category totals have {category_lens:?}"
            )));
        }
        Ok(())
    }
}

/// Everything known about one aligned test/reference pair.
///
/// Built empty by [`AlignmentSnapshot::from_text`] or
/// [`AlignmentSnapshot::from_tokens`], then filled by an aligner through
/// [`AlignmentSnapshot::record_match`] (or directly, when the aligner keeps
/// its own totals). The metric engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord", into = "SnapshotRecord")]
pub struct AlignmentSnapshot {
    pub test_words: Vec<String>,
    pub reference_words: Vec<String>,

    pub test_function_words: BTreeSet<usize>,
    pub reference_function_words: BTreeSet<usize>,

    pub test_categories: CategoryPartition,
    pub reference_categories: CategoryPartition,

    /// `matches[i]` holds the match starting at reference index `i`
    matches: Vec<Option<MatchEvidence>>,

    pub stage_totals: StageTotals,

    /// Aligner totals, possibly weighted by stage
    pub test_matches: f64,
    pub reference_matches: f64,

    /// Number of maximal runs of matches contiguous on both sides
    pub chunks: usize,
    pub average_chunk_length: f64,
}

impl AlignmentSnapshot {
    /// Snapshot for pre-tokenized, pre-normalized sentences.
    ///
    /// No tagging happens, so both category partitions start empty; the
    /// caller is responsible for the tokens being in their final form.
    pub fn from_tokens(
        test: impl IntoIterator<Item = impl Into<String>>,
        reference: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let test_words: Vec<String> = test.into_iter().map(Into::into).collect();
        let reference_words: Vec<String> = reference.into_iter().map(Into::into).collect();
        let matches = vec![None; reference_words.len()];

        Self {
            test_words,
            reference_words,
            matches,
            ..Self::default()
        }
    }

    /// Snapshot for raw sentences: split on whitespace and tag both sides.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Tagger` if tagging fails,
    /// `SnapshotError::TagCountMismatch` if the tagger returns the wrong number
    /// of tags, or `SnapshotError::TooManyTokens` if a side is too long.
    pub fn from_text(
        test: &str,
        reference: &str,
        tagger: &dyn Tagger,
        categories: &CategoryMap,
    ) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::from_tokens(tokenize(test), tokenize(reference));
        snapshot.check_token_limits()?;

        snapshot.test_categories =
            tag_side(Side::Test, &snapshot.test_words, tagger, categories)?;
        snapshot.reference_categories =
            tag_side(Side::Reference, &snapshot.reference_words, tagger, categories)?;

        Ok(snapshot)
    }

    /// Snapshot for sentences already tagged as `word_TAG word_TAG ...`
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Tagger` if a token carries no tag.
    pub fn from_tagged_text(
        test: &str,
        reference: &str,
        categories: &CategoryMap,
    ) -> Result<Self, SnapshotError> {
        let (test_words, test_tags) = split_tagged(test)?;
        let (reference_words, reference_tags) = split_tagged(reference)?;

        let mut snapshot = Self::from_tokens(test_words, reference_words);
        snapshot.check_token_limits()?;
        snapshot.test_categories =
            CategoryPartition::from_categories(test_tags.iter().map(|t| categories.category(t)));
        snapshot.reference_categories = CategoryPartition::from_categories(
            reference_tags.iter().map(|t| categories.category(t)),
        );
        Ok(snapshot)
    }

    #[must_use]
    pub fn words(&self, side: Side) -> &[String] {
        match side {
            Side::Test => &self.test_words,
            Side::Reference => &self.reference_words,
        }
    }

    #[must_use]
    pub fn function_words(&self, side: Side) -> &BTreeSet<usize> {
        match side {
            Side::Test => &self.test_function_words,
            Side::Reference => &self.reference_function_words,
        }
    }

    #[must_use]
    pub fn categories(&self, side: Side) -> &CategoryPartition {
        match side {
            Side::Test => &self.test_categories,
            Side::Reference => &self.reference_categories,
        }
    }

    /// Match slots, one per reference token
    #[must_use]
    pub fn matches(&self) -> &[Option<MatchEvidence>] {
        &self.matches
    }

    #[must_use]
    pub fn match_at(&self, reference_index: usize) -> Option<&MatchEvidence> {
        self.matches.get(reference_index).and_then(Option::as_ref)
    }

    /// Placed matches in reference order
    pub fn iter_matches(&self) -> impl Iterator<Item = &MatchEvidence> {
        self.matches.iter().flatten()
    }

    /// Mark every token found in `words` as a function word, on both sides
    #[allow(clippy::implicit_hasher)]
    pub fn mark_function_words(&mut self, words: &HashSet<String>) {
        for (i, word) in self.test_words.iter().enumerate() {
            if words.contains(word) {
                self.test_function_words.insert(i);
            }
        }
        for (i, word) in self.reference_words.iter().enumerate() {
            if words.contains(word) {
                self.reference_function_words.insert(i);
            }
        }
    }

    /// Put a match in its slot without touching any totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the spans are empty or out of range, the slot is
    /// taken, or the match overlaps an existing one on either side.
    pub fn place_match(&mut self, evidence: MatchEvidence) -> Result<(), SnapshotError> {
        let start = evidence.reference_start;
        if start >= self.matches.len() {
            return Err(SnapshotError::SlotOutOfRange {
                start,
                len: self.matches.len(),
            });
        }
        self.check_spans(&evidence)?;
        if self.matches[start].is_some() {
            return Err(SnapshotError::SlotOccupied(start));
        }
        for existing in self.iter_matches() {
            check_disjoint(existing, &evidence)?;
        }
        self.matches[start] = Some(evidence);
        Ok(())
    }

    /// Place a match and add its tokens to the running totals.
    ///
    /// Every covered token counts once toward the content or function total
    /// of the match's stage and, when the side is tagged, once toward its
    /// category total. `weight` scales the contribution to the aligner
    /// totals `test_matches` / `reference_matches` only.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::StageOutOfRange` if the stage is not one of
    /// the supported stages, otherwise the same errors as
    /// [`AlignmentSnapshot::place_match`].
    pub fn record_match(&mut self, evidence: MatchEvidence, weight: f64) -> Result<(), SnapshotError> {
        if evidence.stage >= MAX_MODULES {
            return Err(SnapshotError::StageOutOfRange {
                start: evidence.reference_start,
                stage: evidence.stage,
                stages: MAX_MODULES,
            });
        }
        self.place_match(evidence)?;
        self.stage_totals.ensure_stages(evidence.stage + 1);

        for side in [Side::Test, Side::Reference] {
            let function_words = match side {
                Side::Test => &self.test_function_words,
                Side::Reference => &self.reference_function_words,
            };
            let categories = match side {
                Side::Test => &self.test_categories,
                Side::Reference => &self.reference_categories,
            };
            let totals = &mut self.stage_totals;
            for index in evidence.span(side) {
                let bucket = if function_words.contains(&index) {
                    &mut totals.function
                } else {
                    &mut totals.content
                };
                bucket.side_mut(side)[evidence.stage] += 1;
                if let Some(category) = categories.category_of(index) {
                    totals.category_mut(category).side_mut(side)[evidence.stage] += 1;
                }
            }
        }

        self.test_matches += weight * count_to_f64(evidence.test_length);
        self.reference_matches += weight * count_to_f64(evidence.reference_length);
        Ok(())
    }

    /// Drop every match and reset totals and chunk counts
    pub fn clear_matches(&mut self) {
        self.matches = vec![None; self.reference_words.len()];
        self.stage_totals = StageTotals::default();
        self.test_matches = 0.0;
        self.reference_matches = 0.0;
        self.chunks = 0;
        self.average_chunk_length = 0.0;
    }

    /// Recompute `chunks` and `average_chunk_length` from the placed matches.
    ///
    /// A chunk continues while each next match (in reference order) starts
    /// right where the previous one ended on both sides.
    pub fn recount_chunks(&mut self) {
        let mut chunks = 0usize;
        let mut matched = 0usize;
        let mut previous: Option<&MatchEvidence> = None;

        for evidence in self.matches.iter().flatten() {
            let continues = previous.is_some_and(|p| {
                p.reference_span().end == evidence.reference_start
                    && p.test_span().end == evidence.test_start
            });
            if !continues {
                chunks += 1;
            }
            matched += evidence.reference_length + evidence.test_length;
            previous = Some(evidence);
        }

        self.chunks = chunks;
        self.average_chunk_length = if chunks == 0 {
            0.0
        } else {
            count_to_f64(matched) / 2.0 / count_to_f64(chunks)
        };
    }

    /// Check every structural invariant of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.check_token_limits()?;

        if self.matches.len() != self.reference_words.len() {
            return Err(SnapshotError::SlotCountMismatch {
                slots: self.matches.len(),
                len: self.reference_words.len(),
            });
        }

        for side in [Side::Test, Side::Reference] {
            let len = self.words(side).len();
            if let Some(&index) = self.function_words(side).iter().find(|&&i| i >= len) {
                return Err(SnapshotError::FunctionWordOutOfRange { side, index, len });
            }
            // Untagged snapshots carry no partition at all
            let categories = self.categories(side);
            if !categories.is_empty() {
                categories.check(side, len)?;
            }
        }

        self.stage_totals.check()?;
        let stages = self.stage_totals.stage_count();

        let placed: Vec<(usize, &MatchEvidence)> = self
            .matches
            .iter()
            .enumerate()
            .filter_map(|(slot, m)| m.as_ref().map(|m| (slot, m)))
            .collect();
        for (i, &(slot, evidence)) in placed.iter().enumerate() {
            if evidence.reference_start != slot {
                return Err(SnapshotError::MisplacedMatch {
                    slot,
                    start: evidence.reference_start,
                });
            }
            self.check_spans(evidence)?;
            if evidence.stage >= stages {
                return Err(SnapshotError::StageOutOfRange {
                    start: slot,
                    stage: evidence.stage,
                    stages,
                });
            }
            for &(_, other) in &placed[i + 1..] {
                check_disjoint(evidence, other)?;
            }
        }
        Ok(())
    }

    /// Human-readable table of the matched phrases
    #[must_use]
    pub fn describe(&self, header: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{header}");
        let _ = writeln!(out, "{}", self.test_words.join(" "));
        let _ = writeln!(out, "{}", self.reference_words.join(" "));
        let _ = writeln!(out, "Reference\tTest\tStage\tConfidence\tPhrase");
        for evidence in self.iter_matches() {
            let stage = Stage::from_index(evidence.stage)
                .map_or_else(|| evidence.stage.to_string(), |s| s.to_string());
            let reference_phrase = self
                .reference_words
                .get(evidence.reference_span())
                .map_or_else(String::new, |words| words.join(" "));
            let test_phrase = self
                .test_words
                .get(evidence.test_span())
                .map_or_else(String::new, |words| words.join(" "));
            let _ = writeln!(
                out,
                "{}:{}\t{}:{}\t{}\t{:.4}\t{} == {}",
                evidence.reference_start,
                evidence.reference_length,
                evidence.test_start,
                evidence.test_length,
                stage,
                evidence.confidence,
                reference_phrase,
                test_phrase,
            );
        }
        out
    }

    fn check_token_limits(&self) -> Result<(), SnapshotError> {
        for side in [Side::Test, Side::Reference] {
            let len = self.words(side).len();
            if exceeds_token_limit(len) {
                return Err(SnapshotError::TooManyTokens(len));
            }
        }
        Ok(())
    }

    fn check_spans(&self, evidence: &MatchEvidence) -> Result<(), SnapshotError> {
        if evidence.reference_length == 0 || evidence.test_length == 0 {
            return Err(SnapshotError::EmptySpan(evidence.reference_start));
        }
        for side in [Side::Test, Side::Reference] {
            let (start, length) = match side {
                Side::Test => (evidence.test_start, evidence.test_length),
                Side::Reference => (evidence.reference_start, evidence.reference_length),
            };
            let len = self.words(side).len();
            let fits = start.checked_add(length).is_some_and(|end| end <= len);
            if !fits {
                return Err(SnapshotError::SpanOutOfRange {
                    side,
                    start,
                    length,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// Split a line into whitespace-separated tokens
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

fn tag_side(
    side: Side,
    words: &[String],
    tagger: &dyn Tagger,
    categories: &CategoryMap,
) -> Result<CategoryPartition, SnapshotError> {
    let tags = tagger.tag(words)?;
    if tags.len() != words.len() {
        return Err(SnapshotError::TagCountMismatch {
            side,
            tokens: words.len(),
            tags: tags.len(),
        });
    }
    Ok(CategoryPartition::from_categories(
        tags.iter().map(|t| categories.category(t)),
    ))
}

fn check_disjoint(a: &MatchEvidence, b: &MatchEvidence) -> Result<(), SnapshotError> {
    for side in [Side::Reference, Side::Test] {
        let (x, y) = (a.span(side), b.span(side));
        let lo = x.start.max(y.start);
        if lo < x.end.min(y.end) {
            return Err(SnapshotError::Overlap { side, index: lo });
        }
    }
    Ok(())
}

/// Wire form of a snapshot: matches as a sparse list instead of slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SnapshotRecord {
    test_words: Vec<String>,
    reference_words: Vec<String>,
    test_function_words: BTreeSet<usize>,
    reference_function_words: BTreeSet<usize>,
    test_categories: CategoryPartition,
    reference_categories: CategoryPartition,
    matches: Vec<MatchEvidence>,
    stage_totals: StageTotals,
    test_matches: f64,
    reference_matches: f64,
    chunks: usize,
    average_chunk_length: f64,
}

impl From<AlignmentSnapshot> for SnapshotRecord {
    fn from(snapshot: AlignmentSnapshot) -> Self {
        Self {
            matches: snapshot.matches.iter().flatten().copied().collect(),
            test_words: snapshot.test_words,
            reference_words: snapshot.reference_words,
            test_function_words: snapshot.test_function_words,
            reference_function_words: snapshot.reference_function_words,
            test_categories: snapshot.test_categories,
            reference_categories: snapshot.reference_categories,
            stage_totals: snapshot.stage_totals,
            test_matches: snapshot.test_matches,
            reference_matches: snapshot.reference_matches,
            chunks: snapshot.chunks,
            average_chunk_length: snapshot.average_chunk_length,
        }
    }
}

impl TryFrom<SnapshotRecord> for AlignmentSnapshot {
    type Error = SnapshotError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let mut matches = vec![None; record.reference_words.len()];
        for evidence in record.matches {
            let start = evidence.reference_start;
            let slot = matches
                .get_mut(start)
                .ok_or(SnapshotError::SlotOutOfRange {
                    start,
                    len: record.reference_words.len(),
                })?;
            if slot.is_some() {
                return Err(SnapshotError::SlotOccupied(start));
            }
            *slot = Some(evidence);
        }

        let snapshot = Self {
            test_words: record.test_words,
            reference_words: record.reference_words,
            test_function_words: record.test_function_words,
            reference_function_words: record.reference_function_words,
            test_categories: record.test_categories,
            reference_categories: record.reference_categories,
            matches,
            stage_totals: record.stage_totals,
            test_matches: record.test_matches,
            reference_matches: record.reference_matches,
            chunks: record.chunks,
            average_chunk_length: record.average_chunk_length,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}
