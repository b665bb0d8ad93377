use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::alignment::{AlignmentSnapshot, SnapshotError};
use crate::core::stats::SentenceStats;
use crate::core::types::Stage;
use crate::scoring::aggregate::aggregate;
use crate::scoring::derive::derive_stats;
use crate::scoring::metrics::compute_metrics;
use crate::scoring::params::{validate_module_weights, ConfigError, ScoringParams};
use crate::tagging::{CategoryMap, Tagger};

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Stage {stage} has matches but only {weights} module weights are configured")]
    StageWeightMismatch { stage: usize, weights: usize },

    #[error("Invalid alignment: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Aligner failed: {0}")]
    Aligner(String),

    #[error("No reference sentences given")]
    NoReferences,

    #[error("Invalid parameters: {0}")]
    Config(#[from] ConfigError),
}

/// Fills the match slots of a snapshot.
///
/// An aligner receives a snapshot built from tokens (and tags, when
/// available), places its matches, updates the stage totals and recounts
/// chunks. [`AlignmentSnapshot::record_match`] followed by
/// [`AlignmentSnapshot::recount_chunks`] does all of that bookkeeping.
///
/// `stage_weights` ranks competing alignments; it is not used for scoring.
pub trait Aligner: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the sentence pair cannot be aligned.
    fn align(&self, snapshot: &mut AlignmentSnapshot, stage_weights: &[f64]) -> Result<(), ScoringError>;
}

/// Scoring front end: aligns sentence pairs and turns them into scored statistics.
///
/// Cloning is cheap for the aligner, which is shared, and copies the weight
/// vectors, so clones can be reweighted independently.
#[derive(Clone)]
pub struct Scorer {
    params: ScoringParams,
    aligner_weights: Vec<f64>,
    aligner: Arc<dyn Aligner>,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("params", &self.params)
            .field("aligner_weights", &self.aligner_weights)
            .finish_non_exhaustive()
    }
}

impl Scorer {
    /// # Errors
    ///
    /// Returns `ScoringError::Config` if the parameters are out of range.
    pub fn new(params: ScoringParams, aligner: Arc<dyn Aligner>) -> Result<Self, ScoringError> {
        params.validate()?;
        let aligner_weights = (0..params.module_weights.len())
            .map(|i| Stage::from_index(i).map_or(0.5, Stage::aligner_weight))
            .collect();

        Ok(Self {
            params,
            aligner_weights,
            aligner,
        })
    }

    #[must_use]
    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Stage weights handed to the aligner
    #[must_use]
    pub fn aligner_weights(&self) -> &[f64] {
        &self.aligner_weights
    }

    /// Replace the stage weights the aligner ranks alignments with.
    ///
    /// Scoring weights in [`ScoringParams::module_weights`] are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Config` if the weights are invalid.
    pub fn update_module_weights(&mut self, weights: Vec<f64>) -> Result<(), ScoringError> {
        validate_module_weights(&weights)?;
        debug!(?weights, "updated aligner stage weights");
        self.aligner_weights = weights;
        Ok(())
    }

    /// Derive and score the statistics of an already-aligned snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is inconsistent or uses a stage
    /// without a module weight.
    pub fn sentence_stats(&self, snapshot: &AlignmentSnapshot) -> Result<SentenceStats, ScoringError> {
        let mut stats = derive_stats(snapshot, self.params.length_mode)?;
        compute_metrics(&mut stats, &self.params)?;
        Ok(stats)
    }

    /// Run the aligner over a fresh snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if alignment fails.
    pub fn align(&self, mut snapshot: AlignmentSnapshot) -> Result<AlignmentSnapshot, ScoringError> {
        self.aligner.align(&mut snapshot, &self.aligner_weights)?;
        Ok(snapshot)
    }

    /// Score pre-tokenized, pre-normalized sentences.
    ///
    /// No tagging happens, so the category-weighted score is 0.
    ///
    /// # Errors
    ///
    /// Returns an error if alignment or scoring fails.
    pub fn score_tokens(&self, test: &[String], reference: &[String]) -> Result<SentenceStats, ScoringError> {
        let snapshot = self.align(AlignmentSnapshot::from_tokens(
            test.iter().cloned(),
            reference.iter().cloned(),
        ))?;
        self.sentence_stats(&snapshot)
    }

    /// Tokenize, tag, align and score a raw sentence pair
    ///
    /// # Errors
    ///
    /// Returns an error if tagging, alignment or scoring fails.
    pub fn score_text(
        &self,
        test: &str,
        reference: &str,
        tagger: &dyn Tagger,
        categories: &CategoryMap,
    ) -> Result<SentenceStats, ScoringError> {
        let snapshot = self.align(AlignmentSnapshot::from_text(test, reference, tagger, categories)?)?;
        self.sentence_stats(&snapshot)
    }

    /// Score `test` against each reference and keep the best.
    ///
    /// The highest legacy score wins; on a tie the earlier reference is kept.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::NoReferences` for an empty reference list, or
    /// the first error raised while scoring a reference.
    pub fn best_of_references<S: AsRef<str>>(
        &self,
        test: &str,
        references: &[S],
        tagger: &dyn Tagger,
        categories: &CategoryMap,
    ) -> Result<SentenceStats, ScoringError> {
        let mut best: Option<SentenceStats> = None;
        for reference in references {
            let stats = self.score_text(test, reference.as_ref(), tagger, categories)?;
            match &best {
                Some(b) if stats.score() <= b.score() => {}
                _ => best = Some(stats),
            }
        }
        best.ok_or(ScoringError::NoReferences)
    }

    /// Aggregate already-aligned snapshots into scored corpus statistics
    ///
    /// # Errors
    ///
    /// Returns the first error raised while deriving a sentence, or while
    /// scoring the aggregate.
    pub fn corpus_stats<'a, I>(&self, snapshots: I) -> Result<SentenceStats, ScoringError>
    where
        I: IntoIterator<Item = &'a AlignmentSnapshot>,
    {
        let mut sentences = Vec::new();
        for snapshot in snapshots {
            sentences.push(derive_stats(snapshot, self.params.length_mode)?);
        }

        let mut corpus = aggregate(&sentences);
        compute_metrics(&mut corpus, &self.params)?;
        info!(
            sentences = sentences.len(),
            score = corpus.score(),
            "scored corpus"
        );
        Ok(corpus)
    }
}
