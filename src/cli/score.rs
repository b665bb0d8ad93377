//! Score command - per-segment and corpus scores from statistics lines.
//!
//! The corpus score is computed from the summed statistics, not by averaging
//! the segment scores.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{OutputFormat, ParamArgs};
use crate::core::stats::SentenceStats;
use crate::parsing::stats::parse_stats_file;
use crate::scoring::{aggregate_par, compute_metrics, ScoringParams};

#[derive(Args)]
pub struct ScoreArgs {
    /// Statistics file, one segment per line ('-' for stdin, .gz accepted)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Only print the corpus score
    #[arg(long)]
    pub corpus_only: bool,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or the statistics do not
/// fit the parameters.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let mut segments = parse_stats_file(&args.input)?;

    if verbose {
        eprintln!(
            "Scoring {} segments (alpha {}, beta {}, gamma {}, delta {}, module weights {:?})",
            segments.len(),
            params.alpha,
            params.beta,
            params.gamma,
            params.delta,
            params.module_weights,
        );
    }

    let mut corpus = aggregate_par(&segments);
    compute_metrics(&mut corpus, &params)?;
    for stats in &mut segments {
        compute_metrics(stats, &params)?;
    }

    let shown: &[SentenceStats] = if args.corpus_only { &[] } else { &segments };
    match format {
        OutputFormat::Text => print_text(shown, &corpus),
        OutputFormat::Json => print_json(shown, &corpus, &params)?,
        OutputFormat::Tsv => print_tsv(shown, &corpus),
    }

    Ok(())
}

fn print_text(segments: &[SentenceStats], corpus: &SentenceStats) {
    for (i, stats) in segments.iter().enumerate() {
        println!(
            "Segment {} score: {:.6}\tcategory score: {:.6}",
            i + 1,
            stats.score(),
            stats.category_score()
        );
    }
    if !segments.is_empty() {
        println!();
    }

    let legacy = &corpus.legacy;
    println!("Test words:\t\t{}", corpus.test_length);
    println!("Reference words:\t{}", corpus.reference_length);
    println!("Chunks:\t\t\t{}", corpus.chunks);
    println!("Precision:\t\t{:.6}", legacy.precision);
    println!("Recall:\t\t\t{:.6}", legacy.recall);
    println!("f1:\t\t\t{:.6}", legacy.f1);
    println!("fMean:\t\t\t{:.6}", legacy.f_mean);
    println!("Fragmentation penalty:\t{:.6}", corpus.frag_penalty);
    println!();
    println!("Final score:\t\t{:.6}", corpus.score());
    println!("Category score:\t\t{:.6}", corpus.category_score());
}

fn print_json(segments: &[SentenceStats], corpus: &SentenceStats, params: &ScoringParams) -> anyhow::Result<()> {
    let segment_json: Vec<_> = segments
        .iter()
        .enumerate()
        .map(|(i, stats)| {
            serde_json::json!({
                "segment": i + 1,
                "score": stats.score(),
                "category_score": stats.category_score(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "params": params,
        "segments": segment_json,
        "corpus": {
            "test_length": corpus.test_length,
            "reference_length": corpus.reference_length,
            "chunks": corpus.chunks,
            "precision": corpus.legacy.precision,
            "recall": corpus.legacy.recall,
            "f1": corpus.legacy.f1,
            "f_mean": corpus.legacy.f_mean,
            "frag_penalty": corpus.frag_penalty,
            "score": corpus.score(),
            "category": {
                "precision": corpus.category.precision,
                "recall": corpus.category.recall,
                "f_mean": corpus.category.f_mean,
                "score": corpus.category_score(),
            },
        },
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(segments: &[SentenceStats], corpus: &SentenceStats) {
    println!("segment\tscore\tcategory_score\tprecision\trecall\tf_mean\tfrag_penalty");

    let print_row = |label: &str, stats: &SentenceStats| {
        println!(
            "{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            label,
            stats.score(),
            stats.category_score(),
            stats.legacy.precision,
            stats.legacy.recall,
            stats.legacy.f_mean,
            stats.frag_penalty,
        );
    };

    for (i, stats) in segments.iter().enumerate() {
        print_row(&(i + 1).to_string(), stats);
    }
    print_row("corpus", corpus);
}
