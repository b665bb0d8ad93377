//! Derive command - alignment snapshots to statistics lines.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{OutputFormat, ParamArgs};
use crate::core::stats::SentenceStats;
use crate::parsing::snapshot::parse_snapshot_file;
use crate::scoring::{compute_metrics, derive_stats};

#[derive(Args)]
pub struct DeriveArgs {
    /// JSON-lines file of alignment snapshots ('-' for stdin, .gz accepted)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Count characters instead of tokens for lengths and matches
    #[arg(long)]
    pub char_based: bool,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Execute the derive command
///
/// # Errors
///
/// Returns an error if the input cannot be parsed or a snapshot cannot be
/// scored with the given parameters.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DeriveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = args.params.resolve_with_mode(args.char_based)?;
    let snapshots = parse_snapshot_file(&args.input)?;

    if verbose {
        eprintln!("Parsed {} alignment snapshots", snapshots.len());
    }

    let mut segments: Vec<SentenceStats> = Vec::with_capacity(snapshots.len());
    for (i, snapshot) in snapshots.iter().enumerate() {
        let mut stats = derive_stats(snapshot, params.length_mode)?;
        compute_metrics(&mut stats, &params)?;
        if verbose {
            eprint!("{}", snapshot.describe(&format!("Alignment {}", i + 1)));
            eprintln!("Score: {:.4}\n", stats.score());
        }
        segments.push(stats);
    }

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            for stats in &segments {
                println!("{stats}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
    }

    Ok(())
}
