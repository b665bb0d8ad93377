//! Aggregate command - one corpus statistics line from many segment lines.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{OutputFormat, ParamArgs};
use crate::parsing::stats::parse_stats_file;
use crate::scoring::{aggregate_par, compute_metrics};

#[derive(Args)]
pub struct AggregateArgs {
    /// Statistics file, one segment per line ('-' for stdin, .gz accepted)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Parameters used only for the score shown in verbose and JSON output
    #[command(flatten)]
    pub params: ParamArgs,
}

/// Execute the aggregate command
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AggregateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let segments = parse_stats_file(&args.input)?;
    let corpus = aggregate_par(&segments);

    if verbose || matches!(format, OutputFormat::Json) {
        let params = args.params.resolve()?;
        let mut scored = corpus.clone();
        compute_metrics(&mut scored, &params)?;

        if verbose {
            eprintln!(
                "Aggregated {} segments, corpus score {:.6}",
                segments.len(),
                scored.score()
            );
        }
        if matches!(format, OutputFormat::Json) {
            let output = serde_json::json!({
                "segments": segments.len(),
                "stats": corpus.to_string(),
                "score": scored.score(),
                "category_score": scored.category_score(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }
    }

    println!("{corpus}");
    Ok(())
}
