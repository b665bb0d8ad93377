use clap::Parser;
use meteor_scorer::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("meteor_scorer=debug,info")
    } else {
        EnvFilter::new("meteor_scorer=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Derive(args) => {
            cli::derive::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Score(args) => {
            cli::score::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Aggregate(args) => {
            cli::aggregate::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
