mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let importers = cli::load_importers(cli.config.as_deref())?;
    match cli.command {
        Commands::Identify { paths } => cli::identify::run(&importers, &paths),
        Commands::Extract { paths, output } => cli::extract::run(&importers, &paths, output.as_ref()),
        Commands::Archive {
            paths,
            destination,
            dry_run,
        } => cli::archive::run(&importers, &paths, &destination, dry_run),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
