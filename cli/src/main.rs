mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{export, inspect, map, summary};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Inspect(args) => inspect::run(&cli, args),
        Commands::Export(args) => export::run(&cli, args),
        Commands::Summary(args) => summary::run(&cli, args),
        Commands::Map(args) => map::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
