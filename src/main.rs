mod aggregator;
mod categorizer;
mod cli;
mod coercer;
mod db;
mod error;
mod filter;
mod fmt;
mod models;
mod normalizer;
mod pipeline;
mod reader;
mod server;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output (JSON for `analyze --json`)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&settings::load_settings().log_level);

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Analyze { file, json } => cli::analyze::run(&file, json),
        Commands::Import { file } => cli::import::run(&file),
        Commands::History { limit } => cli::history::run(limit),
        Commands::Serve { addr } => cli::serve::run(addr),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
