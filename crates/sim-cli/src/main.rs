mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;

use cli::Args;

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = commands::run::run_simulation(&args) {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(e.exit_kind().code());
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
