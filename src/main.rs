// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]

//! Cursor usage CLI
//!
//! Command-line interface and stdio tool server

use clap::Parser;
use cursor_usage::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output and the tool protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::from(cli.log_level).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
