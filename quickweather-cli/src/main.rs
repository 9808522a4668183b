//! Binary crate for the `quickweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive lookup prompt
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod interactive;
mod logging;
mod view;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);
    cmd.run().await
}
