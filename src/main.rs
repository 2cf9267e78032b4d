//! storecode entry point.
//!
//! Parses the command line and hands it to [`storecode::run`].

use clap::Parser;
use storecode::cli::Cli;
use storecode::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
