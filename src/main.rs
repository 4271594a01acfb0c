mod catalog;
mod cli;
mod engine;
mod logging;
mod model;
mod orchestrator;
mod resolver;
mod session;
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
