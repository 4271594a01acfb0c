use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "voltas",
    version,
    about = "Terminal launcher for memory-forensics and live-response tools"
)]
pub struct Cli {
    /// Append logs to this file instead of the default location
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "voltas=debug"
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

pub async fn run(args: Cli) -> Result<()> {
    crate::logging::init_tracing(args.log_file.as_deref(), &args.log_level);
    crate::tui::run().await
}
