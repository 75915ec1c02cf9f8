//! pagemill CLI — headless read access to a Notion-backed post catalog.
//!
//! Assembles nested document trees from the block store's flat block stream
//! and exposes the catalog's metadata queries as JSON on stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
