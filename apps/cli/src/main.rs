//! Interlinker CLI: internal link insertion for article collections.
//!
//! Builds a keyword index from a site's sitemap and links matching keywords
//! in a directory of plain-text articles.

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
