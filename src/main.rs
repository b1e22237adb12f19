//! Folio - content pipeline for a Markdown/MDX blog.

mod asset;
mod cli;
mod config;
mod content;
mod image;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { no_sync } => cli::build::build_all(&config, !no_sync),
        Commands::Render { query, slug } => cli::query::render(&config, query, slug),
        Commands::Index { query } => cli::query::index(&config, query),
        Commands::Tags { query } => cli::query::tags(&config, query),
        Commands::Serve { .. } => cli::serve::serve(&config),
    }
}
