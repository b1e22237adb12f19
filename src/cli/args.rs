//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content pipeline for a markdown blog
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build payloads, indexes and tag counts for every content type
    #[command(visible_alias = "b")]
    Build {
        /// Skip copying content images into the public directory
        #[arg(long)]
        no_sync: bool,
    },

    /// Render one item by slug and print it as JSON
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        query: QueryArgs,

        /// Slug of the item, e.g. `sub-post`
        slug: String,
    },

    /// Print the front-matter index of a content type as JSON
    #[command(visible_alias = "i")]
    Index {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print tag counts of a content type as JSON
    #[command(visible_alias = "t")]
    Tags {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Serve content images over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Shared arguments of the query commands.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Content type, e.g. `blog`
    #[arg(value_name = "TYPE")]
    pub content_type: String,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["folio", "render", "blog", "sub-post", "--pretty"]);
        match cli.command {
            Commands::Render { query, slug } => {
                assert_eq!(query.content_type, "blog");
                assert!(query.pretty);
                assert_eq!(slug, "sub-post");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from(["folio", "-c", "posts", "-o", "out", "build", "--no-sync", "-v"]);
        assert_eq!(cli.content, Some(PathBuf::from("posts")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Build { no_sync: true }));
        assert_eq!(cli.config, PathBuf::from("folio.toml"));
    }

    #[test]
    fn test_command_aliases() {
        assert!(matches!(
            Cli::parse_from(["folio", "t", "blog"]).command,
            Commands::Tags { .. }
        ));
        assert!(matches!(
            Cli::parse_from(["folio", "s", "-p", "8080"]).command,
            Commands::Serve { port: Some(8080), .. }
        ));
    }
}
