//! CLI argument definitions using clap derive.

use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};

/// Convert wikilink markup in rendered HTML into live links
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(
        short = 'C',
        long,
        default_value = "crosslink.toml",
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert wikilink markup in rendered pages
    #[command(visible_alias = "r")]
    Rewrite {
        #[command(flatten)]
        args: RewriteArgs,
    },

    /// Report unresolved references without writing anything
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

/// Arguments shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Pages or directories to process. Defaults to every page under
    /// the site root. Use `-` to read paths from stdin
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Site root directory holding the rendered pages (relative to
    /// project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Page index JSON file. Defaults to the payload embedded in each
    /// page
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub index: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the rewrite command
#[derive(clap::Args, Debug, Clone)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Scan and resolve without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Arguments for the check command
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip checking that embedded images exist on disk
    #[arg(long)]
    pub no_assets: bool,

    /// Report problems without failing the run
    #[arg(short = 'w', long)]
    pub warn_only: bool,
}
