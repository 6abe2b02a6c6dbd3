//! crosslink - convert wikilink markup in rendered HTML into live links.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod dom;
mod index;
mod logger;
mod resolve;
mod rewrite;
mod scan;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};

use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(cli)?;

    match &cli.command {
        Commands::Rewrite { args } => cli::rewrite::run(args, &config),
        Commands::Check { args } => cli::check::run(args, &config),
    }
}
