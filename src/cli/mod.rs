//! Command-line interface.

pub mod args;
pub mod check;
pub mod common;
pub mod rewrite;

pub use args::{CheckArgs, Cli, Commands, CommonArgs, RewriteArgs};
