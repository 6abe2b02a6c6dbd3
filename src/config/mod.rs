//! Configuration management for `crosslink.toml`.
//!
//! Every setting is optional: a missing config file falls back to
//! defaults, and CLI flags override whatever the file provides.
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[site]`    | Where the rendered pages live                    |
//! | `[index]`   | Page index source (file path, embedded element)  |
//! | `[rewrite]` | Content container element                        |

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{Cli, Commands, CommonArgs};
use crate::log;
use crate::utils::path::normalize_path;

/// Root configuration structure representing crosslink.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Page index settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Rewrite settings
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the rendered pages (relative to project root)
    pub root: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("public") }
    }
}

/// `[index]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Page index JSON file. When unset, each page's embedded payload
    /// is used instead.
    pub path: Option<PathBuf>,

    /// `id` of the element carrying the embedded payload
    pub element_id: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { path: None, element_id: "page-index".to_string() }
    }
}

/// `[rewrite]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Tag of the content container element
    pub container: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { container: "main".to_string() }
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from the current directory for the config file.
    /// A missing file is not an error: defaults apply and CLI flags
    /// still override them.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current working directory")?;
        let (config_path, exists) = match find_config_file(&cli.config) {
            Some(path) => (path, true),
            None => (cwd.join(&cli.config), false),
        };

        let mut config = if exists { Self::from_path(&config_path)? } else { Self::default() };

        config.root = config_path.parent().map_or(cwd, Path::to_path_buf);
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        Ok(config)
    }

    /// Load configuration from a file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Warn about unknown fields found in the config file.
    fn print_unknown_fields_warning(ignored: &[String], config_path: &Path) {
        let file_name = config_path
            .file_name()
            .map_or_else(|| config_path.display().to_string(), |n| n.to_string_lossy().to_string());

        log!("warning"; "unknown fields in {}:", file_name);
        for field in ignored {
            eprintln!("  - {field}");
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        self.apply_command_options(cli);

        // Resolve the site root against the project root
        self.site.root = normalize_path(&self.root.join(&self.site.root));

        // Expand and resolve the index path
        if let Some(path) = self.index.path.take() {
            let expanded = shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned();
            let path = PathBuf::from(expanded);
            self.index.path = Some(if path.is_relative() {
                normalize_path(&self.root.join(path))
            } else {
                path
            });
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Rewrite { args } => self.apply_common_args(&args.common),
            Commands::Check { args } => self.apply_common_args(&args.common),
        }
    }

    /// Apply shared CLI arguments. CLI flags override config values.
    fn apply_common_args(&mut self, args: &CommonArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.site.root, args.root.as_ref());
        if args.index.is_some() {
            self.index.path = args.index.clone();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// The site root directory (absolute after load).
    pub fn site_root(&self) -> &Path {
        &self.site.root
    }

    /// A path shown relative to the site root when possible.
    pub fn site_relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.site.root).map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

/// Search for the config file, walking up from the current directory.
///
/// An absolute path is checked directly.
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?.to_path_buf();
    }
}

// =============================================================================
// Tests
// =============================================================================
