//! The rewrite command: convert wikilink markup across rendered pages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

use crate::cli::RewriteArgs;
use crate::cli::common::{
    ParallelCollector, collect_pages, load_embedded_index, load_shared_index, page_url_path,
};
use crate::config::Config;
use crate::core::Section;
use crate::index::PageIndex;
use crate::rewrite::{PageError, RewriteStats, rewrite_page};
use crate::scan;
use crate::utils::plural_count;
use crate::{debug, log};

/// Entry point for `crosslink rewrite`
pub fn run(args: &RewriteArgs, config: &Config) -> Result<()> {
    let files = collect_pages(&args.common.paths, config.site_root())?;
    if files.is_empty() {
        log!("rewrite"; "no pages found under {}", config.site_root().display());
        return Ok(());
    }
    log!("rewrite"; "processing {}", plural_count(files.len(), "page"));

    let shared_index = load_shared_index(config);

    let results: ParallelCollector<RewriteStats> = ParallelCollector::new();
    let failures: ParallelCollector<(PathBuf, PageError)> = ParallelCollector::new();

    files.par_iter().for_each(|file| {
        match rewrite_file(file, shared_index.as_ref(), config, args.dry_run) {
            Ok(Some(stats)) => {
                debug!(
                    "rewrite";
                    "{}: {} replaced",
                    config.site_relative(file).display(),
                    stats.total()
                );
                results.push(stats);
            }
            Ok(None) => {}
            Err(error) => failures.push((file.clone(), error)),
        }
    });

    let failures = failures.drain();
    for (file, error) in &failures {
        log!("error"; "{}: {error}", config.site_relative(file).display());
    }

    let summaries = results.drain();
    let changed = summaries.len();
    let mut total = RewriteStats::default();
    for stats in summaries {
        total.links += stats.links;
        total.broken += stats.broken;
        total.images += stats.images;
    }

    log!(
        "rewrite";
        "converted {} and {} across {}",
        plural_count(total.links, "link"),
        plural_count(total.images, "image"),
        plural_count(changed, "page")
    );
    if total.broken > 0 {
        log!("rewrite"; "{} did not resolve", plural_count(total.broken, "target"));
    }
    if args.dry_run {
        log!("rewrite"; "dry run, nothing written");
    }

    if !failures.is_empty() {
        anyhow::bail!("failed to rewrite {}", plural_count(failures.len(), "page"));
    }
    Ok(())
}

/// Process one page file.
///
/// Returns `Ok(None)` when the file needs no change; the file is only
/// written when something converted.
fn rewrite_file(
    file: &Path,
    shared_index: Option<&PageIndex>,
    config: &Config,
    dry_run: bool,
) -> Result<Option<RewriteStats>, PageError> {
    let html = fs::read_to_string(file).map_err(|err| PageError::Read(file.to_path_buf(), err))?;
    if !scan::has_markup(&html) {
        return Ok(None);
    }

    let section =
        page_url_path(file, config.site_root()).as_deref().and_then(Section::from_url_path);

    let embedded_index;
    let index = match shared_index {
        Some(index) => index,
        None => {
            embedded_index = load_embedded_index(&html, file, &config.index.element_id);
            &embedded_index
        }
    };

    let Some((output, stats)) = rewrite_page(&html, index, section, &config.rewrite.container)?
    else {
        return Ok(None);
    };

    if !dry_run {
        fs::write(file, output).map_err(|err| PageError::Write(file.to_path_buf(), err))?;
    }
    Ok(Some(stats))
}

// =============================================================================
// Tests
// =============================================================================
