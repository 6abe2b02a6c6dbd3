//! The check command: scan pages and report unresolved references
//! without writing anything.

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::cli::CheckArgs;
use crate::cli::common::{
    ParallelCollector, collect_pages, load_embedded_index, load_shared_index, page_url_path,
};
use crate::config::Config;
use crate::core::Section;
use crate::index::PageIndex;
use crate::log;
use crate::rewrite::{CheckIssue, PageError, collect_issues};
use crate::scan;
use crate::utils::plural_count;

use report::CheckReport;

/// Entry point for `crosslink check`
pub fn run(args: &CheckArgs, config: &Config) -> Result<()> {
    let files = collect_pages(&args.common.paths, config.site_root())?;
    if files.is_empty() {
        log!("check"; "no pages found under {}", config.site_root().display());
        return Ok(());
    }
    log!("check"; "checking {}", plural_count(files.len(), "page"));

    let shared_index = load_shared_index(config);
    let check_assets = !args.no_assets && config.site_root().is_dir();

    let report = RwLock::new(CheckReport::default());
    let failures: ParallelCollector<(PathBuf, PageError)> = ParallelCollector::new();

    files.par_iter().for_each(|file| {
        match check_file(file, shared_index.as_ref(), config, check_assets) {
            Ok(issues) if issues.is_empty() => {}
            Ok(issues) => {
                let source = config.site_relative(file).display().to_string();
                report.write().add(source, issues);
            }
            Err(error) => failures.push((file.clone(), error)),
        }
    });

    let report = report.into_inner();
    let failures = failures.drain();
    for (file, error) in &failures {
        log!("error"; "{}: {error}", config.site_relative(file).display());
    }

    report.print();
    log!("check"; "{report}");

    if !failures.is_empty() {
        anyhow::bail!("failed to check {}", plural_count(failures.len(), "page"));
    }
    if report.issue_count() > 0 && !args.warn_only {
        anyhow::bail!("found {}", plural_count(report.issue_count(), "unresolved reference"));
    }
    Ok(())
}

/// Collect the issues for one page file.
fn check_file(
    file: &Path,
    shared_index: Option<&PageIndex>,
    config: &Config,
    check_assets: bool,
) -> Result<Vec<CheckIssue>, PageError> {
    let html = fs::read_to_string(file).map_err(|err| PageError::Read(file.to_path_buf(), err))?;
    if !scan::has_markup(&html) {
        return Ok(Vec::new());
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

    let asset_root = check_assets.then_some(config.site_root());
    collect_issues(&html, index, section, asset_root, &config.rewrite.container)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.site.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_check_file_reports_broken_links() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("a.html");
        fs::write(&page, "<html><body><main><p>[[ghost]]</p></main></body></html>").unwrap();
        let config = test_config(dir.path());

        let issues = check_file(&page, None, &config, false).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(matches!(&issues[0], CheckIssue::BrokenLink { slug, .. } if slug == "ghost"));
    }

    #[test]
    fn test_check_file_resolves_against_shared_index() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("a.html");
        fs::write(&page, "<html><body><main><p>[[ghost]]</p></main></body></html>").unwrap();
        let config = test_config(dir.path());

        let shared =
            PageIndex::from_json(r#"{"pages":[{"s":"ghost","b":"","u":"/ghost/"}]}"#).unwrap();
        let issues = check_file(&page, Some(&shared), &config, false).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_check_file_reports_missing_assets() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("notes/post");
        fs::create_dir_all(&nested).unwrap();
        let page = nested.join("index.html");
        fs::write(&page, "<html><body><main><p>![[shot.png]]</p></main></body></html>").unwrap();
        let config = test_config(dir.path());

        let issues = check_file(&page, None, &config, true).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(matches!(&issues[0], CheckIssue::MissingImage { tried, .. } if tried.len() == 2));
    }
}
