//! Shared CLI helpers: page collection, index loading, and parallel
//! result gathering.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossbeam::queue::SegQueue;

use crate::config::Config;
use crate::index::{IndexError, PageIndex};
use crate::utils::path::resolve_path;
use crate::{debug, log};

/// Lock-free collector for parallel processing results
pub struct ParallelCollector<T> {
    queue: SegQueue<T>,
}

impl<T> ParallelCollector<T> {
    pub fn new() -> Self {
        Self { queue: SegQueue::new() }
    }

    /// Add an item from any thread
    pub fn push(&self, item: T) {
        self.queue.push(item);
    }

    /// Drain all items into a Vec
    pub fn drain(&self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.queue.len());
        while let Some(item) = self.queue.pop() {
            items.push(item);
        }
        items
    }
}

impl<T> Default for ParallelCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the HTML pages named by the CLI arguments.
///
/// With no paths, every page under the site root is collected. A lone
/// `-` reads paths from stdin instead.
pub fn collect_pages(paths: &[PathBuf], site_root: &Path) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    if paths.is_empty() {
        return Ok(collect_page_files(site_root));
    }

    let mut all_files = Vec::new();
    for path in &paths {
        let resolved = resolve_path(path, site_root);
        if resolved.is_file() {
            if !is_page_file(&resolved) {
                anyhow::bail!("not an HTML page: {}", path.display());
            }
            all_files.push(resolved);
        } else if resolved.is_dir() {
            all_files.extend(collect_page_files(&resolved));
        } else {
            anyhow::bail!(
                "path not found: {}\n  Tried:\n    - {}\n    - {}",
                path.display(),
                path.display(),
                site_root.join(path).display()
            );
        }
    }
    Ok(all_files)
}

/// Read paths from stdin, one per line
fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = std::io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

/// Whether the file looks like a rendered HTML page
fn is_page_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Recursively collect page files under a directory
pub fn collect_page_files(dir: &Path) -> Vec<PathBuf> {
    jwalk::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| is_page_file(path))
        .collect()
}

/// URL path for a rendered page, relative to the site root.
///
/// `public/notes/rust/index.html` becomes `/notes/rust/`. Returns
/// `None` for files outside the site root.
pub fn page_url_path(file: &Path, site_root: &Path) -> Option<String> {
    let rel = file.strip_prefix(site_root).ok()?;
    let stem = rel.with_extension("");

    let mut url = String::from("/");
    for component in stem.components() {
        if let std::path::Component::Normal(part) = component {
            let part = part.to_string_lossy();
            if part != "index" {
                url.push_str(&part);
                url.push('/');
            }
        }
    }
    Some(url)
}

/// Load the shared index file when one is configured.
///
/// A file that cannot be read or parsed degrades to an empty index so
/// the run continues; every target then renders as broken.
pub fn load_shared_index(config: &Config) -> Option<PageIndex> {
    let path = config.index.path.as_ref()?;
    match PageIndex::from_file(path) {
        Ok(index) => {
            debug!("index"; "loaded {} keys from {}", index.len(), path.display());
            Some(index)
        }
        Err(err) => {
            log!("error"; "{err}");
            Some(PageIndex::default())
        }
    }
}

/// Parse the index payload embedded in one page.
///
/// Pages without the element get an empty index silently; a payload
/// that fails to parse is reported.
pub fn load_embedded_index(html: &str, file: &Path, element_id: &str) -> PageIndex {
    match PageIndex::from_embedded(html, element_id) {
        Ok(index) => index,
        Err(IndexError::MissingElement(_)) => {
            debug!("index"; "{}: no embedded page index", file.display());
            PageIndex::default()
        }
        Err(err) => {
            log!("error"; "{}: {err}", file.display());
            PageIndex::default()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
