//! The page index: slug to URL lookups backing link resolution.
//!
//! The index is built from a JSON payload of the form
//! `{"pages":[{"s":"notes/rust","b":"rust","u":"/notes/rust/"}]}`,
//! either loaded once from a file and shared by the whole run, or
//! extracted per page from an embedded `<script id="page-index">`
//! element.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while building a page index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index file {0}: {1}")]
    Io(PathBuf, io::Error),

    #[error("malformed index payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no element with id \"{0}\"")]
    MissingElement(String),
}

/// One page entry in the serialized index payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexEntry {
    /// Full slug, e.g. `notes/rust`.
    #[serde(rename = "s")]
    pub slug: String,

    /// Basename shorthand, e.g. `rust`. Empty or absent when it would
    /// only duplicate the slug.
    #[serde(rename = "b", default)]
    pub basename: String,

    /// URL the page was rendered at.
    #[serde(rename = "u")]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct IndexPayload {
    #[serde(default)]
    pages: Vec<IndexEntry>,
}

/// Slug to URL map preserving insertion order.
///
/// Re-inserting an existing key overwrites its URL but keeps the key's
/// original position. Partial matching walks the index in insertion
/// order, so that position is part of the resolution contract.
#[derive(Debug, Default, Clone)]
pub struct PageIndex {
    entries: Vec<(String, String)>,
    positions: FxHashMap<String, usize>,
}

impl PageIndex {
    /// Parse an index from its JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, IndexError> {
        let payload: IndexPayload = serde_json::from_str(payload)?;

        let mut index = Self::default();
        for entry in payload.pages {
            let slug_differs = !entry.basename.is_empty() && entry.basename != entry.slug;
            index.insert(entry.slug, entry.url.clone());
            // A distinct basename doubles as a shorthand key
            if slug_differs {
                index.insert(entry.basename, entry.url);
            }
        }
        Ok(index)
    }

    /// Load an index from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, IndexError> {
        let content =
            fs::read_to_string(path).map_err(|err| IndexError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content)
    }

    /// Parse the payload embedded in a rendered page.
    pub fn from_embedded(html: &str, element_id: &str) -> Result<Self, IndexError> {
        let payload = extract_embedded_payload(html, element_id)
            .ok_or_else(|| IndexError::MissingElement(element_id.to_string()))?;
        Self::from_json(&payload)
    }

    fn insert(&mut self, key: String, url: String) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = url,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, url));
            }
        }
    }

    /// Exact lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    /// All keys and URLs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(key, url)| (key.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text content of the element with the given id, if the page has one.
fn extract_embedded_payload(html: &str, element_id: &str) -> Option<String> {
    let dom = tl::parse(html, tl::ParserOptions::default()).ok()?;
    let parser = dom.parser();
    let node = dom.get_element_by_id(element_id)?.get(parser)?;
    Some(node.inner_text(parser).into_owned())
}

// =============================================================================
// Tests
// =============================================================================
