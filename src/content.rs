//! Markdown documentation sources.
//!
//! The report's long-form documentation is a fixed set of markdown files
//! keyed by file name. [`EmbeddedContent`] serves the copies compiled into
//! the crate; [`DirectoryContent`] reads them from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Documentation files in report order.
pub const DOCUMENT_NAMES: [&str; 6] = [
    "uarizona_hpc_resources.md",
    "asu_hpc_resources.md",
    "nau_hpc_resources.md",
    "cyverse_ua_resources.md",
    "tacc_jetstream2_hpc_resources.md",
    "peer_universities_hpc.md",
];

/// Documentation files in the order of the on-screen documentation view.
pub const DISPLAY_ORDER: [&str; 6] = [
    "uarizona_hpc_resources.md",
    "cyverse_ua_resources.md",
    "asu_hpc_resources.md",
    "nau_hpc_resources.md",
    "tacc_jetstream2_hpc_resources.md",
    "peer_universities_hpc.md",
];

const EMBEDDED: [(&str, &str); 6] = [
    (
        "uarizona_hpc_resources.md",
        include_str!("../content/uarizona_hpc_resources.md"),
    ),
    (
        "cyverse_ua_resources.md",
        include_str!("../content/cyverse_ua_resources.md"),
    ),
    (
        "asu_hpc_resources.md",
        include_str!("../content/asu_hpc_resources.md"),
    ),
    (
        "nau_hpc_resources.md",
        include_str!("../content/nau_hpc_resources.md"),
    ),
    (
        "tacc_jetstream2_hpc_resources.md",
        include_str!("../content/tacc_jetstream2_hpc_resources.md"),
    ),
    (
        "peer_universities_hpc.md",
        include_str!("../content/peer_universities_hpc.md"),
    ),
];

/// Errors that can occur while fetching a document.
#[derive(Error, Debug)]
pub enum ContentError {
    /// No document with this name.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Reading the document failed.
    #[error("I/O error reading {name}: {source}")]
    Io {
        /// Document name
        name: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// A constant store of document name → markdown text.
pub trait ContentSource {
    /// Fetch the markdown for a document.
    fn fetch(&self, name: &str) -> Result<String, ContentError>;

    /// Fetch a document, substituting a placeholder notice on failure.
    fn fetch_or_placeholder(&self, name: &str) -> String {
        match self.fetch(name) {
            Ok(markdown) => {
                log::debug!("Fetched {} ({} bytes)", name, markdown.len());
                markdown
            }
            Err(err) => {
                log::warn!("Could not load {}: {}", name, err);
                placeholder(name, &err)
            }
        }
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn fetch(&self, name: &str) -> Result<String, ContentError> {
        (**self).fetch(name)
    }
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn fetch(&self, name: &str) -> Result<String, ContentError> {
        (**self).fetch(name)
    }
}

/// Placeholder markdown used in place of a document that failed to load.
pub fn placeholder(name: &str, err: &ContentError) -> String {
    format!("# {}\n\n[Content could not be loaded - {}]", name, err)
}

/// Documents compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedContent;

impl EmbeddedContent {
    /// Names of all embedded documents.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }

    /// Borrow an embedded document without copying.
    pub fn get(&self, name: &str) -> Option<&'static str> {
        EMBEDDED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, markdown)| *markdown)
    }
}

impl ContentSource for EmbeddedContent {
    fn fetch(&self, name: &str) -> Result<String, ContentError> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| ContentError::NotFound(name.to_string()))
    }
}

/// Documents read from `<dir>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    dir: PathBuf,
}

impl DirectoryContent {
    /// Create a source reading from the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory documents are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ContentSource for DirectoryContent {
    fn fetch(&self, name: &str) -> Result<String, ContentError> {
        // Names are plain file names; anything with a path separator is unknown.
        if name.contains(&['/', '\\'][..]) || name == ".." {
            return Err(ContentError::NotFound(name.to_string()));
        }
        fs::read_to_string(self.dir.join(name)).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ContentError::NotFound(name.to_string())
            } else {
                ContentError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

/// Tries `primary` first and falls back to `secondary`.
#[derive(Debug, Clone)]
pub struct Fallback<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> Fallback<A, B> {
    /// Chain two sources.
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: ContentSource, B: ContentSource> ContentSource for Fallback<A, B> {
    fn fetch(&self, name: &str) -> Result<String, ContentError> {
        self.primary
            .fetch(name)
            .or_else(|_| self.secondary.fetch(name))
    }
}
