//! Manifest model: immutable configuration plus the collected file sequence.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::traverse::collect_sources;

/// One entry in the flat `files` sequence of a manifest.
///
/// Subdirectory boundaries are part of the same sequence as file names:
/// `DirBegin(p)` and `DirEnd(p)` always appear as an adjacent pair,
/// followed by everything collected under `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Bare file name within the directory being visited.
    Source(String),
    /// Opens a subdirectory's contribution, rendered as `[relpath]`.
    DirBegin(String),
    /// Closes a subdirectory's contribution, rendered as `(relpath)`.
    DirEnd(String),
}

impl FileEntry {
    /// Parse the rendered form back into an entry.
    pub fn parse(raw: &str) -> FileEntry {
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return FileEntry::DirBegin(inner.to_string());
        }
        if let Some(inner) = raw.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            return FileEntry::DirEnd(inner.to_string());
        }
        FileEntry::Source(raw.to_string())
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileEntry::Source(name) => write!(f, "{name}"),
            FileEntry::DirBegin(rel) => write!(f, "[{rel}]"),
            FileEntry::DirEnd(rel) => write!(f, "({rel})"),
        }
    }
}

/// Everything a manifest run needs, fixed at construction time.
///
/// The defines/includepaths/options/subprojects lists are rendered verbatim
/// into their blocks, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    root: PathBuf,
    output_name: String,
    defines: Vec<String>,
    includepaths: Vec<String>,
    options: Vec<String>,
    subprojects: Vec<String>,
}

impl ManifestConfig {
    /// Create a config for walking `root` and writing `output_name`.
    ///
    /// The output name must be a plain file name: non-empty and free of
    /// path separators.
    pub fn new(root: impl Into<PathBuf>, output_name: impl Into<String>) -> Result<Self> {
        let output_name = output_name.into();
        if output_name.is_empty() {
            return Err(anyhow!("manifest file name must not be empty"));
        }
        if output_name.contains(['/', '\\']) {
            return Err(anyhow!(
                "manifest file name must not contain path separators: {output_name}"
            ));
        }

        Ok(Self {
            root: root.into(),
            output_name,
            defines: Vec::new(),
            includepaths: Vec::new(),
            options: Vec::new(),
            subprojects: Vec::new(),
        })
    }

    pub fn with_defines(mut self, defines: Vec<String>) -> Self {
        self.defines = defines;
        self
    }

    pub fn with_includepaths(mut self, includepaths: Vec<String>) -> Self {
        self.includepaths = includepaths;
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_subprojects(mut self, subprojects: Vec<String>) -> Self {
        self.subprojects = subprojects;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    pub fn includepaths(&self) -> &[String] {
        &self.includepaths
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn subprojects(&self) -> &[String] {
        &self.subprojects
    }
}

/// A fully collected manifest, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    config: ManifestConfig,
    #[serde(
        serialize_with = "serialize_entries",
        deserialize_with = "deserialize_entries"
    )]
    files: Vec<FileEntry>,
}

impl Manifest {
    /// Walk the configured root and capture its source layout.
    pub fn collect(config: ManifestConfig) -> Result<Self> {
        let files = collect_sources(config.root())?;
        Ok(Self { config, files })
    }

    pub fn config(&self) -> &ManifestConfig {
        &self.config
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}

fn serialize_entries<S>(entries: &[FileEntry], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rendered: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
    rendered.serialize(serializer)
}

fn deserialize_entries<'de, D>(deserializer: D) -> Result<Vec<FileEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<String> = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().map(|s| FileEntry::parse(s)).collect())
}
