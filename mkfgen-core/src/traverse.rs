//! Source tree traversal for manifest generation.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::manifest::FileEntry;

/// Walk `root` depth-first and return the flat file sequence.
///
/// At each level, matching files come first in directory-listing order,
/// followed by subdirectories in listing order. Each subdirectory
/// contributes its `[relpath]` / `(relpath)` marker pair, appended
/// together immediately before its contents are visited. Listing order is
/// host-filesystem-dependent and is deliberately not sorted.
pub fn collect_sources(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.exists() {
        return Err(anyhow!("root path does not exist: {}", root.display()));
    }

    let mut out = Vec::new();
    visit(root, "", &mut out)?;
    Ok(out)
}

fn visit(dir: &Path, prefix: &str, out: &mut Vec<FileEntry>) -> Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Path-based check so directory symlinks are walked too.
        if entry.path().is_dir() {
            dirs.push(name);
        } else if is_source(&name) {
            files.push(name);
        }
    }

    for name in files {
        out.push(FileEntry::Source(name));
    }

    for name in dirs {
        // Mirrored paths always use forward slashes, whatever the host uses.
        let rel = if prefix.is_empty() {
            name.replace('\\', "/")
        } else {
            format!("{prefix}/{}", name.replace('\\', "/"))
        };

        out.push(FileEntry::DirBegin(rel.clone()));
        out.push(FileEntry::DirEnd(rel.clone()));
        visit(&dir.join(&name), &rel, out)?;
    }

    Ok(())
}

/// Extension check is exact and case-sensitive: `.h` and `.cpp` only.
fn is_source(name: &str) -> bool {
    matches!(
        Path::new(name).extension().and_then(|e| e.to_str()),
        Some("h" | "cpp")
    )
}
