use crate::errors::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rules narrowing which files under a directory become candidates.
///
/// Hidden paths are always skipped; these filters apply on top of that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    /// Lowercase file extensions without the leading dot. Empty means "any".
    pub extensions: Vec<String>,
    /// Path component names (directories or files) to leave out entirely.
    pub exclude: Vec<String>,
    /// Additionally honor `.gitignore`, `.ignore` and git exclude files.
    pub respect_gitignore: bool,
}

impl FileFilter {
    /// Builds a filter, normalizing extensions the way they are typed on the
    /// command line (`.RS`, `rs` and ` rs ` all become `rs`).
    pub fn new(extensions: &[String], exclude: &[String], respect_gitignore: bool) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            exclude: exclude.to_vec(),
            respect_gitignore,
        }
    }

    fn accepts(&self, relative: &Path) -> bool {
        let excluded = self
            .exclude
            .iter()
            .any(|ex| relative.components().any(|c| c.as_os_str() == ex.as_str()));
        !excluded && should_process_file(relative, &self.extensions)
    }
}

/// Walks a root path and produces the candidate files for matching.
pub struct FileCollector {
    filter: FileFilter,
}

impl FileCollector {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Collects candidate files under `root`.
    ///
    /// A regular file given directly is returned as-is; any other non-directory
    /// root (FIFO, device, socket) yields nothing. A directory is walked
    /// recursively in file-name order; only regular files survive, and any entry
    /// whose name starts with `.` below the root is pruned together with its
    /// subtree. The root itself is never treated as hidden, so `.` works.
    ///
    /// Entries that cannot be read during the walk are logged and skipped.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }
        if !root.is_dir() {
            warn!("{} is not a regular file or directory, skipping", root.display());
            return Ok(Vec::new());
        }

        let mut walker = WalkBuilder::new(root);
        walker
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        if self.filter.respect_gitignore {
            walker
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .ignore(true)
                .parents(true)
                .require_git(false);
        }

        let mut files = Vec::new();
        for entry in walker.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.filter.accepts(relative) {
                files.push(path.to_path_buf());
            }
        }

        debug!("collected {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

/// Determines if a file should be processed based on its extension.
fn should_process_file(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }

    path.extension()
        .and_then(|os| os.to_str())
        .map(|s| extensions.contains(&s.to_lowercase()))
        .unwrap_or(false)
}
