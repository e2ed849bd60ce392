use crate::errors::{Error, Result};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Number of leading bytes inspected for NUL when sniffing binary content.
const BINARY_CHECK_BYTES: usize = 1024;

/// A single line whose content changes under the substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Zero-based line number within the file.
    pub line_index: usize,
    /// The line exactly as read, including its terminator.
    pub original_text: String,
    /// The line after substitution, with the original terminator.
    pub updated_text: String,
}

impl Match {
    /// One-based line number, as shown to users.
    pub fn line_number(&self) -> usize {
        self.line_index + 1
    }
}

/// Matches for every file in a run, keyed by path.
///
/// Keys are the paths as collected, so they always name the file that was
/// read; [`posix_key`] is only for display. Iteration is in ascending path order and each file's matches are in
/// ascending `line_index` order. Files without matches are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMatchSet {
    files: BTreeMap<PathBuf, Vec<Match>>,
}

impl FileMatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the matches for `path`. An empty list is ignored.
    pub fn insert(&mut self, path: &Path, matches: Vec<Match>) {
        if !matches.is_empty() {
            self.files.insert(path.to_path_buf(), matches);
        }
    }

    pub fn get(&self, path: &Path) -> Option<&[Match]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Match])> {
        self.files.iter().map(|(k, v)| (k.as_path(), v.as_slice()))
    }

    /// Number of files with at least one match.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total number of matches across all files.
    pub fn match_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Renders a path `/`-separated for display.
pub fn posix_key(path: &Path) -> String {
    let key = path.to_string_lossy();
    if cfg!(windows) {
        key.replace('\\', "/")
    } else {
        key.into_owned()
    }
}

/// Applies a compiled pattern line by line to produce `Match`es.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    regex: Regex,
    replacement: String,
    expand: bool,
}

impl LineMatcher {
    /// Creates a matcher that substitutes every occurrence of `regex` with the
    /// literal `replacement`.
    pub fn new(regex: Regex, replacement: impl Into<String>) -> Self {
        Self {
            regex,
            replacement: replacement.into(),
            expand: false,
        }
    }

    /// Interpret `$1` / `${name}` references in the replacement.
    pub fn with_expansion(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Substitutes every non-overlapping occurrence in `line`.
    ///
    /// The line terminator (`\n` or `\r\n`) is split off first and re-attached
    /// untouched, so substitution can never join or break lines.
    pub fn substitute<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let (body, terminator) = split_terminator(line);
        let replaced = if self.expand {
            self.regex.replace_all(body, self.replacement.as_str())
        } else {
            self.regex.replace_all(body, NoExpand(self.replacement.as_str()))
        };

        match replaced {
            Cow::Borrowed(_) => Cow::Borrowed(line),
            Cow::Owned(mut updated) => {
                updated.push_str(terminator);
                Cow::Owned(updated)
            }
        }
    }

    /// Computes the matches for already-decoded text.
    pub fn match_lines(&self, content: &str) -> Vec<Match> {
        content
            .split_inclusive('\n')
            .enumerate()
            .filter_map(|(line_index, line)| {
                let updated = self.substitute(line);
                (updated != line).then(|| Match {
                    line_index,
                    original_text: line.to_string(),
                    updated_text: updated.into_owned(),
                })
            })
            .collect()
    }

    /// Reads `path` and returns its matches in ascending line order.
    ///
    /// Binary or non-UTF-8 files produce an empty list and a warning; an I/O
    /// failure while reading is returned to the caller.
    pub fn find_matches(&self, path: &Path) -> Result<Vec<Match>> {
        match read_text(path) {
            Ok(content) => Ok(self.match_lines(&content)),
            Err(e @ Error::Decode { .. }) => {
                warn!("{e}, skipping");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Processing {
        path: path.to_path_buf(),
        source,
    })?;

    // Basic binary detection: check for null bytes in the first 1024 bytes
    if bytes.iter().take(BINARY_CHECK_BYTES).any(|&b| b == 0) {
        return Err(Error::Decode {
            path: path.to_path_buf(),
            reason: "binary content".to_string(),
        });
    }

    String::from_utf8(bytes).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.utf8_error().to_string(),
    })
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
