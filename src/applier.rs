use crate::errors::{Error, Result};
use crate::matcher::{FileMatchSet, Match, posix_key};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, error};

/// A file that was rewritten and how many lines changed in it. Paths here are
/// for display; see [`posix_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFile {
    pub path: String,
    pub replacements: usize,
}

/// A file whose rewrite was abandoned.
#[derive(Debug)]
pub struct FailedFile {
    pub path: String,
    pub error: Error,
}

/// Outcome of applying an accepted match set.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<AppliedFile>,
    pub failed: Vec<FailedFile>,
}

impl ApplyReport {
    /// Total lines rewritten across all successful files.
    pub fn replacement_count(&self) -> usize {
        self.applied.iter().map(|f| f.replacements).sum()
    }
}

/// Writes every accepted match back to its file.
///
/// Files are handled independently: a failure is recorded in the report and
/// logged, and the remaining files are still processed.
pub fn apply(accepted: &FileMatchSet) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (path, matches) in accepted.iter() {
        let display = posix_key(path);
        match apply_file(path, matches) {
            Ok(replacements) => {
                let shown = &display;
                debug!("rewrote {replacements} lines in {shown}");
                report.applied.push(AppliedFile {
                    path: display,
                    replacements,
                });
            }
            Err(e) => {
                error!("{e}");
                report.failed.push(FailedFile {
                    path: display,
                    error: e,
                });
            }
        }
    }

    report
}

/// Rewrites the lines named by `matches` in place and returns how many were
/// replaced.
///
/// The file is read, the matched lines swapped for their updated text, and the
/// whole content written back over the same handle before truncating to the new
/// length. Every other line keeps its exact bytes. With no matches the file is
/// not opened at all.
///
/// Line indices are trusted to describe the file as it was matched; an index
/// past the end aborts this file before anything is written.
pub fn apply_file(path: &Path, matches: &[Match]) -> Result<usize> {
    if matches.is_empty() {
        return Ok(0);
    }

    let processing = |source| Error::Processing {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(processing)?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(processing)?;

    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    for m in matches {
        let slot = lines.get_mut(m.line_index).ok_or_else(|| Error::StaleMatch {
            path: path.to_path_buf(),
            line: m.line_number(),
        })?;
        *slot = m.updated_text.as_str();
    }
    let rewritten = lines.concat();

    file.seek(SeekFrom::Start(0)).map_err(processing)?;
    file.write_all(rewritten.as_bytes()).map_err(processing)?;
    file.set_len(rewritten.len() as u64).map_err(processing)?;
    file.flush().map_err(processing)?;

    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::LineMatcher;
    use crate::patterns::PatternOptions;
    use std::fs;
    use tempfile::TempDir;

    fn matcher(pattern: &str, replacement: &str) -> LineMatcher {
        LineMatcher::new(PatternOptions::default().compile(pattern).unwrap(), replacement)
    }

    #[test]
    fn test_rewrites_only_selected_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("six.txt");
        let original = "foo 1\nfoo 2\r\nfoo 3\nfoo 4\nfoo 5\nfoo 6";
        fs::write(&path, original).unwrap();

        let all = matcher("foo", "bar").find_matches(&path).unwrap();
        let chosen: Vec<Match> = all
            .into_iter()
            .filter(|m| m.line_index == 1 || m.line_index == 4)
            .collect();

        assert_eq!(apply_file(&path, &chosen).unwrap(), 2);

        let updated = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = updated.split_inclusive('\n').collect();
        let before: Vec<&str> = original.split_inclusive('\n').collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "bar 2\r\n");
        assert_eq!(lines[4], "bar 5\n");
        for i in [0, 2, 3, 5] {
            assert_eq!(lines[i], before[i]);
        }
    }

    #[test]
    fn test_shrinking_content_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shrink.txt");
        fs::write(&path, "a long line of text\nend\n").unwrap();

        let matches = matcher("long line of ", "").find_matches(&path).unwrap();
        apply_file(&path, &matches).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a text\nend\n");
    }

    #[test]
    fn test_no_matches_leaves_file_unopened() {
        let temp_dir = TempDir::new().unwrap();
        // A path that does not exist proves the file is never opened.
        let path = temp_dir.path().join("absent.txt");
        assert_eq!(apply_file(&path, &[]).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_stale_index_aborts_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.txt");
        fs::write(&path, "foo\n").unwrap();

        let stale = Match {
            line_index: 5,
            original_text: "foo\n".into(),
            updated_text: "bar\n".into(),
        };
        let result = apply_file(&path, &[stale]);
        assert!(matches!(result, Err(Error::StaleMatch { line: 6, .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "foo\n");
    }

    #[test]
    fn test_failure_in_one_file_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        let missing = temp_dir.path().join("missing.txt");
        fs::write(&good, "foo\n").unwrap();

        let m = matcher("foo", "bar");
        let mut accepted = FileMatchSet::new();
        accepted.insert(&good, m.match_lines("foo\n"));
        accepted.insert(&missing, m.match_lines("foo\n"));

        let report = apply(&accepted);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.replacement_count(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].error, Error::Processing { .. }));
        assert_eq!(fs::read_to_string(&good).unwrap(), "bar\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_name_is_rewritten() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let raw = temp_dir.path().join(OsStr::from_bytes(b"f\xff.txt"));
        // Same lossy rendering as `raw`, but a different file.
        let lookalike = temp_dir.path().join("f\u{FFFD}.txt");
        if fs::write(&raw, "foo\n").is_err() {
            // Some filesystems only accept UTF-8 names.
            return;
        }
        fs::write(&lookalike, "foo\n").unwrap();

        let m = matcher("foo", "bar");
        let mut accepted = FileMatchSet::new();
        accepted.insert(&raw, m.match_lines("foo\n"));
        assert_eq!(accepted.file_count(), 1);

        let report = apply(&accepted);
        assert!(report.failed.is_empty());
        assert_eq!(report.replacement_count(), 1);
        assert_eq!(fs::read_to_string(&raw).unwrap(), "bar\n");
        assert_eq!(fs::read_to_string(&lookalike).unwrap(), "foo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_file_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.txt");
        fs::write(&path, "foo\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        // Root ignores permission bits, so only assert when the open fails.
        let matches = matcher("foo", "bar").match_lines("foo\n");
        if let Err(e) = apply_file(&path, &matches) {
            assert!(matches!(e, Error::Processing { .. }));
            assert_eq!(fs::read_to_string(&path).unwrap(), "foo\n");
        }
    }
}
