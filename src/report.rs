use crate::applier::ApplyReport;
use crate::matcher::FileMatchSet;

/// A count of matches and the number of files they span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub matches: usize,
    pub files: usize,
}

impl Tally {
    /// Counts what the matcher found.
    pub fn found(set: &FileMatchSet) -> Self {
        Self {
            matches: set.match_count(),
            files: set.file_count(),
        }
    }

    /// Counts what the applier actually wrote.
    pub fn applied(report: &ApplyReport) -> Self {
        Self {
            matches: report.replacement_count(),
            files: report.applied.len(),
        }
    }
}

/// End-of-run figures for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub found: Tally,
    /// `None` when nothing was meant to be written (preview).
    pub applied: Option<Tally>,
    /// Files that could not be rewritten, with the reason.
    pub failed: Vec<(String, String)>,
}

impl Summary {
    pub fn new(found: Tally) -> Self {
        Self {
            found,
            ..Default::default()
        }
    }

    pub fn with_apply_report(mut self, report: &ApplyReport) -> Self {
        self.applied = Some(Tally::applied(report));
        self.failed = report
            .failed
            .iter()
            .map(|f| (f.path.clone(), f.error.to_string()))
            .collect();
        self
    }

    pub fn found_line(&self) -> String {
        format!(
            "Found {} matches across {} files",
            self.found.matches, self.found.files
        )
    }

    pub fn applied_line(&self) -> Option<String> {
        self.applied.map(|t| {
            format!(
                "Performed {} replacements across {} files",
                t.matches, t.files
            )
        })
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
