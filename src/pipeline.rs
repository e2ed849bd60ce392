use crate::applier;
use crate::collector::FileCollector;
use crate::config::RunConfig;
use crate::errors::Result;
use crate::matcher::{FileMatchSet, LineMatcher};
use crate::report::{Summary, Tally};
use crate::review::{self, Prompter, ReviewMode};
use rayon::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Runs one find-and-replace pass: collect, match, review, apply.
///
/// Progress lines ("Found ...", "Performed ...") and the review display go to
/// `out`; decisions come from `prompter`. Each stage finishes for every file
/// before the next begins. Per-file problems are logged and never abort the
/// run; they show up in the returned `Summary` instead.
pub fn run<W: Write + ?Sized>(
    config: &RunConfig,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<Summary> {
    let files = FileCollector::new(config.filter.clone()).collect(&config.root)?;
    let found = match_files(&files, &config.matcher, config.workers)?;

    let mut summary = Summary::new(Tally::found(&found));
    writeln!(out, "{}", summary.found_line())?;

    let accepted = review::review(&found, config.mode, prompter, out)?;
    if config.mode == ReviewMode::Preview {
        return Ok(summary);
    }

    debug!("applying {} accepted matches", accepted.match_count());
    let report = applier::apply(&accepted);
    summary = summary.with_apply_report(&report);
    if let Some(line) = summary.applied_line() {
        writeln!(out, "{line}")?;
    }

    Ok(summary)
}

/// Runs the line matcher over every file.
///
/// With `workers` set the files are spread over a dedicated Rayon pool
/// (`0` means one thread per CPU). The result is keyed and ordered by path, so
/// it does not depend on the order files finish in.
pub fn match_files(
    files: &[PathBuf],
    matcher: &LineMatcher,
    workers: Option<usize>,
) -> Result<FileMatchSet> {
    let scan = |path: &PathBuf| match matcher.find_matches(path) {
        Ok(matches) => Some((path.clone(), matches)),
        Err(e) => {
            warn!("{e}, skipping");
            None
        }
    };

    let results: Vec<(PathBuf, _)> = match workers {
        Some(n) => {
            let threads = if n == 0 { num_cpus::get() } else { n };
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            debug!("matching {} files on {threads} threads", files.len());
            pool.install(|| files.par_iter().filter_map(scan).collect())
        }
        None => files.iter().filter_map(scan).collect(),
    };

    let mut set = FileMatchSet::new();
    for (path, matches) in results {
        set.insert(&path, matches);
    }
    Ok(set)
}
