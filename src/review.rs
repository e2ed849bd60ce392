use crate::errors::Result;
use crate::matcher::{FileMatchSet, Match, posix_key};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// How proposed changes are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    /// Ask the user about every match.
    Interactive,
    /// Show every match, accept none.
    Preview,
    /// Accept every match without asking.
    BulkAccept,
}

impl ReviewMode {
    /// Resolves the mode from the two mutually exclusive command-line flags.
    /// Returns `None` when both are set.
    pub fn from_flags(interactive: bool, preview: bool) -> Option<Self> {
        match (interactive, preview) {
            (true, true) => None,
            (true, false) => Some(ReviewMode::Interactive),
            (false, true) => Some(ReviewMode::Preview),
            (false, false) => Some(ReviewMode::BulkAccept),
        }
    }
}

/// A user's answer for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
    /// Accept this match and every one after it.
    AcceptRest,
    /// Reject this match and every one after it.
    Quit,
}

impl Decision {
    /// Parses a typed command. Unrecognized input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "y" => Some(Decision::Accept),
            "n" => Some(Decision::Reject),
            "a" => Some(Decision::AcceptRest),
            "q" => Some(Decision::Quit),
            _ => None,
        }
    }
}

/// Source of per-match decisions in interactive mode.
pub trait Prompter {
    /// Blocks until a decision for `m` in `path` is available.
    fn decide(&mut self, path: &Path, m: &Match) -> Result<Decision>;
}

/// Prompts on a writer and reads answers line by line from a reader.
///
/// Unrecognized answers are re-prompted. End of input counts as `q`.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// A prompter bound to the process's terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn decide(&mut self, _path: &Path, _m: &Match) -> Result<Decision> {
        loop {
            write!(self.output, "Apply this change? [Y/n/a/q] ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(Decision::Quit);
            }
            if let Some(decision) = Decision::parse(&answer) {
                return Ok(decision);
            }
            writeln!(
                self.output,
                "Unrecognized answer {:?}: y = yes, n = no, a = accept all remaining, q = reject all remaining",
                answer.trim()
            )?;
        }
    }
}

/// Writes the description of one match: location, old line and new line.
pub fn render_match<W: Write + ?Sized>(out: &mut W, path: &Path, m: &Match) -> io::Result<()> {
    writeln!(out, "{}:{}", posix_key(path), m.line_number())?;
    writeln!(out, "- {}", m.original_text.trim_end())?;
    writeln!(out, "+ {}", m.updated_text.trim_end())
}

/// Decides which matches get applied.
///
/// Every match is shown on `out` in `Interactive` and `Preview` modes, in file
/// then line order. The returned set holds only accepted matches, in their
/// original relative order; the input is never modified.
pub fn review<W: Write + ?Sized>(
    matches: &FileMatchSet,
    mode: ReviewMode,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<FileMatchSet> {
    match mode {
        ReviewMode::BulkAccept => return Ok(matches.clone()),
        ReviewMode::Preview => {
            for (path, file_matches) in matches.iter() {
                for m in file_matches {
                    render_match(out, path, m)?;
                    writeln!(out)?;
                }
            }
            return Ok(FileMatchSet::new());
        }
        ReviewMode::Interactive => {}
    }

    let mut accepted = FileMatchSet::new();
    // Set once the user answers `a` or `q`; applies to every later match.
    let mut remaining: Option<bool> = None;

    for (path, file_matches) in matches.iter() {
        let mut kept = Vec::new();
        for m in file_matches {
            let take = match remaining {
                Some(take) => take,
                None => {
                    render_match(out, path, m)?;
                    out.flush()?;
                    match prompter.decide(path, m)? {
                        Decision::Accept => true,
                        Decision::Reject => false,
                        Decision::AcceptRest => {
                            remaining = Some(true);
                            true
                        }
                        Decision::Quit => {
                            remaining = Some(false);
                            false
                        }
                    }
                }
            };
            if take {
                kept.push(m.clone());
            }
        }
        accepted.insert(path, kept);
    }

    Ok(accepted)
}
