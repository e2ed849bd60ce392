//! `far` is a library for reviewed find-and-replace across a file tree.
//!
//! It provides the core logic for the `far` command-line tool. A run moves
//! through four stages, each finishing for every file before the next begins:
//!
//! - `collector`: Walks the root path and lists candidate files, skipping hidden
//!   paths and anything that is not a regular file.
//! - `matcher`: Applies the pattern to each line and records the lines it changes.
//! - `review`: Decides which changes to keep, interactively, as a preview, or
//!   all at once.
//! - `applier`: Rewrites only the accepted lines back into their files.
//!
//! `report` turns the results into the counts shown to the user, and `pipeline`
//! wires the stages together.

pub mod applier;
pub mod cli;
pub mod collector;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod review;

// Re-export main types for easier access by library users.
pub use config::RunConfig;
pub use errors::{Error, Result};
pub use matcher::{FileMatchSet, LineMatcher, Match};
pub use report::Summary;
pub use review::{Decision, Prompter, ReviewMode};
