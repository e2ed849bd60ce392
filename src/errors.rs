use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `far` application.
///
/// Per-file failures (`Decode`, `Processing`, `StaleMatch`) are recovered by the
/// pipeline and never abort a run. The pre-flight variants (see [`Error::is_usage`])
/// are raised before any file is opened.
#[derive(Error, Debug)]
pub enum Error {
    /// An invalid combination of arguments.
    #[error("Usage error: {0}")]
    Usage(String),

    /// The root path supplied on the command line does not exist.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file's content could not be decoded as text.
    #[error("Cannot decode {} as text: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// An I/O failure while reading or rewriting a single file.
    #[error("File processing failed for {}: {source}", path.display())]
    Processing {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A match refers to a line the file no longer has.
    #[error("{} has no line {line}; was it modified during the run?", path.display())]
    StaleMatch { path: PathBuf, line: usize },

    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error that occurred while building the Rayon thread pool.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Returns `true` for errors raised while validating the invocation,
    /// before any file has been read or written.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::Usage(_) | Error::NotFound(_) | Error::Regex(_) | Error::Yaml(_) | Error::Config(_)
        )
    }
}

/// A convenient type alias for `Result<T, far::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}
