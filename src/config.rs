use crate::cli::Args;
use crate::collector::FileFilter;
use crate::errors::{Error, Result};
use crate::matcher::LineMatcher;
use crate::patterns::PatternOptions;
use crate::review::ReviewMode;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default file filters, loaded from a YAML file.
///
/// ```yaml
/// extensions: [rs, toml]
/// exclude: [target, vendor]
/// gitignore: true
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// File extensions to include.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// File or directory names to exclude.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Whether to honor `.gitignore` files.
    #[serde(default)]
    pub gitignore: Option<bool>,
}

/// A utility for locating and loading filter configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file.
    ///
    /// The path is tried as given (absolute, or relative to the current
    /// directory) and then relative to `root` when `root` is a directory.
    pub fn find_config(config_path: &Path, root: &Path) -> Result<PathBuf> {
        if config_path.is_file() {
            return Ok(config_path.to_path_buf());
        }

        let in_root = root.join(config_path);
        if root.is_dir() && in_root.is_file() {
            return Ok(in_root);
        }

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}\n  - {}",
            config_path.display(),
            config_path.display(),
            in_root.display()
        )
        .into())
    }

    /// Loads a `FilterConfig` from a YAML file.
    pub fn load_filter_config(path: &Path) -> Result<FilterConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub mode: ReviewMode,
    pub matcher: LineMatcher,
    pub filter: FileFilter,
    pub workers: Option<usize>,
}

impl RunConfig {
    /// Validates the command line and assembles a `RunConfig`.
    ///
    /// Nothing under `root` is read here. Checks run in order: conflicting
    /// review flags, the root path's existence, the optional config file, then
    /// pattern compilation.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mode = ReviewMode::from_flags(args.interactive, args.preview).ok_or_else(|| {
            Error::Usage("--interactive and --preview cannot be used together".to_string())
        })?;

        if !args.path.exists() {
            return Err(Error::NotFound(args.path.clone()));
        }

        let file_config = match &args.config {
            Some(path) => {
                let resolved = ConfigLoader::find_config(path, &args.path)?;
                ConfigLoader::load_filter_config(&resolved)?
            }
            None => FilterConfig::default(),
        };

        let extensions = if args.extensions.is_empty() {
            file_config.extensions.unwrap_or_default()
        } else {
            args.extensions.clone()
        };
        let exclude = if args.exclude.is_empty() {
            file_config.exclude.unwrap_or_default()
        } else {
            args.exclude.clone()
        };
        let respect_gitignore = args.gitignore || file_config.gitignore.unwrap_or(false);

        let options = PatternOptions {
            ignore_case: args.ignore_case,
            fixed_strings: args.fixed_strings,
        };
        let matcher = LineMatcher::new(options.compile(&args.pattern)?, args.replacement.as_str())
            .with_expansion(args.expand);

        Ok(Self {
            root: args.path.clone(),
            mode,
            matcher,
            filter: FileFilter::new(&extensions, &exclude, respect_gitignore),
            workers: args.workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["far"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_interactive_and_preview_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        let err = RunConfig::from_args(&args(&["-i", "-p", "foo", "bar", root])).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert!(err.is_usage());
    }

    #[test]
    fn test_flag_conflict_is_reported_before_path_check() {
        let err =
            RunConfig::from_args(&args(&["-i", "-p", "foo", "bar", "/no/such/far/path"])).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let err = RunConfig::from_args(&args(&["foo", "bar", "/no/such/far/path"])).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.is_usage());
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        let err = RunConfig::from_args(&args(&["(", "bar", root])).unwrap_err();
        assert!(matches!(err, Error::Regex(_)));
    }

    #[test]
    fn test_modes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        let mode = |flags: &[&str]| {
            let mut argv = flags.to_vec();
            argv.extend_from_slice(&["foo", "bar", root]);
            RunConfig::from_args(&args(&argv)).unwrap().mode
        };
        assert_eq!(mode(&[]), ReviewMode::BulkAccept);
        assert_eq!(mode(&["--interactive"]), ReviewMode::Interactive);
        assert_eq!(mode(&["--preview"]), ReviewMode::Preview);
    }

    #[test]
    fn test_config_file_supplies_filter_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join("far.yaml"),
            "extensions: [rs, .TOML]\nexclude: [target]\ngitignore: true\n",
        )
        .unwrap();

        let root_str = root.to_str().unwrap();
        let config = RunConfig::from_args(&args(&["-c", "far.yaml", "foo", "bar", root_str])).unwrap();
        assert_eq!(config.filter.extensions, vec!["rs", "toml"]);
        assert_eq!(config.filter.exclude, vec!["target"]);
        assert!(config.filter.respect_gitignore);

        let config =
            RunConfig::from_args(&args(&["-c", "far.yaml", "-x", "md", "foo", "bar", root_str])).unwrap();
        assert_eq!(config.filter.extensions, vec!["md"]);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap();
        let err = RunConfig::from_args(&args(&["-c", "absent.yaml", "foo", "bar", root])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_config_file_is_yaml_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("far.yaml"), "extensions: {not: [a list\n").unwrap();
        let err = RunConfig::from_args(&args(&["-c", "far.yaml", "foo", "bar", root.to_str().unwrap()]))
            .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
