use clap::Parser;
use std::path::PathBuf;

/// Interactive find-and-replace across a file tree.
///
/// `far` scans text files line by line for a regular expression, shows each
/// proposed change, and writes the accepted ones back in place.
#[derive(Parser, Debug)]
#[command(
    name = "far",
    author,
    version,
    about = "Find and replace across a file tree, one reviewed line at a time",
    long_about = "far - find and replace a regex across every text file under a path.

Each line where the substitution changes something becomes a proposed change.
By default all of them are written immediately; --interactive asks about each
one, --preview only shows them. Hidden files and directories are skipped, and
binary or non-UTF-8 files are left alone with a warning.

QUICK EXAMPLES:
  far 'colour' 'color'                  # Replace in the current directory
  far -i 'TODO' 'DONE' src/             # Review every change
  far -p 'v1\\.2' 'v1.3' -x toml,md      # Preview changes in .toml/.md files
  far --expand '(\\w+)@(\\w+)' '$2:$1'   # Use capture groups"
)]
pub struct Args {
    /// The regular expression to search for.
    #[arg(allow_hyphen_values = true)]
    pub pattern: String,

    /// The replacement text. Literal unless --expand is given.
    #[arg(allow_hyphen_values = true)]
    pub replacement: String,

    /// The file or directory to process.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Ask before applying each change.
    #[arg(short, long)]
    pub interactive: bool,

    /// Show the changes without modifying any files.
    #[arg(short, long)]
    pub preview: bool,

    /// A comma-separated list of file extensions to include.
    #[arg(short = 'x', long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// A comma-separated list of file or directory names to exclude.
    #[arg(short = 'e', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Also skip files matched by .gitignore and .ignore files.
    #[arg(long)]
    pub gitignore: bool,

    /// Path to a YAML file with default file filters.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Match without regard to letter case.
    #[arg(long)]
    pub ignore_case: bool,

    /// Treat the pattern as a literal string.
    #[arg(short = 'F', long)]
    pub fixed_strings: bool,

    /// Expand `$1` / `${name}` capture references in the replacement.
    #[arg(long)]
    pub expand: bool,

    /// Match files on this many threads (0 = one per CPU). Sequential if omitted.
    #[arg(short, long, env = "FAR_WORKERS")]
    pub workers: Option<usize>,

    /// Log each stage of the run to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_defaults_to_current_directory() {
        let args = Args::parse_from(["far", "foo", "bar"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.interactive && !args.preview);
    }

    #[test]
    fn test_lists_are_comma_separated() {
        let args = Args::parse_from(["far", "-x", "rs,toml", "-e", "target", "a", "b", "src"]);
        assert_eq!(args.extensions, vec!["rs", "toml"]);
        assert_eq!(args.exclude, vec!["target"]);
        assert_eq!(args.path, PathBuf::from("src"));
    }

    #[test]
    fn test_hyphenated_pattern_is_positional() {
        let args = Args::parse_from(["far", "--", "-old", "-new"]);
        assert_eq!(args.pattern, "-old");
        assert_eq!(args.replacement, "-new");
    }
}
