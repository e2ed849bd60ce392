use crate::errors::Result;
use regex::{Regex, RegexBuilder};

/// Options controlling how the user's pattern is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Match without regard to letter case.
    pub ignore_case: bool,
    /// Treat the pattern as a literal string rather than a regular expression.
    pub fixed_strings: bool,
}

impl PatternOptions {
    /// Compiles `pattern` into a `Regex` according to these options.
    ///
    /// With `fixed_strings` set, every regex metacharacter in `pattern` is escaped
    /// first, so `a.b` only matches the three characters `a.b`.
    pub fn compile(&self, pattern: &str) -> Result<Regex> {
        let source = if self.fixed_strings {
            regex::escape(pattern)
        } else {
            pattern.to_string()
        };

        Ok(RegexBuilder::new(&source)
            .case_insensitive(self.ignore_case)
            .build()?)
    }
}
