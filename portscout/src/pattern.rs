//! Shell-style glob patterns for port names.
//!
//! Patterns serve two purposes: expanding user-configured additional ports
//! against the filesystem, and matching candidates against the blacklist.
//! Matching treats the candidate as an opaque string, so `*` also matches
//! path separators (`*USB*` matches `/dev/ttyUSB0`).
//!
//! Patterns use `fnmatch` rules, which are looser than the `glob` crate's:
//! any run of `*` acts as a single `*`, and a `[` with no closing `]` is an
//! ordinary character. [`normalize`] rewrites a pattern accordingly before it
//! is compiled.

use {
    crate::error::Result,
    glob::{MatchOptions, Pattern, PatternError},
    log::{trace, warn},
};

/// Rewrite an `fnmatch` pattern into an equivalent `glob` crate pattern.
pub fn normalize(pattern: &str) -> String {
    let chars: Vec<char> = pattern
        .chars()
        .collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
            },
            '[' => {
                // A `]` right after `[` or `[!` belongs to the set.
                let mut j = i + 1;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j < chars.len() {
                    out.extend(&chars[i..=j]);
                    i = j + 1;
                } else {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            },
        }
    }
    out
}

/// Compile a pattern for matching candidate names.
pub fn compile(pattern: &str) -> std::result::Result<Pattern, PatternError> {
    Pattern::new(&normalize(pattern))
}

/// Expand a glob pattern against the filesystem.
///
/// Matches are returned in the order produced by the `glob` crate
/// (alphabetical). Wildcards do not match a leading `.` in a file name.
/// Entries that cannot be read or are not valid UTF-8 are skipped.
pub fn expand(pattern: &str) -> Result<Vec<String>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut found = Vec::new();
    for entry in glob::glob_with(&normalize(pattern), options)? {
        match entry {
            Ok(path) => match path.into_os_string().into_string() {
                Ok(name) => found.push(name),
                Err(raw) => trace!("Skipping non UTF-8 path {raw:?}"),
            },
            Err(e) => trace!("Skipping unreadable glob entry: {e}"),
        }
    }
    Ok(found)
}

/// A compiled set of blacklist patterns.
///
/// A pattern that still fails to compile is matched literally, so a
/// blacklist entry always blocks at least the name it spells.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Pattern>,
}

impl Blacklist {
    /// Compile the given patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                compile(raw)
                    .or_else(|e| {
                        warn!("Matching blacklist pattern '{raw}' literally: {e}");
                        Pattern::new(&Pattern::escape(raw))
                    })
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// Whether any pattern matches the candidate.
    pub fn is_blocked(&self, candidate: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(candidate))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns
            .len()
    }

    /// Whether no pattern was configured.
    pub fn is_empty(&self) -> bool {
        self.patterns
            .is_empty()
    }
}
