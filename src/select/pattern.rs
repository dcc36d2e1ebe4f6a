//! Glob-like pattern matching against normalized relative paths.
//!
//! Rules, in precedence order:
//!
//! 1. `/name` is anchored to the traversal root: it only matches paths without
//!    a `/`. A wildcard-free remainder must equal the path exactly; otherwise it
//!    is glob-matched against the path.
//! 2. `prefix/**` matches `prefix` itself and everything below it.
//! 3. A wildcard-free pattern matches any path segment equal to it, so a bare
//!    `vendor` hits `vendor/x.go` and `a/vendor/b/c.go` alike.
//! 4. A wildcard pattern containing `/` is matched against the full path.
//! 5. Any other wildcard pattern is matched against the base name.
//!
//! Globs use shell semantics: `*` and `?` never cross a `/`, and a run of stars
//! such as `**` is just a `*`. A malformed glob never matches.

use globset::{GlobBuilder, GlobMatcher};

use crate::utils::base_name;

const WILDCARDS: &[char] = &['*', '?', '['];

/// A pattern compiled once and matched many times.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    rule: Rule,
}

#[derive(Debug, Clone)]
enum Rule {
    AnchoredLiteral(String),
    AnchoredGlob(Option<GlobMatcher>),
    DirPrefix(String),
    Literal(String),
    PathGlob(Option<GlobMatcher>),
    NameGlob(Option<GlobMatcher>),
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        let rule = if let Some(stripped) = pattern.strip_prefix('/') {
            if has_wildcard(stripped) {
                Rule::AnchoredGlob(compile(stripped))
            } else {
                Rule::AnchoredLiteral(stripped.to_string())
            }
        } else if let Some(prefix) = pattern.strip_suffix("/**") {
            Rule::DirPrefix(prefix.to_string())
        } else if !has_wildcard(pattern) {
            Rule::Literal(pattern.to_string())
        } else if pattern.contains('/') {
            Rule::PathGlob(compile(pattern))
        } else {
            Rule::NameGlob(compile(pattern))
        };

        Self { source: pattern.to_string(), rule }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check the pattern against a slash-separated path relative to the traversal root.
    pub fn is_match(&self, path: &str) -> bool {
        match &self.rule {
            Rule::AnchoredLiteral(name) => !path.contains('/') && name == path,
            Rule::AnchoredGlob(glob) => !path.contains('/') && glob_match(glob, path),
            Rule::DirPrefix(prefix) => {
                path == prefix
                    || path.strip_prefix(prefix.as_str()).is_some_and(|rest| rest.starts_with('/'))
            }
            Rule::Literal(literal) => {
                path.split('/').any(|segment| segment == literal)
                    || path.strip_prefix(literal.as_str()).is_some_and(|rest| rest.starts_with('/'))
            }
            Rule::PathGlob(glob) => glob_match(glob, path),
            Rule::NameGlob(glob) => glob_match(glob, base_name(path)),
        }
    }
}

/// Decide whether `pattern` matches `path` (slash-normalized, root-relative).
pub fn matches(pattern: &str, path: &str) -> bool {
    Pattern::new(pattern).is_match(path)
}

/// Split a comma-separated pattern list, trimming whitespace and discarding
/// empty segments.
pub fn split_patterns(list: &str) -> Vec<String> {
    list.split(',').map(str::trim).filter(|part| !part.is_empty()).map(String::from).collect()
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

fn compile(pattern: &str) -> Option<GlobMatcher> {
    GlobBuilder::new(&collapse_stars(pattern))
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .ok()
}

/// Squash every run of `*` into one so globset never sees a recursive `**`.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

fn glob_match(glob: &Option<GlobMatcher>, candidate: &str) -> bool {
    glob.as_ref().is_some_and(|matcher| matcher.is_match(candidate))
}
