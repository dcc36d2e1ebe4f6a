//! Mode-aware allow/deny decisions for single paths.

use std::fmt;

use super::core_ignores::{CORE_PATTERNS, CORE_SOURCE_PATTERNS};
use super::pattern::{split_patterns, Pattern};
use crate::domain::{Config, TreeMode};
use crate::utils::{base_name, normalize_path, size_in_mb};

const MATCH_EVERYTHING: &str = "**";

/// Why a path was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    OutputFile,
    Hidden,
    CoreIgnore(String),
    UserIgnore(String),
    NotIncluded,
    Excluded(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutputFile => write!(f, "destination file"),
            Rejection::Hidden => write!(f, "hidden"),
            Rejection::CoreIgnore(p) => write!(f, "core ignore '{}'", p),
            Rejection::UserIgnore(p) => write!(f, "ignore file pattern '{}'", p),
            Rejection::NotIncluded => write!(f, "no include pattern matched"),
            Rejection::Excluded(p) => write!(f, "exclude pattern '{}'", p),
        }
    }
}

#[derive(Debug, Clone)]
struct ModeRules {
    show_hidden: bool,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ModeRules {
    fn new(show_hidden: bool, include: &str, exclude: &str, global: &Config) -> Self {
        let include =
            first_non_empty(&[include, global.include.as_str()]).unwrap_or(MATCH_EVERYTHING);
        let exclude = first_non_empty(&[exclude, global.exclude.as_str()]).unwrap_or("");
        Self { show_hidden, include: compile_list(include), exclude: compile_list(exclude) }
    }
}

/// Immutable selection policy for one run.
///
/// Built once from the resolved [`Config`], the user ignore-file patterns and
/// the destination file name, then shared read-only by every walk.
#[derive(Debug, Clone)]
pub struct Policy {
    tree: ModeRules,
    source: ModeRules,
    core_ignores_enabled: bool,
    user_patterns: Vec<Pattern>,
    size_threshold_mb: f64,
    excluded_output_name: Option<String>,
}

impl Policy {
    pub fn new(config: &Config) -> Self {
        Self {
            tree: ModeRules::new(
                config.tree.show_hidden,
                &config.tree.include,
                &config.tree.exclude,
                config,
            ),
            source: ModeRules::new(
                config.source.show_hidden,
                &config.source.include,
                &config.source.exclude,
                config,
            ),
            core_ignores_enabled: config.core_ignores,
            user_patterns: Vec::new(),
            size_threshold_mb: config.source.threshold_mb,
            excluded_output_name: None,
        }
    }

    /// Add patterns loaded from ignore files, keeping their order.
    pub fn with_user_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.user_patterns.extend(
            patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .map(|p| Pattern::new(&p)),
        );
        self
    }

    /// Always reject files whose base name equals the destination's base name.
    pub fn excluding_output(mut self, output: Option<&str>) -> Self {
        self.excluded_output_name = output
            .map(|name| base_name(&normalize_path(name)).to_string())
            .filter(|name| !name.is_empty());
        self
    }

    pub fn user_patterns(&self) -> impl Iterator<Item = &str> {
        self.user_patterns.iter().map(Pattern::as_str)
    }

    pub fn size_threshold_mb(&self) -> f64 {
        self.size_threshold_mb
    }

    /// Source-mode size limit; a file of exactly the threshold still passes.
    pub fn exceeds_threshold(&self, size: u64) -> bool {
        size_in_mb(size) > self.size_threshold_mb
    }

    pub fn is_allowed(&self, path: &str, mode: TreeMode) -> bool {
        match self.rejection(path, mode) {
            None => true,
            Some(reason) => {
                tracing::trace!(path, %mode, %reason, "rejected");
                false
            }
        }
    }

    /// First rule that rejects `path` in `mode`, or `None` if it is allowed.
    pub fn rejection(&self, path: &str, mode: TreeMode) -> Option<Rejection> {
        let normalized = normalize_path(path);
        let name = base_name(&normalized);

        if self.excluded_output_name.as_deref() == Some(name) {
            return Some(Rejection::OutputFile);
        }

        let rules = self.rules(mode);
        if !rules.show_hidden && (is_hidden(&normalized) || is_hidden(name)) {
            return Some(Rejection::Hidden);
        }

        if self.core_ignores_enabled {
            let source_only: &[Pattern] = match mode {
                TreeMode::Source => CORE_SOURCE_PATTERNS.as_slice(),
                TreeMode::Tree => &[],
            };
            if let Some(p) =
                CORE_PATTERNS.iter().chain(source_only).find(|p| p.is_match(&normalized))
            {
                return Some(Rejection::CoreIgnore(p.as_str().to_string()));
            }
        }

        if let Some(p) = self.user_patterns.iter().find(|p| p.is_match(&normalized)) {
            return Some(Rejection::UserIgnore(p.as_str().to_string()));
        }

        if !rules.include.iter().any(|p| p.is_match(&normalized)) {
            return Some(Rejection::NotIncluded);
        }

        if let Some(p) = rules.exclude.iter().find(|p| p.is_match(&normalized)) {
            return Some(Rejection::Excluded(p.as_str().to_string()));
        }

        None
    }

    fn rules(&self, mode: TreeMode) -> &ModeRules {
        match mode {
            TreeMode::Tree => &self.tree,
            TreeMode::Source => &self.source,
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|c| !c.is_empty())
}

fn compile_list(list: &str) -> Vec<Pattern> {
    split_patterns(list).iter().map(|p| Pattern::new(p)).collect()
}
