//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is a case-sensitive plain string prefix test
//! - No regex to guarantee O(n) matching
//! - Specificity is the prefix length; the router uses it for ordering

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` starts with this prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Longer prefixes are more specific.
    pub fn specificity(&self) -> usize {
        self.prefix.len()
    }
}
