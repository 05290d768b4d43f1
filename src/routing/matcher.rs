//! Method and prefix matching.
//!
//! # Responsibilities
//! - Match the request method against a route's method set
//! - Match and strip a subrouter's path prefix
//!
//! # Design Decisions
//! - Empty method set = any method (wildcard)
//! - Method comparison is exact (`GET` does not imply `HEAD`)
//! - Prefix matching is case-sensitive and stops at segment boundaries,
//!   so `/sub` matches `/sub` and `/sub/one` but not `/subway`

use axum::http::Method;

use crate::routing::RouteError;

/// Matches the request method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodMatcher {
    methods: Vec<Method>,
}

impl MethodMatcher {
    /// Create a method matcher. Duplicates are dropped, order is kept.
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut unique: Vec<Method> = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        Self { methods: unique }
    }

    /// Returns true if `method` is allowed.
    pub fn matches(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

/// Matches and strips a literal path prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a prefix matcher.
    ///
    /// The prefix must start with `/` and may not contain braces or empty
    /// segments. A trailing `/` is dropped, so `/` becomes the empty prefix.
    pub fn new(prefix: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &'static str| RouteError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason,
        };

        let rest = prefix
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.contains('{') || rest.contains('}') {
            return Err(invalid("variables are not supported in prefixes"));
        }
        if !rest.is_empty() && rest.split('/').any(str::is_empty) {
            return Err(invalid("contains an empty segment"));
        }

        let normalized = if rest.is_empty() {
            String::new()
        } else {
            format!("/{}", rest)
        };
        Ok(Self { prefix: normalized })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strip the prefix from `path`, returning the remaining suffix.
    ///
    /// Compared segment by segment on the percent-decoded path; the suffix
    /// is returned still encoded.
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        let mut rest = path;
        for expected in self.prefix.split('/').skip(1) {
            let after = rest.strip_prefix('/')?;
            let end = after.find('/').unwrap_or(after.len());
            if urlencoding::decode(&after[..end]).ok()? != expected {
                return None;
            }
            rest = &after[end..];
        }
        Some(rest)
    }
}
