//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile templates like `/handle-vars/{vars}` into literal and variable segments
//! - Match a request path against a compiled pattern, capturing variables
//! - Build a concrete path back from a pattern and variable values
//!
//! # Design Decisions
//! - Literal segments compare exactly (case-sensitive)
//! - A variable matches exactly one non-empty segment
//! - No regex constraints: `{name}` is the whole variable syntax
//! - Trailing slash is significant (`/a/` never matches `/a`)

use std::collections::HashSet;
use thiserror::Error;

use crate::routing::Vars;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern does not begin with `/`.
    #[error("Pattern `{template}` must start with '/'")]
    MissingLeadingSlash { template: String },

    /// Pattern contains `//`.
    #[error("Pattern `{template}` contains an empty segment")]
    EmptySegment { template: String },

    /// A segment opens a brace it never closes, or closes one it never opened.
    #[error("Pattern `{template}` has an unmatched brace in segment `{segment}`")]
    UnmatchedBrace { template: String, segment: String },

    /// Variable name is empty or not an identifier.
    #[error("Pattern `{template}` has an invalid variable name `{name}`")]
    InvalidVariableName { template: String, name: String },

    /// The same variable name appears twice.
    #[error("Pattern `{template}` declares variable `{name}` more than once")]
    DuplicateVariable { template: String, name: String },

    /// A variable is embedded inside literal text (e.g. `a{b}`).
    #[error("Pattern `{template}` mixes literal text and a variable in segment `{segment}`")]
    MixedSegment { template: String, segment: String },
}

/// Errors raised while building a path from a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// No route carries the requested name.
    #[error("No route named `{0}`")]
    UnknownRoute(String),

    /// A variable of the pattern was not given a value.
    #[error("Missing value for variable `{name}` in `{template}`")]
    MissingVariable { template: String, name: String },
}

/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
}

/// A compiled route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl Pattern {
    /// Compile a template string.
    ///
    /// `/` compiles to a pattern with no segments, which only matches `/`.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let (parts, trailing_slash) = split_path(template).ok_or_else(|| {
            PatternError::MissingLeadingSlash {
                template: template.to_string(),
            }
        })?;

        let mut seen = HashSet::new();
        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let segment = parse_segment(template, part)?;
            if let Segment::Variable(name) = &segment {
                if !seen.insert(name.clone()) {
                    return Err(PatternError::DuplicateVariable {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            trailing_slash,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Variable names in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a full path, returning the captured variables on success.
    ///
    /// Each segment is percent-decoded before comparison, so `/a%2Db`
    /// matches the literal `/a-b`. An encoded `/` stays inside its segment.
    pub fn matches(&self, path: &str) -> Option<Vars> {
        let (parts, trailing_slash) = split_path(path)?;
        if trailing_slash != self.trailing_slash || parts.len() != self.segments.len() {
            return None;
        }

        let mut vars = Vars::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if urlencoding::decode(part).ok()? != literal.as_str() {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part).ok()?;
                    vars.push(name.clone(), value.into_owned());
                }
            }
        }
        Some(vars)
    }

    /// Build a path by substituting `vars` into the pattern.
    ///
    /// Values are percent-encoded. Extra entries in `vars` are ignored.
    pub fn build(&self, vars: &[(&str, &str)]) -> Result<String, UrlError> {
        let mut path = String::with_capacity(self.template.len());
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Variable(name) => {
                    let value = vars
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| *value)
                        .filter(|value| !value.is_empty())
                        .ok_or_else(|| UrlError::MissingVariable {
                            template: self.template.clone(),
                            name: name.clone(),
                        })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        if self.segments.is_empty() || self.trailing_slash {
            path.push('/');
        }
        Ok(path)
    }
}

/// Split `/a/b/` into (`["a", "b"]`, trailing = true).
///
/// Returns `None` when the input does not start with `/`. Empty inner
/// segments are kept so callers can reject or mismatch them.
fn split_path(path: &str) -> Option<(Vec<&str>, bool)> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some((Vec::new(), false));
    }
    let (body, trailing) = match rest.strip_suffix('/') {
        Some(body) => (body, true),
        None => (rest, false),
    };
    Some((body.split('/').collect(), trailing))
}

fn parse_segment(template: &str, part: &str) -> Result<Segment, PatternError> {
    if part.is_empty() {
        return Err(PatternError::EmptySegment {
            template: template.to_string(),
        });
    }

    let opens = part.matches('{').count();
    let closes = part.matches('}').count();
    if opens == 0 && closes == 0 {
        return Ok(Segment::Literal(part.to_string()));
    }
    if opens != closes {
        return Err(PatternError::UnmatchedBrace {
            template: template.to_string(),
            segment: part.to_string(),
        });
    }

    let name = part
        .strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .ok_or_else(|| PatternError::MixedSegment {
            template: template.to_string(),
            segment: part.to_string(),
        })?;

    if name.contains('{') || name.contains('}') {
        return Err(PatternError::UnmatchedBrace {
            template: template.to_string(),
            segment: part.to_string(),
        });
    }
    if !is_identifier(name) {
        return Err(PatternError::InvalidVariableName {
            template: template.to_string(),
            name: name.to_string(),
        });
    }
    Ok(Segment::Variable(name.to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
