//! Compiled path templates.
//!
//! # Responsibilities
//! - Compile `/news/:id`-style templates into segment lists
//! - Match a concrete path segment-by-segment, binding parameters
//! - Render the inverse: substitute parameters back into the template
//!
//! # Design Decisions
//! - No regex: literal and parameter segments only, O(n) matching
//! - Parameter segments match any single non-empty path segment
//! - Empty segments are ignored, so trailing slashes are insignificant

use std::collections::BTreeMap;

use thiserror::Error;

/// Parameters bound by a match, keyed by placeholder name.
pub type Params = BTreeMap<String, String>;

/// Errors raised while compiling or rendering a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// A template did not start with '/'.
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    /// A ':' segment had no name behind it.
    #[error("pattern '{0}' contains an unnamed ':' parameter")]
    EmptyParamName(String),

    /// The same parameter name appeared twice.
    #[error("pattern '{pattern}' binds parameter ':{name}' more than once")]
    DuplicateParam { pattern: String, name: String },

    /// Rendering was asked for a parameter the caller did not supply.
    #[error("pattern '{pattern}' requires parameter ':{name}'")]
    MissingParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
///
/// Compiled once at startup and reused for every request; matching and
/// rendering never allocate beyond the bound parameters.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a template string such as `/news/:id`.
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        }

        let mut segments = Vec::new();
        for piece in raw.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = piece.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(raw.to_string()));
                }
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(n) if n == name))
                {
                    return Err(PatternError::DuplicateParam {
                        pattern: raw.to_string(),
                        name: name.to_string(),
                    });
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(piece.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The original template string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the template binds no parameters.
    pub fn is_literal(&self) -> bool {
        !self
            .segments
            .iter()
            .any(|s| matches!(s, Segment::Param(_)))
    }

    /// Number of literal segments before the first parameter.
    pub fn literal_prefix_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Names of the parameters this template binds, in template order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match `path` against this template, binding parameters.
    ///
    /// Returns `None` on any mismatch; a miss is an ordinary outcome, not
    /// an error.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (expected, actual) in self.segments.iter().zip(segments) {
            match expected {
                Segment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), actual.to_string());
                }
            }
        }
        Some(params)
    }

    /// Substitute `params` into the template, producing a concrete path.
    pub fn render(&self, params: &Params) -> Result<String, PatternError> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Param(name) => {
                    let value =
                        params
                            .get(name)
                            .ok_or_else(|| PatternError::MissingParam {
                                pattern: self.raw.clone(),
                                name: name.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
