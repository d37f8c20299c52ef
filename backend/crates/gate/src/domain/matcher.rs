//! Route Matcher
//!
//! Decides which requests the gate is invoked for at all. Patterns use the
//! familiar path syntax: literal segments, `:name` (one segment), `:name*`
//! (zero or more trailing segments) and `:name+` (one or more trailing
//! segments).

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    ZeroOrMore,
    OneOrMore,
}

/// A single parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if !pattern.starts_with('/') {
            return Err(ConfigError::InvalidPattern(pattern.to_string()));
        }

        let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (i, seg) in raw.iter().enumerate() {
            let is_last = i + 1 == raw.len();
            let parsed = match seg.strip_prefix(':') {
                None => Segment::Literal((*seg).to_string()),
                Some(name) => {
                    let (name, segment) = if let Some(name) = name.strip_suffix('*') {
                        (name, Segment::ZeroOrMore)
                    } else if let Some(name) = name.strip_suffix('+') {
                        (name, Segment::OneOrMore)
                    } else {
                        (name, Segment::Param)
                    };
                    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(ConfigError::InvalidPattern(pattern.to_string()));
                    }
                    // repeating segments only make sense at the tail
                    if !is_last && matches!(segment, Segment::ZeroOrMore | Segment::OneOrMore) {
                        return Err(ConfigError::InvalidPattern(pattern.to_string()));
                    }
                    segment
                }
            };
            segments.push(parsed);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::ZeroOrMore => return true,
                Segment::OneOrMore => return parts.len() > i,
                Segment::Param => {
                    if parts.get(i).is_none() {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if parts.get(i) != Some(&lit.as_str()) {
                        return false;
                    }
                }
            }
        }

        parts.len() == self.segments.len()
    }
}

/// Ordered set of patterns. An empty matcher with `any` set matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    patterns: Vec<PathPattern>,
    any: bool,
}

/// Patterns the gate runs on when nothing else is configured.
pub const DEFAULT_PATTERNS: [&str; 2] = ["/notes/:path*", "/api/summarize"];

impl Default for RouteMatcher {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| PathPattern::parse(p).ok())
                .collect(),
            any: false,
        }
    }
}

impl RouteMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            any: false,
        })
    }

    /// Matcher that invokes the gate for every request.
    pub fn all() -> Self {
        Self {
            patterns: Vec::new(),
            any: true,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.any || self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}
