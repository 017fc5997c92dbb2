//! Route patterns with `<name>` captures.

use std::fmt;

use crate::router::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

/// A `/`-delimited path pattern such as `/users/<uid>/posts`.
///
/// ```
/// use tinyweb_rs::router::RoutePattern;
///
/// let pattern = RoutePattern::parse("/users/<uid>/posts/<pid>/comments").unwrap();
/// let captures = pattern.match_path("/users/1337/posts/42/comments").unwrap();
/// assert_eq!(captures.values(), vec!["1337", "42"]);
/// assert!(pattern.match_path("/users/1337/posts").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern. Empty patterns and patterns containing `?` are rejected.
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        if pattern.is_empty() || pattern.contains('?') {
            return Err(Error::InvalidPattern(pattern.to_string()));
        }

        let segments = pattern
            .split('/')
            .map(|segment| {
                match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                    Some(name) => Segment::Capture(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of capture segments.
    pub fn capture_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Capture(_)))
            .count()
    }

    /// Match a request path, returning the captures in pattern order.
    pub fn match_path(&self, path: &str) -> Option<PathCaptures> {
        let mut captures = Vec::new();
        let mut parts = path.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Capture(name) => captures.push((name.clone(), part.to_string())),
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(PathCaptures(captures))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Named captures from a successful match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCaptures(Vec<(String, String)>);

impl PathCaptures {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|(_, v)| v.as_str()).collect()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}
