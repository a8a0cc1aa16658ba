//! Route definitions and path patterns
//!
//! A pattern is a `/`-separated list of segments where `:name` binds a
//! parameter, e.g. `/record/:id`.

use super::loader::ViewLoader;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt;

// Characters escaped when a param value is written back into a path
const PARAM_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Parameters bound from dynamic path segments
pub type RouteParams = BTreeMap<String, String>;

/// Unique name of a route
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteName(pub String);

impl RouteName {
    /// Create a new route name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for RouteName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, compared ASCII case-insensitively
    Static(String),
    /// Named parameter bound to whatever the location holds there
    Param(String),
}

/// Parsed path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/record/:id`
    ///
    /// Empty segments are dropped, so `/records/` and `/records` are the same
    /// pattern. A lone `:` is kept as literal text.
    pub fn parse(raw: &str) -> Self {
        let segments = split_segments(raw)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Static(segment.to_string()),
            })
            .collect();

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The pattern text as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters this pattern binds, in order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match a path (already stripped of base, query and fragment)
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) => {
                    if !text.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode_param(part));
                }
            }
        }
        Some(params)
    }

    /// Build a concrete path by filling in parameters
    ///
    /// Returns the name of the first missing parameter on failure.
    pub fn build(&self, params: &RouteParams) -> Result<String, String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        path.extend(utf8_percent_encode(value, PARAM_ENCODE_SET))
                    }
                    _ => return Err(name.clone()),
                },
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

// Invalid escapes or non UTF-8 bytes leave the segment as written
fn decode_param(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Route definition: pattern, name, deferred view and props flag
#[derive(Debug)]
pub struct Route<V> {
    /// Unique name for this route
    pub name: RouteName,
    /// Path pattern matched against locations
    pub pattern: PathPattern,
    /// Whether bound params are handed to the view as props
    pub props: bool,
    /// Deferred view for this route
    pub view: ViewLoader<V>,
    /// Optional description of what this route displays
    pub description: Option<String>,
}

impl<V> Route<V> {
    /// Create a new route
    pub fn new(path: &str, name: impl Into<RouteName>, view: ViewLoader<V>) -> Self {
        Self {
            name: name.into(),
            pattern: PathPattern::parse(path),
            props: false,
            view,
            description: None,
        }
    }

    /// Forward bound params to the view as props
    pub fn with_props(mut self) -> Self {
        self.props = true;
        self
    }

    /// Set the description for this route
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
