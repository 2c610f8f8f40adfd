//! Name paths: the hierarchical identifiers fields register under.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// PathSegment
// ---------------------------------------------------------------------------

/// One step of a [`NamePath`]: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    /// The key, if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    /// The index, if this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(_) => None,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

// ---------------------------------------------------------------------------
// NamePath
// ---------------------------------------------------------------------------

/// An ordered sequence of [`PathSegment`]s identifying a value in the form.
///
/// `["contacts", 2, "email"]` addresses the `email` key of the third entry of
/// the `contacts` list. An empty path addresses nothing and is never
/// registered with the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NamePath(Vec<PathSegment>);

impl NamePath {
    /// An empty path.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a path from segments, in order.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<PathSegment>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// A single-key path.
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.0.iter()
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// A new path: `self` followed by every segment of `other`.
    ///
    /// Segments are appended in order; nothing is merged or reordered.
    pub fn join(&self, other: &NamePath) -> Self {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.0);
        segments.extend_from_slice(&other.0);
        Self(segments)
    }

    /// Whether `prefix` is a (non-strict) prefix of this path.
    pub fn starts_with(&self, prefix: &NamePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The remainder after removing `prefix`, or `None` if it is not a prefix.
    pub fn strip_prefix(&self, prefix: &NamePath) -> Option<NamePath> {
        self.0
            .strip_prefix(prefix.0.as_slice())
            .map(|rest| NamePath(rest.to_vec()))
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl fmt::Display for NamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for NamePath {
    /// A single key. Dots are not interpreted; use `str::parse` for that.
    fn from(key: &str) -> Self {
        NamePath::key(key)
    }
}

impl From<String> for NamePath {
    fn from(key: String) -> Self {
        NamePath::key(key)
    }
}

impl From<usize> for NamePath {
    fn from(index: usize) -> Self {
        NamePath(vec![PathSegment::Index(index)])
    }
}

impl From<PathSegment> for NamePath {
    fn from(segment: PathSegment) -> Self {
        NamePath(vec![segment])
    }
}

impl From<Vec<PathSegment>> for NamePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        NamePath(segments)
    }
}

impl FromIterator<PathSegment> for NamePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        NamePath(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NamePath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Wire form: a string is one key, a number one index, an array a full path.
impl<'de> Deserialize<'de> for NamePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(PathSegment),
            Many(Vec<PathSegment>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(segment) => NamePath(vec![segment]),
            Raw::Many(segments) => NamePath(segments),
        })
    }
}

/// Build a [`NamePath`] from a list of keys and indices.
///
/// ```ignore
/// let path = name_path!["contacts", 2usize, "email"];
/// assert_eq!(path.to_string(), "contacts.2.email");
/// ```
#[macro_export]
macro_rules! name_path {
    () => {
        $crate::path::NamePath::new()
    };
    ($($segment:expr),+ $(,)?) => {
        $crate::path::NamePath::from(vec![$($crate::path::PathSegment::from($segment)),+])
    };
}
