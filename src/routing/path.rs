//! Path values and scope-prefix resolution.
//!
//! # Responsibilities
//! - Model a path that inherits the enclosing mount prefix, escapes it, or is absent
//! - Join scope prefixes with route paths
//! - Insert a missing leading slash instead of rejecting the path
//!
//! # Design Decisions
//! - Unscoped values are returned verbatim, never normalized
//! - Absent resolves to `None`, never to an empty string
//! - Joining is segment-wise: duplicate and trailing slashes collapse

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// A path as written at a declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PathValue {
    /// Inherits the enclosing mount prefix.
    Scoped(String),
    /// Literal path, ignores the enclosing scope.
    Unscoped(String),
    /// No path.
    #[default]
    Absent,
}

impl PathValue {
    pub fn scoped(path: impl Into<String>) -> Self {
        PathValue::Scoped(path.into())
    }

    pub fn unscoped(path: impl Into<String>) -> Self {
        PathValue::Unscoped(path.into())
    }
}

// TOML forms: "/x" (scoped), { scoped = "/x" }, { unscoped = "/x" }, false (absent).
#[derive(Deserialize)]
#[serde(untagged)]
enum PathRepr {
    Plain(String),
    Flag(bool),
    Tagged(TaggedPath),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedPath {
    Scoped(String),
    Unscoped(String),
}

impl<'de> Deserialize<'de> for PathValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PathRepr::deserialize(deserializer)? {
            PathRepr::Plain(path) => Ok(PathValue::Scoped(path)),
            PathRepr::Flag(false) => Ok(PathValue::Absent),
            PathRepr::Flag(true) => Err(de::Error::custom(
                "a path must be a string, a { scoped | unscoped } table or `false`",
            )),
            PathRepr::Tagged(TaggedPath::Scoped(path)) => Ok(PathValue::Scoped(path)),
            PathRepr::Tagged(TaggedPath::Unscoped(path)) => Ok(PathValue::Unscoped(path)),
        }
    }
}

/// Host-router primitive computing a path relative to the enclosing scope.
pub trait ScopePath {
    fn scoped_path(&self, path: &str) -> String;
}

/// Stack of mount prefixes currently in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountScope {
    prefixes: Vec<String>,
}

impl MountScope {
    /// The root scope (no prefix).
    pub fn root() -> Self {
        Self::default()
    }

    /// A new scope nested under this one.
    pub fn nest(&self, prefix: impl Into<String>) -> Self {
        let mut prefixes = self.prefixes.clone();
        prefixes.push(prefix.into());
        Self { prefixes }
    }

    /// The combined prefix of this scope, `/` at the root.
    pub fn prefix(&self) -> String {
        join_segments(self.prefixes.iter().map(String::as_str))
    }
}

impl ScopePath for MountScope {
    fn scoped_path(&self, path: &str) -> String {
        join_segments(self.prefixes.iter().map(String::as_str).chain(std::iter::once(path)))
    }
}

/// Join path pieces segment-wise into an absolute path.
pub fn join_segments<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let segments: Vec<&str> = parts
        .into_iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();

    format!("/{}", segments.join("/"))
}

/// Resolve a path value against the enclosing scope.
pub fn resolve_path(value: &PathValue, scope: &dyn ScopePath) -> Option<String> {
    match value {
        PathValue::Absent => None,
        PathValue::Unscoped(path) => Some(path.clone()),
        PathValue::Scoped(path) => Some(scope.scoped_path(path)),
    }
}
