//! Group path type and hierarchy helpers
//!
//! Groups form a tree addressed by `/`-delimited paths. The root group is `/`
//! and every other group is reachable from it by appending segments:
//! `/`, `/org`, `/org/dept`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Parsed, validated group path
///
/// # Examples
///
/// ```
/// use fedpolicy_core::GroupPath;
///
/// let group = GroupPath::new("/org/dept").unwrap();
/// assert_eq!(group.depth(), 2);
/// assert_eq!(group.parent().unwrap().as_str(), "/org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupPath {
    /// Original path string
    raw: String,
    /// Parsed segments (empty for the root group)
    segments: Vec<String>,
}

impl GroupPath {
    /// Path of the root group
    pub const ROOT: &'static str = "/";

    /// Parses a group path
    ///
    /// The path must start with `/`, must not contain empty segments and must
    /// not end with `/` unless it is the root group itself.
    pub fn new(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(CoreError::invalid_group_path(path, "path cannot be empty"));
        }

        let Some(rest) = path.strip_prefix('/') else {
            return Err(CoreError::invalid_group_path(path, "path must start with '/'"));
        };

        if rest.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = rest.split('/').map(|s| s.to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(CoreError::invalid_group_path(path, "path segment cannot be empty"));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The root group `/`
    pub fn root() -> Self {
        Self {
            raw: Self::ROOT.to_string(),
            segments: Vec::new(),
        }
    }

    /// Returns the segments of this path
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the raw path string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of segments below the root (root is 0)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the top-level group, which has no parent
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last path segment, `None` for the root group
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// Returns the parent group if it exists
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        let parent_segments = &self.segments[..self.segments.len() - 1];
        Some(Self::from_segments(parent_segments.to_vec()))
    }

    /// Returns the immediate child with the given segment name
    pub fn child(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains('/') {
            return Err(CoreError::invalid_group_path(
                format!("{}/{}", self.raw.trim_end_matches('/'), segment),
                "child segment must be a single non-empty name",
            ));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self::from_segments(segments))
    }

    /// Checks if this group is an ancestor of another group (any depth)
    pub fn is_parent_of(&self, other: &GroupPath) -> bool {
        if self.segments.len() >= other.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(self_seg, other_seg)| self_seg == other_seg)
    }

    /// Checks if this group is a descendant of another group (any depth)
    pub fn is_child_of(&self, other: &GroupPath) -> bool {
        other.is_parent_of(self)
    }

    /// Checks if this group is exactly one level below another group
    pub fn is_immediate_child_of(&self, other: &GroupPath) -> bool {
        self.depth() == other.depth() + 1 && self.is_child_of(other)
    }

    /// Builds the chain of groups from the root down to this group
    ///
    /// `/org/dept` yields `["/", "/org", "/org/dept"]`.
    pub fn chain(&self) -> Vec<GroupPath> {
        (0..=self.segments.len())
            .map(|len| Self::from_segments(self.segments[..len].to_vec()))
            .collect()
    }

    fn from_segments(segments: Vec<String>) -> Self {
        let raw = format!("/{}", segments.join("/"));
        Self { raw, segments }
    }
}

impl Default for GroupPath {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for GroupPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for GroupPath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<GroupPath> for String {
    fn from(group: GroupPath) -> Self {
        group.raw
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
