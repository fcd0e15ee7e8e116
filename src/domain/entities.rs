//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Separator used when rendering a path for humans.
pub const PATH_SEPARATOR: &str = " > ";

/// Separator of the legacy stored format (`"Sweet:Chocolate"`).
pub const LEGACY_PATH_SEPARATOR: char = ':';

/// Root-to-node sequence of taxonomy names, inclusive of the target.
///
/// `["Sweet", "Chocolate", "Dark Chocolate"]` addresses "Dark Chocolate";
/// everything before the last element are its ancestors in tree order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The node this path addresses.
    pub fn target(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// All names before the target.
    pub fn ancestors(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Index of the target within the path (root category = 0).
    pub fn depth(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` is a proper prefix of `other`, i.e. `other` lies in
    /// the subtree below `self`.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Path extended by one child name.
    pub fn child(&self, name: impl Into<String>) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(name.into());
        NodePath(segments)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(PATH_SEPARATOR))
    }
}

impl FromStr for NodePath {
    type Err = DomainError;

    /// Accepts `"Sweet > Chocolate"` and the legacy `"Sweet:Chocolate"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = if s.contains('>') {
            s.split('>').map(|seg| seg.trim().to_string()).collect()
        } else {
            s.split(LEGACY_PATH_SEPARATOR)
                .map(|seg| seg.trim().to_string())
                .collect()
        };
        let segments: Vec<String> = segments.into_iter().filter(|seg| !seg.is_empty()).collect();
        if segments.is_empty() {
            return Err(DomainError::EmptyPath);
        }
        Ok(NodePath(segments))
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        NodePath(segments)
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One node of an externally supplied taxonomy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Taxonomy as delivered by the taxonomy collaborator.
///
/// The outer `name` labels the whole wheel (e.g. "Coffee") and is not itself
/// taggable; its children become the root categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    pub name: String,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// A selected name with its resolved root-to-node path, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub path: NodePath,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_arrow_separated_string_when_parsing_then_splits_segments() {
        let path: NodePath = "Sweet > Chocolate > Dark Chocolate".parse().unwrap();
        assert_eq!(path.segments(), ["Sweet", "Chocolate", "Dark Chocolate"]);
        assert_eq!(path.target(), Some("Dark Chocolate"));
        assert_eq!(path.depth(), Some(2));
    }

    #[test]
    fn given_legacy_colon_string_when_parsing_then_splits_segments() {
        let path: NodePath = "Sweet:Chocolate".parse().unwrap();
        assert_eq!(path, NodePath::new(["Sweet", "Chocolate"]));
    }

    #[test]
    fn given_blank_string_when_parsing_then_empty_path_error() {
        assert_eq!("  ".parse::<NodePath>(), Err(DomainError::EmptyPath));
    }

    #[test]
    fn given_parent_and_child_paths_when_comparing_then_prefix_is_strict() {
        let parent = NodePath::new(["Sweet"]);
        let child = parent.child("Chocolate");
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert!(!parent.is_prefix_of(&parent));
        assert_eq!(child.ancestors(), ["Sweet"]);
    }
}
