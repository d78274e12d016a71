//! Hierarchical model paths.
//!
//! Provides [`ModelPath`] for addressing nodes in the model graph, e.g.
//! `model.toolchains.gcc.name`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a model path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty segment in model path")]
    EmptySegment,

    #[error("invalid segment in model path: {0}")]
    InvalidSegment(String),
}

/// Path of a node in the model graph.
///
/// The root path has no segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModelPath(Vec<String>);

impl ModelPath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a single segment.
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Get path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if not root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    /// Parent path, if not root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Append a segment, returning the new path.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Check if this path is a strict ancestor of another.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.0 == other.0[..self.0.len()]
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for ModelPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_' && c != '-') {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(segments))
    }
}
