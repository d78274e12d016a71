//! Type and rule descriptors.

use std::fmt;
use std::sync::Arc;

/// Descriptor of a model type, identified by name.
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelType(Arc<str>);

impl ModelType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Describes the rule that requested a view, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleDescriptor(Arc<str>);

impl RuleDescriptor {
    pub fn new(display_name: impl AsRef<str>) -> Self {
        Self(Arc::from(display_name.as_ref()))
    }

    pub fn display_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleDescriptor {
    fn from(display_name: &str) -> Self {
        Self::new(display_name)
    }
}
