//! Configuration for the model graph.

/// Configuration for a [`ModelGraph`](crate::ModelGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Maximum number of references followed when resolving a composite node.
    pub max_reference_depth: usize,
    /// Keep a failed initializer so a later `ensure_usable` runs it again.
    /// When false, the node is marked broken and fails fast from then on.
    pub retain_failed_initializers: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: 8,
            retain_failed_initializers: true,
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    pub fn with_retain_failed_initializers(mut self, retain: bool) -> Self {
        self.retain_failed_initializers = retain;
        self
    }

    /// No reference chains beyond one hop, and no second chance for initializers.
    pub fn strict() -> Self {
        Self {
            max_reference_depth: 1,
            retain_failed_initializers: false,
        }
    }
}
