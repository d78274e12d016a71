//! Schema definition types.

use indexmap::IndexMap;
use keel_core::{ModelType, Value};
use std::fmt;

/// Whether a type is a graph-backed composite or a plain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Composite type whose properties are themselves nodes in the graph.
    Managed,
    /// Plain value type stored as a leaf node's private data.
    Unmanaged,
}

impl SchemaKind {
    pub fn is_managed(&self) -> bool {
        matches!(self, SchemaKind::Managed)
    }
}

/// Built-in scalar value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Bool,
    List,
}

impl ScalarType {
    /// All built-in scalar types, registered in every schema store.
    pub const ALL: [ScalarType; 5] = [
        ScalarType::String,
        ScalarType::Int,
        ScalarType::Float,
        ScalarType::Bool,
        ScalarType::List,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Bool => "Bool",
            ScalarType::List => "List",
        }
    }

    pub fn model_type(&self) -> ModelType {
        ModelType::new(self.name())
    }

    /// Check whether a value can be stored under this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            // Null is an unset leaf
            (_, Value::Null) => true,
            (ScalarType::String, Value::String(_)) => true,
            (ScalarType::Int, Value::Int(_)) => true,
            // Int can be used where Float is expected
            (ScalarType::Float, Value::Float(_) | Value::Int(_)) => true,
            (ScalarType::Bool, Value::Bool(_)) => true,
            (ScalarType::List, Value::List(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed property of a managed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared type of the property.
    pub model_type: ModelType,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, model_type: impl Into<ModelType>) -> Self {
        Self {
            name: name.into(),
            model_type: model_type.into(),
        }
    }
}

/// Schema of a model type.
#[derive(Debug, Clone)]
pub struct Schema {
    model_type: ModelType,
    kind: SchemaKind,
    /// Declared properties in declaration order; empty for unmanaged types.
    properties: IndexMap<String, PropertyDescriptor>,
    /// Value constraint for unmanaged types; `None` accepts any value.
    scalar: Option<ScalarType>,
}

impl Schema {
    pub(crate) fn managed(
        model_type: ModelType,
        properties: IndexMap<String, PropertyDescriptor>,
    ) -> Self {
        Self {
            model_type,
            kind: SchemaKind::Managed,
            properties,
            scalar: None,
        }
    }

    pub(crate) fn unmanaged(model_type: ModelType, scalar: Option<ScalarType>) -> Self {
        Self {
            model_type,
            kind: SchemaKind::Unmanaged,
            properties: IndexMap::new(),
            scalar,
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> &IndexMap<String, PropertyDescriptor> {
        &self.properties
    }

    /// Get a property descriptor by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn scalar(&self) -> Option<ScalarType> {
        self.scalar
    }

    /// Check whether a plain value can be stored under this type.
    ///
    /// Managed types never accept plain values.
    pub fn accepts_value(&self, value: &Value) -> bool {
        match self.kind {
            SchemaKind::Managed => false,
            SchemaKind::Unmanaged => self.scalar.map_or(true, |s| s.accepts(value)),
        }
    }
}
