//! Typed facades over managed instances.
//!
//! The [`managed!`](crate::managed) macro declares a Rust type for a managed
//! model type: a newtype over [`ManagedInstance`] with one getter and one
//! setter per property, plus the schema declaration for the type.

use crate::{FromPropertyValue, ManagedInstance};
use keel_core::ModelType;
use keel_schema::{SchemaResult, SchemaStoreBuilder};

/// A Rust type standing for a managed model type.
pub trait ManagedType: Sized + FromPropertyValue {
    /// Name of the model type.
    const TYPE_NAME: &'static str;

    /// Register the type's schema.
    fn declare(builder: &mut SchemaStoreBuilder) -> SchemaResult<ModelType>;

    fn from_instance(instance: ManagedInstance) -> Self;

    fn instance(&self) -> &ManagedInstance;

    fn model_type() -> ModelType {
        ModelType::new(Self::TYPE_NAME)
    }
}

/// Declare a typed facade for a managed model type.
///
/// ```ignore
/// managed! {
///     pub struct Toolchain: "Toolchain" {
///         name, set_name: Option<String> => "String";
///         version, set_version: Option<i64> => "Int";
///     }
/// }
/// ```
///
/// Each property line names the getter (which is also the property name),
/// the setter, the Rust type read back and the declared model type.
#[macro_export]
macro_rules! managed {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_name:literal {
            $(
                $(#[$prop_meta:meta])*
                $getter:ident, $setter:ident : $ty:ty => $prop_type:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name($crate::ManagedInstance);

        impl $crate::ManagedType for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn declare(
                builder: &mut $crate::__private::SchemaStoreBuilder,
            ) -> $crate::__private::SchemaResult<$crate::__private::ModelType> {
                builder
                    .add_managed($type_name)
                    $(.property(stringify!($getter), $prop_type))*
                    .done()
            }

            fn from_instance(instance: $crate::ManagedInstance) -> Self {
                $name(instance)
            }

            fn instance(&self) -> &$crate::ManagedInstance {
                &self.0
            }
        }

        impl $crate::FromPropertyValue for $name {
            const EXPECTED: &'static str = $type_name;

            fn from_property_value(
                value: $crate::PropertyValue,
            ) -> ::core::result::Result<Self, $crate::PropertyValue> {
                match value {
                    $crate::PropertyValue::Managed(instance)
                        if instance.model_type().name() == $type_name =>
                    {
                        Ok($name(instance))
                    }
                    other => Err(other),
                }
            }
        }

        impl ::core::convert::From<$name> for $crate::PropertyValue {
            fn from(value: $name) -> Self {
                $crate::PropertyValue::Managed(value.0)
            }
        }

        impl ::core::convert::From<&$name> for $crate::PropertyValue {
            fn from(value: &$name) -> Self {
                $crate::PropertyValue::Managed(value.0.clone())
            }
        }

        impl $name {
            $(
                $(#[$prop_meta])*
                pub fn $getter(
                    &self,
                    graph: &mut $crate::__private::ModelGraph,
                ) -> $crate::ViewResult<$ty> {
                    self.0.get_as(graph, stringify!($getter))
                }

                pub fn $setter(
                    &self,
                    graph: &mut $crate::__private::ModelGraph,
                    value: impl ::core::convert::Into<$crate::PropertyValue>,
                ) -> $crate::ViewResult<()> {
                    self.0.set(graph, stringify!($getter), value)
                }
            )*

            /// Human-readable description of the underlying node.
            pub fn display_name(&self) -> ::std::string::String {
                self.0.display_name()
            }
        }
    };
}
