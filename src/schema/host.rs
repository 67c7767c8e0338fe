//! Host record types: the models that opt in to attributes.

use super::synthesizer::AttrTypeRegistry;
use super::AttrValueType;
use std::sync::Arc;

/// Description of a host record type, as far as attribute storage cares
///
/// Usually produced by `#[derive(AttrHost)]`, but can be built by hand for
/// types whose table layout is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDescriptor {
    /// Rust type name, e.g. `Product`
    pub type_name: String,
    /// Table holding host rows
    pub table_name: String,
    /// Primary key column of the host table (BIGINT)
    pub pk_column: String,
    pub schema_name: Option<String>,
    pub tablespace: Option<String>,
    /// `false` when the host table is maintained outside this application
    pub managed: bool,
    /// Abstract models have no table of their own and cannot host attributes
    pub is_abstract: bool,
}

impl HostDescriptor {
    pub fn new(type_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            table_name: table_name.into(),
            pk_column: "id".to_string(),
            schema_name: None,
            tablespace: None,
            managed: true,
            is_abstract: false,
        }
    }

    pub fn pk_column(mut self, column: impl Into<String>) -> Self {
        self.pk_column = column.into();
        self
    }

    pub fn schema_name(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    pub fn tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }

    pub fn unmanaged(mut self) -> Self {
        self.managed = false;
        self
    }

    pub fn abstract_model(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// A record type that can carry attributes
///
/// ```
/// use lifeguard_mav::{AttrHost, AttrTypeRegistry, AttrValueOptions};
///
/// #[derive(AttrHost)]
/// #[table_name = "products"]
/// struct Product {
///     id: i64,
///     name: String,
/// }
///
/// let mut registry = AttrTypeRegistry::default();
/// let ty = registry.register::<Product>(AttrValueOptions::default()).unwrap();
/// assert_eq!(ty.class_name(), "ProductAttr");
/// assert_eq!(ty.table_name(), "products_attr");
/// ```
pub trait AttrHost {
    /// Storage description of this type
    fn descriptor() -> HostDescriptor;

    /// The attribute-value type synthesized for this host, if registered
    fn attr_value_type(registry: &AttrTypeRegistry) -> Option<Arc<AttrValueType>> {
        registry.for_host(&Self::descriptor().type_name)
    }
}
