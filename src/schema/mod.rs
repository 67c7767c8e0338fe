//! Host descriptors, attribute-value type synthesis and DDL.
//!
//! A host type opts in to attributes (usually with `#[derive(AttrHost)]`), and
//! [`AttrTypeRegistry::synthesize`] produces its [`AttrValueType`]: the
//! description of a table linking host rows to attributes. [`SchemaManager`]
//! turns registered types into tables.

pub mod definition;
pub mod host;
pub mod manager;
pub mod synthesizer;
pub mod tables;

pub use definition::{AttrValueType, IndexDefinition, TableDefinition};
pub use host::{AttrHost, HostDescriptor};
pub use manager::SchemaManager;
pub use synthesizer::{AttrTypeRegistry, AttrValueOptions, ConfigurationError};
