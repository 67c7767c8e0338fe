//! # Lifeguard MAV
//!
//! Model-Attribute-Value extension for Lifeguard: record types opt in with
//! `#[derive(AttrHost)]` and gain an admin-editable set of typed attributes,
//! stored as raw text in a per-host table and coerced on read.
//!
//! - [`value_type`]: the six value types and their text grammar
//! - [`catalog`]: units, attributes and choices
//! - [`schema`]: host descriptors, attribute-value type synthesis, DDL
//! - [`store`]: in-memory and PostgreSQL persistence
//! - [`form`]: field descriptors and submission handling
//!
//! See [README on GitHub](https://github.com/microscaler/lifeguard)

// Lets `#[derive(AttrHost)]` output resolve inside this crate's own tests
extern crate self as lifeguard_mav;

pub mod attr_value;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod form;
pub mod schema;
pub mod store;
pub mod utils;
pub mod value_type;

#[cfg(feature = "tracing")]
mod tracing_helpers;

pub use attr_value::AttrValue;
pub use catalog::{Attribute, Catalog, Choice, ChoiceOption, NewAttribute, NewChoice, NewUnit, Unit};
pub use config::{AttrSettings, DatabaseConfig, MavConfig};
pub use connection::{connect, connect_executor, ConnectionError};
pub use error::StoreError;
pub use executor::{ExecError, MayPostgresExecutor, SqlExecutor, Violation};
pub use schema::{
    AttrHost, AttrTypeRegistry, AttrValueOptions, AttrValueType, ConfigurationError,
    HostDescriptor, IndexDefinition, SchemaManager,
};
pub use store::{AttrStore, MemoryStore, PgStore};
pub use value_type::{ParseError, TypedValue, ValueType};

/// Derive macro implementing [`AttrHost`]
pub use lifeguard_mav_derive::AttrHost;
