//! Attribute-value type synthesis and the registry holding the results.
//!
//! Synthesis happens once per host type during application startup. The
//! registry is an ordinary value owned by the application and passed to
//! whatever needs it (schema installation, stores, forms); there is no
//! ambient global.

use super::definition::{AttrValueType, IndexDefinition, TableDefinition};
use super::host::{AttrHost, HostDescriptor};
use super::tables::{ATTRIBUTE_TABLE, ATTR_VALUE_UNIQUE, CHOICE_TABLE, UNIT_TABLE};
use crate::config::AttrSettings;
use crate::utils::is_valid_identifier;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Caller overrides for a synthesized type
///
/// Unset fields fall back to [`AttrSettings`] derived defaults. Constraints and
/// indexes are added to the defaults, never replacing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrValueOptions {
    pub class_name: Option<String>,
    pub related_name: Option<String>,
    pub table_name: Option<String>,
    pub unique_together: Vec<Vec<String>>,
    pub indexes: Vec<IndexDefinition>,
    pub table_comment: Option<String>,
}

impl AttrValueOptions {
    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    pub fn related_name(mut self, name: impl Into<String>) -> Self {
        self.related_name = Some(name.into());
        self
    }

    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn unique_together(mut self, columns: &[&str]) -> Self {
        self.unique_together
            .push(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn table_comment(mut self, comment: impl Into<String>) -> Self {
        self.table_comment = Some(comment.into());
        self
    }
}

/// Synthesis refused; application startup should stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Abstract host types have no table to reference
    AbstractHost(String),
    /// The host already has a synthesized type
    AlreadySynthesized { host: String, class_name: String },
    /// Another host's type already uses this class name
    DuplicateClassName(String),
    /// The table is already taken by another type or by the catalog
    DuplicateTableName { table: String, owner: String },
    /// Generated or supplied name is not a usable identifier
    InvalidName { kind: &'static str, name: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::AbstractHost(host) => write!(
                f,
                "Cannot create attribute value type for abstract type '{host}'"
            ),
            ConfigurationError::AlreadySynthesized { host, class_name } => write!(
                f,
                "Type '{host}' already has attribute value type '{class_name}'"
            ),
            ConfigurationError::DuplicateClassName(name) => {
                write!(f, "Attribute value type '{name}' is already registered")
            }
            ConfigurationError::DuplicateTableName { table, owner } => {
                write!(f, "Table {table} is already used by '{owner}'")
            }
            ConfigurationError::InvalidName { kind, name } => {
                write!(f, "Invalid {kind} '{name}'")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Registry of synthesized attribute-value types
///
/// Types are keyed by generated class name; further indexes map host type
/// names and qualified table names to their class. Synthesizing twice for
/// the same host is rejected, as is reusing a class or table name.
#[derive(Debug, Default)]
pub struct AttrTypeRegistry {
    settings: AttrSettings,
    types: BTreeMap<String, Arc<AttrValueType>>,
    by_host: BTreeMap<String, String>,
    by_table: BTreeMap<String, String>,
}

impl AttrTypeRegistry {
    pub fn new(settings: AttrSettings) -> Self {
        Self {
            settings,
            types: BTreeMap::new(),
            by_host: BTreeMap::new(),
            by_table: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &AttrSettings {
        &self.settings
    }

    /// Synthesize and register the attribute-value type for `host`
    ///
    /// Class name defaults to `<TypeName><class_suffix>`, table name to
    /// `<host_table><table_suffix>` and related name to the configured one.
    /// Schema, tablespace and the managed flag are copied from the host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the host is abstract or already has a
    /// type, if the class or table name is taken, or if a name is not a
    /// valid identifier.
    pub fn synthesize(
        &mut self,
        host: &HostDescriptor,
        options: AttrValueOptions,
    ) -> Result<Arc<AttrValueType>, ConfigurationError> {
        #[cfg(feature = "tracing")]
        let _span = crate::tracing_helpers::synthesize_span(&host.type_name).entered();

        if host.is_abstract {
            return Err(ConfigurationError::AbstractHost(host.type_name.clone()));
        }
        if let Some(existing) = self.by_host.get(&host.type_name) {
            return Err(ConfigurationError::AlreadySynthesized {
                host: host.type_name.clone(),
                class_name: existing.clone(),
            });
        }

        let class_name = options
            .class_name
            .unwrap_or_else(|| format!("{}{}", host.type_name, self.settings.class_suffix));
        let table_name = options
            .table_name
            .unwrap_or_else(|| format!("{}{}", host.table_name, self.settings.table_suffix));
        let related_name = options
            .related_name
            .unwrap_or_else(|| self.settings.related_name.clone());

        for (kind, name) in [
            ("class name", &class_name),
            ("table name", &table_name),
            ("related name", &related_name),
        ] {
            if !is_valid_identifier(name) {
                return Err(ConfigurationError::InvalidName {
                    kind,
                    name: name.clone(),
                });
            }
        }
        if self.types.contains_key(&class_name) {
            return Err(ConfigurationError::DuplicateClassName(class_name));
        }

        let mut definition = TableDefinition::default();
        for columns in &options.unique_together {
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            definition.add_unique(&columns);
        }
        definition.add_unique(&ATTR_VALUE_UNIQUE);
        definition.indexes = options.indexes;

        let ty = Arc::new(AttrValueType {
            class_name: class_name.clone(),
            related_name,
            host: host.clone(),
            table_name,
            definition,
            comment: options.table_comment,
        });

        let qualified_table = ty.qualified_table_name();
        if let Some(owner) = self.by_table.get(&qualified_table) {
            return Err(ConfigurationError::DuplicateTableName {
                table: qualified_table,
                owner: owner.clone(),
            });
        }
        if ty.schema_name().is_none()
            && [UNIT_TABLE, ATTRIBUTE_TABLE, CHOICE_TABLE].contains(&ty.table_name())
        {
            return Err(ConfigurationError::DuplicateTableName {
                table: qualified_table,
                owner: "attribute catalog".to_string(),
            });
        }

        log::info!(
            "Synthesized attribute value type {} for {} (table {})",
            ty.class_name,
            host.type_name,
            ty.table_name
        );
        self.by_host.insert(host.type_name.clone(), class_name.clone());
        self.by_table.insert(qualified_table, class_name.clone());
        self.types.insert(class_name, Arc::clone(&ty));
        Ok(ty)
    }

    /// Synthesize the type for a host deriving [`AttrHost`]
    ///
    /// # Errors
    ///
    /// See [`synthesize`](Self::synthesize).
    pub fn register<H: AttrHost>(
        &mut self,
        options: AttrValueOptions,
    ) -> Result<Arc<AttrValueType>, ConfigurationError> {
        self.synthesize(&H::descriptor(), options)
    }

    /// Look up by generated class name
    pub fn get(&self, class_name: &str) -> Option<Arc<AttrValueType>> {
        self.types.get(class_name).cloned()
    }

    /// Look up by host type name
    pub fn for_host(&self, type_name: &str) -> Option<Arc<AttrValueType>> {
        self.by_host
            .get(type_name)
            .and_then(|class_name| self.get(class_name))
    }

    /// Registered types, ordered by class name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttrValueType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Forget every registered type
    pub fn clear(&mut self) {
        self.types.clear();
        self.by_host.clear();
        self.by_table.clear();
    }
}
