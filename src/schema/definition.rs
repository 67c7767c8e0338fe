//! Table definition metadata and the synthesized attribute-value type.
//!
//! `TableDefinition` stores table-level metadata (composite unique constraints
//! and indexes). `AttrValueType` is what the synthesizer produces for a host:
//! a concrete storage-backed record type described as data, rendered to DDL
//! with sea-query.

use super::host::HostDescriptor;
use crate::attr_value::VALUE_MAX_LENGTH;
use super::tables::{ATTRIBUTE_TABLE, ATTR_VALUE_UNIQUE};
use sea_query::{
    Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, IntoTableRef,
    PostgresQueryBuilder, Table, TableCreateStatement, TableDropStatement, TableRef,
};

/// Table definition metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDefinition {
    /// Composite unique constraints (multi-column unique)
    /// Each entry is a vector of column names
    pub composite_unique: Vec<Vec<String>>,
    /// Non-unique or unique secondary indexes
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Add a composite unique constraint unless an identical one is present
    pub fn add_unique(&mut self, columns: &[&str]) {
        let columns: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        if !self.composite_unique.contains(&columns) {
            self.composite_unique.push(columns);
        }
    }
}

/// Index definition metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Index name
    pub name: String,
    /// Column names (for composite indexes)
    pub columns: Vec<String>,
    /// Whether this is a unique index
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// A synthesized attribute-value record type
///
/// One exists per host type. Rows link a host instance (`object_id`) to an
/// attribute (`attribute_id`) and hold the raw text `value`; there is at most
/// one row per `(attribute_id, object_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrValueType {
    pub(crate) class_name: String,
    pub(crate) related_name: String,
    pub(crate) host: HostDescriptor,
    pub(crate) table_name: String,
    pub(crate) definition: TableDefinition,
    pub(crate) comment: Option<String>,
}

impl AttrValueType {
    /// Generated type name, e.g. `ProductAttr`
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Name the host uses to reach its values, e.g. `attrs`
    pub fn related_name(&self) -> &str {
        &self.related_name
    }

    pub fn host(&self) -> &HostDescriptor {
        &self.host
    }

    /// Storage table, e.g. `product_attr`
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Schema shared with the host table
    pub fn schema_name(&self) -> Option<&str> {
        self.host.schema_name.as_deref()
    }

    /// Tablespace shared with the host table
    pub fn tablespace(&self) -> Option<&str> {
        self.host.tablespace.as_deref()
    }

    /// Whether this application creates and drops the table
    pub fn managed(&self) -> bool {
        self.host.managed
    }

    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    /// Composite unique constraints, always including `(attribute_id, object_id)`
    pub fn unique_together(&self) -> &[Vec<String>] {
        &self.definition.composite_unique
    }

    pub fn table_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// `COMMENT ON TABLE` SQL when a comment was configured
    pub fn comment_sql(&self) -> Option<String> {
        self.comment.as_ref().map(|comment| {
            format!(
                "COMMENT ON TABLE {} IS '{}'",
                self.qualified_table_name(),
                comment.replace('\'', "''")
            )
        })
    }

    /// Table name qualified with the schema, as used in SQL text
    pub fn qualified_table_name(&self) -> String {
        match self.schema_name() {
            Some(schema) => format!("\"{}\".\"{}\"", schema, self.table_name),
            None => format!("\"{}\"", self.table_name),
        }
    }

    /// Name of the foreign key from `attribute_id` to the catalog
    pub fn attribute_fk_name(&self) -> String {
        format!("{}_attribute_id_fk", self.table_name)
    }

    /// Name of the foreign key from `object_id` to the host table
    pub fn object_fk_name(&self) -> String {
        format!("{}_object_id_fk", self.table_name)
    }

    fn table_ref(&self) -> TableRef {
        qualified(self.schema_name(), &self.table_name)
    }

    /// `CREATE TABLE` statement for this type
    ///
    /// The host reference and the attribute reference both cascade on delete.
    pub fn create_table_statement(&self) -> TableCreateStatement {
        let mut table = Table::create();
        table
            .table(self.table_ref())
            .if_not_exists()
            .col(
                ColumnDef::new(Alias::new("id"))
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Alias::new("attribute_id")).big_integer().not_null())
            .col(ColumnDef::new(Alias::new("object_id")).big_integer().not_null())
            .col(
                ColumnDef::new(Alias::new("value"))
                    .string_len(VALUE_MAX_LENGTH as u32)
                    .not_null()
                    .default(""),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(self.attribute_fk_name())
                    .from(self.table_ref(), Alias::new("attribute_id"))
                    .to(qualified(None, ATTRIBUTE_TABLE), Alias::new("id"))
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name(self.object_fk_name())
                    .from(self.table_ref(), Alias::new("object_id"))
                    .to(
                        qualified(self.schema_name(), &self.host.table_name),
                        Alias::new(self.host.pk_column.as_str()),
                    )
                    .on_delete(ForeignKeyAction::Cascade),
            );

        for (i, columns) in self.definition.composite_unique.iter().enumerate() {
            let name = if is_attr_value_unique(columns) {
                format!("{}_attribute_id_object_id_uniq", self.table_name)
            } else {
                format!("{}_uniq_{}", self.table_name, i)
            };
            let mut index = Index::create();
            index.name(name).unique();
            for column in columns {
                index.col(Alias::new(column.as_str()));
            }
            table.index(&mut index);
        }

        table.to_owned()
    }

    /// `CREATE TABLE` SQL, including the `TABLESPACE` clause when set
    pub fn create_table_sql(&self) -> String {
        let mut sql = self.create_table_statement().to_string(PostgresQueryBuilder);
        if let Some(tablespace) = self.tablespace() {
            sql.push_str(&format!(" TABLESPACE \"{tablespace}\""));
        }
        sql
    }

    /// `CREATE INDEX` statements for the secondary indexes
    pub fn index_statements(&self) -> Vec<IndexCreateStatement> {
        self.definition
            .indexes
            .iter()
            .map(|def| {
                let mut index = Index::create();
                index
                    .name(def.name.as_str())
                    .table(self.table_ref())
                    .if_not_exists();
                if def.unique {
                    index.unique();
                }
                for column in &def.columns {
                    index.col(Alias::new(column.as_str()));
                }
                index.to_owned()
            })
            .collect()
    }

    /// `DROP TABLE` statement for this type
    pub fn drop_table_statement(&self) -> TableDropStatement {
        Table::drop().table(self.table_ref()).if_exists().to_owned()
    }
}

fn is_attr_value_unique(columns: &[String]) -> bool {
    columns.len() == ATTR_VALUE_UNIQUE.len()
        && columns.iter().zip(ATTR_VALUE_UNIQUE.iter()).all(|(a, b)| a == b)
}

pub(crate) fn qualified(schema: Option<&str>, table: &str) -> TableRef {
    match schema {
        Some(schema) => (Alias::new(schema), Alias::new(table)).into_table_ref(),
        None => Alias::new(table).into_table_ref(),
    }
}
