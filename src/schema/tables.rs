//! DDL for the catalog tables shared by every host: `unit`, `attribute`, `choice`.

use crate::utils::SLUG_MAX_LENGTH;
use sea_query::{
    Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, Table,
    TableCreateStatement, TableDropStatement,
};

pub const UNIT_TABLE: &str = "unit";
pub const ATTRIBUTE_TABLE: &str = "attribute";
pub const CHOICE_TABLE: &str = "choice";

/// Columns of the one-value-per-attribute-per-object constraint
pub const ATTR_VALUE_UNIQUE: [&str; 2] = ["attribute_id", "object_id"];

fn id_column() -> ColumnDef {
    ColumnDef::new(Alias::new("id"))
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// `unit(id, name, symbol)`
pub fn unit_table() -> TableCreateStatement {
    Table::create()
        .table(Alias::new(UNIT_TABLE))
        .if_not_exists()
        .col(id_column())
        .col(ColumnDef::new(Alias::new("name")).string_len(100).not_null())
        .col(
            ColumnDef::new(Alias::new("symbol"))
                .string_len(10)
                .not_null()
                .default(""),
        )
        .to_owned()
}

/// `attribute(id, slug UNIQUE, name, type SMALLINT, unit_id NULL)`
///
/// Deleting a unit clears `unit_id` on the attributes that used it.
pub fn attribute_table() -> TableCreateStatement {
    Table::create()
        .table(Alias::new(ATTRIBUTE_TABLE))
        .if_not_exists()
        .col(id_column())
        .col(
            ColumnDef::new(Alias::new("slug"))
                .string_len(SLUG_MAX_LENGTH as u32)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Alias::new("name"))
                .string_len(100)
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(Alias::new("type")).small_integer().not_null())
        .col(ColumnDef::new(Alias::new("unit_id")).big_integer().null())
        .foreign_key(
            ForeignKey::create()
                .name("attribute_unit_id_fk")
                .from(Alias::new(ATTRIBUTE_TABLE), Alias::new("unit_id"))
                .to(Alias::new(UNIT_TABLE), Alias::new("id"))
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

/// `choice(id, attribute_id, value, name, description, sort_order)`
///
/// Choices go away with their attribute.
pub fn choice_table() -> TableCreateStatement {
    Table::create()
        .table(Alias::new(CHOICE_TABLE))
        .if_not_exists()
        .col(id_column())
        .col(ColumnDef::new(Alias::new("attribute_id")).big_integer().not_null())
        .col(
            ColumnDef::new(Alias::new("value"))
                .string_len(100)
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Alias::new("name"))
                .string_len(100)
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Alias::new("description"))
                .text()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Alias::new("sort_order"))
                .integer()
                .not_null()
                .default(0),
        )
        .foreign_key(
            ForeignKey::create()
                .name("choice_attribute_id_fk")
                .from(Alias::new(CHOICE_TABLE), Alias::new("attribute_id"))
                .to(Alias::new(ATTRIBUTE_TABLE), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

/// Index backing the `(attribute_id, sort_order)` choice ordering
pub fn choice_ordering_index() -> IndexCreateStatement {
    Index::create()
        .name("choice_ordering_idx")
        .table(Alias::new(CHOICE_TABLE))
        .col(Alias::new("attribute_id"))
        .col(Alias::new("sort_order"))
        .if_not_exists()
        .to_owned()
}

/// Core tables in dependency order
pub fn core_tables() -> Vec<TableCreateStatement> {
    vec![unit_table(), attribute_table(), choice_table()]
}

/// Drop statements for the core tables, dependents first
pub fn drop_core_tables() -> Vec<TableDropStatement> {
    [CHOICE_TABLE, ATTRIBUTE_TABLE, UNIT_TABLE]
        .iter()
        .map(|name| Table::drop().table(Alias::new(*name)).if_exists().to_owned())
        .collect()
}
