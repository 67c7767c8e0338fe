//! Procedural macros for Lifeguard MAV
//!
//! This crate provides the `AttrHost` derive, the opt-in that lets a record
//! type carry attributes.

mod attributes;
mod host;
mod utils;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for `AttrHost` - describes the host table of a record type
///
/// Struct attributes:
/// - `#[table_name = "..."]`: host table, snake_case of the struct name by default
/// - `#[schema_name = "..."]`, `#[tablespace = "..."]`: placement, copied to the attribute table
/// - `#[unmanaged]`: tables are maintained outside this application
/// - `#[abstract_model]`: no table; synthesizing an attribute type for it fails
///
/// Field attributes:
/// - `#[primary_key]` (optionally with `#[column_name = "..."]`): referenced key column, `id` by default
///
/// # Example
///
/// ```
/// use lifeguard_mav::AttrHost;
///
/// #[derive(AttrHost)]
/// #[table_name = "catalog_products"]
/// #[schema_name = "shop"]
/// struct Product {
///     #[primary_key]
///     product_id: i64,
/// }
///
/// let host = Product::descriptor();
/// assert_eq!(host.type_name, "Product");
/// assert_eq!(host.table_name, "catalog_products");
/// assert_eq!(host.pk_column, "product_id");
/// assert_eq!(host.schema_name.as_deref(), Some("shop"));
/// ```
#[proc_macro_derive(
    AttrHost,
    attributes(table_name, schema_name, tablespace, unmanaged, abstract_model, primary_key, column_name)
)]
pub fn derive_attr_host(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    host::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
