//! Attribute parsing utilities

use syn::{Attribute, ExprLit, Field, Lit};

/// Value of a `#[name = "..."]` attribute
///
/// Returns an error when the attribute is present but not a string literal.
pub fn extract_string(attrs: &[Attribute], name: &str) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident(name) {
            let meta = attr.meta.require_name_value()?;
            if let syn::Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &meta.value
            {
                return Ok(Some(s.value()));
            }
            return Err(syn::Error::new_spanned(
                &meta.value,
                format!("expected a string literal: #[{name} = \"...\"]"),
            ));
        }
    }
    Ok(None)
}

/// Whether a bare `#[name]` marker is present
pub fn has_marker(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Extract column name from field attributes
pub fn extract_column_name(field: &Field) -> syn::Result<Option<String>> {
    extract_string(&field.attrs, "column_name")
}

/// Struct-level options of `#[derive(AttrHost)]`
#[derive(Debug, Default)]
pub struct HostAttributes {
    pub table_name: Option<String>,
    pub schema_name: Option<String>,
    pub tablespace: Option<String>,
    pub unmanaged: bool,
    pub abstract_model: bool,
}

/// Parse all host attributes from a struct
pub fn parse_host_attributes(attrs: &[Attribute]) -> syn::Result<HostAttributes> {
    Ok(HostAttributes {
        table_name: extract_string(attrs, "table_name")?,
        schema_name: extract_string(attrs, "schema_name")?,
        tablespace: extract_string(attrs, "tablespace")?,
        unmanaged: has_marker(attrs, "unmanaged"),
        abstract_model: has_marker(attrs, "abstract_model"),
    })
}
