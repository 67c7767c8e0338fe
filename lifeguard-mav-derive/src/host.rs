//! `#[derive(AttrHost)]` expansion

use crate::attributes::{extract_column_name, has_marker, parse_host_attributes};
use crate::utils::snake_case;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

/// Column of the field marked `#[primary_key]`, `"id"` when none is marked
fn primary_key_column(input: &DeriveInput) -> syn::Result<String> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "AttrHost can only be derived for structs",
        ));
    };
    if let Fields::Named(fields) = &data.fields {
        for field in &fields.named {
            if has_marker(&field.attrs, "primary_key") {
                if let Some(column) = extract_column_name(field)? {
                    return Ok(column);
                }
                if let Some(ident) = &field.ident {
                    return Ok(ident.to_string());
                }
            }
        }
    }
    Ok("id".to_string())
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let host = parse_host_attributes(&input.attrs)?;
    let pk_column = primary_key_column(&input)?;
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();
    let table_name = host.table_name.unwrap_or_else(|| snake_case(&type_name));

    let schema_name = host
        .schema_name
        .map(|schema| quote! { .schema_name(#schema) });
    let tablespace = host.tablespace.map(|ts| quote! { .tablespace(#ts) });
    let unmanaged = host.unmanaged.then(|| quote! { .unmanaged() });
    let abstract_model = host.abstract_model.then(|| quote! { .abstract_model() });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::lifeguard_mav::AttrHost for #struct_name #ty_generics #where_clause {
            fn descriptor() -> ::lifeguard_mav::HostDescriptor {
                ::lifeguard_mav::HostDescriptor::new(#type_name, #table_name)
                    .pk_column(#pk_column)
                    #schema_name
                    #tablespace
                    #unmanaged
                    #abstract_model
            }
        }
    })
}
