//! Form integration: attribute values as editable fields.
//!
//! Rendering is left to the caller. This module decides which fields exist,
//! what kind they are, validates submitted text and writes the cleaned raw
//! text back through an [`AttrStore`].
//!
//! ```
//! use std::collections::HashMap;
//! use lifeguard_mav::form::{field_name, AttrForm};
//! use lifeguard_mav::{
//!     AttrStore, AttrTypeRegistry, AttrValueOptions, Catalog, HostDescriptor, MemoryStore,
//!     NewAttribute, ValueType,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = AttrTypeRegistry::default();
//! let ty = registry.synthesize(&HostDescriptor::new("Product", "product"), AttrValueOptions::default())?;
//! let store = MemoryStore::new();
//! store.install(&ty)?;
//! let weight = store.create_attribute(NewAttribute::new("weight", ValueType::Decimal))?;
//!
//! let form = AttrForm::build(&Catalog::new(&store), &[weight.clone()], &[])?;
//! let mut submission = HashMap::new();
//! submission.insert(field_name(weight.id), "1,5".to_string());
//! let cleaned = form.clean(&submission).map_err(|e| e.to_string())?;
//! form.save(&store, &ty, 1, &cleaned)?;
//!
//! assert_eq!(store.get_value(&ty, weight.id, 1)?.unwrap().value, "1.5");
//! # Ok(())
//! # }
//! ```

pub mod field;

pub use field::{generate_field, relaxed_decimal, FieldDescriptor, FieldError, FieldKind};

use crate::attr_value::AttrValue;
use crate::catalog::{Attribute, Catalog};
use crate::config::AttrSettings;
use crate::error::StoreError;
use crate::schema::AttrValueType;
use crate::store::AttrStore;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Default prefix of attribute field names
pub const FIELD_PREFIX: &str = "__mav__";

/// Field name for an attribute with the default prefix
pub fn field_name(attribute_id: i64) -> String {
    format!("{FIELD_PREFIX}{attribute_id}")
}

/// Attribute id encoded in a field name, if it carries the default prefix
pub fn attribute_id_from_field(name: &str) -> Option<i64> {
    attribute_id_with_prefix(FIELD_PREFIX, name)
}

fn attribute_id_with_prefix(prefix: &str, name: &str) -> Option<i64> {
    name.strip_prefix(prefix)?.parse().ok()
}

/// Cleaned submission: field name to raw text (`None` is stored as empty)
pub type CleanedData = BTreeMap<String, Option<String>>;

/// Per-field validation failures
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormErrors(pub BTreeMap<String, FieldError>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, err) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// The attribute fields of one host form
#[derive(Debug, Clone, Default)]
pub struct AttrForm {
    prefix: String,
    fields: Vec<FieldDescriptor>,
}

impl AttrForm {
    /// Fields for `attributes`, plus fields for stored values of unlisted attributes
    ///
    /// `existing` are the host row's current values; they become initial values.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if choices or an unlisted attribute cannot be loaded.
    pub fn build<S: AttrStore + ?Sized>(
        catalog: &Catalog<'_, S>,
        attributes: &[Attribute],
        existing: &[AttrValue],
    ) -> Result<Self, StoreError> {
        Self::build_with_prefix(FIELD_PREFIX, catalog, attributes, existing)
    }

    /// As [`build`](Self::build), naming fields with `settings.field_prefix`
    ///
    /// Pass [`AttrTypeRegistry::settings`](crate::AttrTypeRegistry::settings)
    /// so forms follow the `[attrs]` configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if choices or an unlisted attribute cannot be loaded.
    pub fn build_with_settings<S: AttrStore + ?Sized>(
        settings: &AttrSettings,
        catalog: &Catalog<'_, S>,
        attributes: &[Attribute],
        existing: &[AttrValue],
    ) -> Result<Self, StoreError> {
        Self::build_with_prefix(&settings.field_prefix, catalog, attributes, existing)
    }

    /// As [`build`](Self::build) with an explicit field prefix
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if choices or an unlisted attribute cannot be loaded.
    pub fn build_with_prefix<S: AttrStore + ?Sized>(
        prefix: &str,
        catalog: &Catalog<'_, S>,
        attributes: &[Attribute],
        existing: &[AttrValue],
    ) -> Result<Self, StoreError> {
        let mut initial: BTreeMap<i64, &str> = existing
            .iter()
            .map(|row| (row.attribute_id, row.value.as_str()))
            .collect();

        let mut form = AttrForm {
            prefix: prefix.to_string(),
            fields: Vec::with_capacity(attributes.len()),
        };
        for attribute in attributes {
            let value = initial.remove(&attribute.id).unwrap_or("");
            form.add_field(catalog, attribute, value)?;
        }
        for (attribute_id, value) in initial {
            let attribute = catalog.store().get_attribute(attribute_id)?;
            form.add_field(catalog, &attribute, value)?;
        }
        Ok(form)
    }

    fn add_field<S: AttrStore + ?Sized>(
        &mut self,
        catalog: &Catalog<'_, S>,
        attribute: &Attribute,
        initial: &str,
    ) -> Result<(), StoreError> {
        let unit = match attribute.unit_id {
            Some(id) => catalog.store().get_unit(id).ok(),
            None => None,
        };
        let choices = catalog.store().choices_for(attribute.id)?;
        let mut field = generate_field(attribute, unit.as_ref(), &choices, initial);
        field.name = self.field_name(attribute.id);
        self.fields.push(field);
        Ok(())
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the field for `attribute_id` under this form's prefix
    pub fn field_name(&self, attribute_id: i64) -> String {
        format!("{}{attribute_id}", self.prefix)
    }

    /// Validate a submission; absent fields count as empty input
    ///
    /// # Errors
    ///
    /// Returns every refused field with its reason.
    pub fn clean(&self, submission: &HashMap<String, String>) -> Result<CleanedData, FormErrors> {
        let mut cleaned = CleanedData::new();
        let mut errors = FormErrors::default();
        for field in &self.fields {
            let input = submission.get(&field.name).map(String::as_str).unwrap_or("");
            match field.clean(input) {
                Ok(value) => {
                    cleaned.insert(field.name.clone(), Some(value));
                }
                Err(err) => {
                    errors.0.insert(field.name.clone(), err);
                }
            }
        }
        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    /// Write cleaned values for `object_id`; returns how many were written
    ///
    /// Each value goes to the get-or-created row of its attribute. Keys
    /// without this form's prefix are ignored.
    ///
    /// # Errors
    ///
    /// Stops at the first `StoreError`.
    pub fn save<S: AttrStore + ?Sized>(
        &self,
        store: &S,
        ty: &AttrValueType,
        object_id: i64,
        cleaned: &CleanedData,
    ) -> Result<usize, StoreError> {
        let mut saved = 0;
        for (name, value) in cleaned {
            if !name.starts_with(&self.prefix) {
                continue;
            }
            let Some(attribute_id) = attribute_id_with_prefix(&self.prefix, name) else {
                log::warn!("ignoring attribute field with malformed name {name:?}");
                continue;
            };
            let value = value.as_deref().unwrap_or("");
            let row = store.get_or_create_value(ty, attribute_id, object_id)?;
            if row.value != value {
                store.set_value(ty, attribute_id, object_id, value)?;
            }
            saved += 1;
        }
        log::debug!("saved {saved} attribute values of {} {object_id}", ty.host().type_name);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewAttribute, NewChoice};
    use crate::config::MavConfig;
    use crate::schema::{AttrTypeRegistry, AttrValueOptions, HostDescriptor};
    use crate::store::MemoryStore;
    use crate::value_type::ValueType;
    use std::sync::Arc;

    fn setup() -> (MemoryStore, Arc<AttrValueType>) {
        let mut registry = AttrTypeRegistry::default();
        let ty = registry
            .synthesize(&HostDescriptor::new("Product", "product"), AttrValueOptions::default())
            .unwrap();
        let store = MemoryStore::new();
        store.install(&ty).unwrap();
        (store, ty)
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name(12), "__mav__12");
        assert_eq!(attribute_id_from_field("__mav__12"), Some(12));
        assert_eq!(attribute_id_from_field("name"), None);
        assert_eq!(attribute_id_from_field("__mav__x"), None);
    }

    #[test]
    fn test_build_includes_unlisted_stored_values() {
        let (store, ty) = setup();
        let colour = store
            .create_attribute(NewAttribute::new("colour", ValueType::Text))
            .unwrap();
        let legacy = store
            .create_attribute(NewAttribute::new("legacy", ValueType::Integer))
            .unwrap();
        store.set_value(&ty, colour.id, 1, "red").unwrap();
        store.set_value(&ty, legacy.id, 1, "7").unwrap();

        let existing = store.values_for(&ty, 1).unwrap();
        let form = AttrForm::build(&Catalog::new(&store), &[colour.clone()], &existing).unwrap();
        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![field_name(colour.id), field_name(legacy.id)]);
        assert_eq!(form.field(&field_name(colour.id)).unwrap().initial, "red");
        assert_eq!(form.field(&field_name(legacy.id)).unwrap().kind, FieldKind::Integer);
    }

    #[test]
    fn test_clean_collects_errors() {
        let (store, _) = setup();
        let count = store
            .create_attribute(NewAttribute::new("count", ValueType::Integer))
            .unwrap();
        let size = store
            .create_attribute(NewAttribute::new("size", ValueType::Text))
            .unwrap();
        store.create_choice(NewChoice::new(size.id, "M")).unwrap();

        let form = AttrForm::build(&Catalog::new(&store), &[count.clone(), size.clone()], &[])
            .unwrap();
        let mut submission = HashMap::new();
        submission.insert(field_name(count.id), "1.5".to_string());

        let errors = form.clean(&submission).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors.get(&field_name(count.id)), Some(FieldError::Invalid(_))));
        assert_eq!(errors.get(&field_name(size.id)), Some(&FieldError::Required));
        assert!(errors.to_string().contains("required"));
    }

    #[test]
    fn test_save_updates_in_place() {
        let (store, ty) = setup();
        let colour = store
            .create_attribute(NewAttribute::new("colour", ValueType::Text))
            .unwrap();
        let form = AttrForm::build(&Catalog::new(&store), &[colour.clone()], &[]).unwrap();

        let mut cleaned = CleanedData::new();
        cleaned.insert(field_name(colour.id), Some("red".to_string()));
        cleaned.insert("title".to_string(), Some("ignored".to_string()));
        assert_eq!(form.save(&store, &ty, 5, &cleaned).unwrap(), 1);
        let first = store.get_value(&ty, colour.id, 5).unwrap().unwrap();

        cleaned.insert(field_name(colour.id), None);
        form.save(&store, &ty, 5, &cleaned).unwrap();
        let second = store.get_value(&ty, colour.id, 5).unwrap().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.value, "");
    }

    #[test]
    fn test_custom_prefix() {
        let (store, ty) = setup();
        let colour = store
            .create_attribute(NewAttribute::new("colour", ValueType::Text))
            .unwrap();
        let form =
            AttrForm::build_with_prefix("attr_", &Catalog::new(&store), &[colour.clone()], &[])
                .unwrap();
        let name = format!("attr_{}", colour.id);
        assert!(form.field(&name).is_some());

        let mut submission = HashMap::new();
        submission.insert(name.clone(), "blue".to_string());
        let cleaned = form.clean(&submission).unwrap();
        form.save(&store, &ty, 2, &cleaned).unwrap();
        assert_eq!(store.get_value(&ty, colour.id, 2).unwrap().unwrap().value, "blue");
    }

    #[test]
    fn test_configured_prefix_names_fields() {
        let config = MavConfig::from_toml("[attrs]\nfield_prefix = \"attr_\"").unwrap();
        let mut registry = AttrTypeRegistry::new(config.attrs);
        let ty = registry
            .synthesize(&HostDescriptor::new("Product", "product"), AttrValueOptions::default())
            .unwrap();
        let store = MemoryStore::new();
        store.install(&ty).unwrap();
        let colour = store
            .create_attribute(NewAttribute::new("colour", ValueType::Text))
            .unwrap();

        let form = AttrForm::build_with_settings(
            registry.settings(),
            &Catalog::new(&store),
            &[colour.clone()],
            &[],
        )
        .unwrap();
        let name = format!("attr_{}", colour.id);
        assert_eq!(form.prefix(), "attr_");
        assert_eq!(form.field_name(colour.id), name);
        assert_eq!(form.fields()[0].name, name);
        assert!(form.field(&field_name(colour.id)).is_none());

        // Keys under the default prefix are not this form's fields
        let mut cleaned = CleanedData::new();
        cleaned.insert(field_name(colour.id), Some("red".to_string()));
        assert_eq!(form.save(&store, &ty, 3, &cleaned).unwrap(), 0);
        cleaned.insert(name, Some("blue".to_string()));
        assert_eq!(form.save(&store, &ty, 3, &cleaned).unwrap(), 1);
        assert_eq!(store.get_value(&ty, colour.id, 3).unwrap().unwrap().value, "blue");
    }
}
