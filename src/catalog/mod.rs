//! The attribute catalog: units, attributes and their choices.
//!
//! Records are plain data. [`Catalog`] combines them with an [`AttrStore`] for
//! the operations that need related rows (unit symbol for labels, choices for
//! option lists and display).

pub mod attribute;
pub mod choice;
pub mod unit;

pub use attribute::{Attribute, ChoiceOption, NewAttribute};
pub use choice::{Choice, NewChoice};
pub use unit::{NewUnit, Unit};

use crate::attr_value::AttrValue;
use crate::error::StoreError;
use crate::store::AttrStore;
use crate::utils::is_valid_slug;
use crate::value_type::{ParseError, TypedValue, ValueType};

/// Reject slugs with characters other than letters, digits, `-` and `_`,
/// or longer than the `attribute.slug` column
///
/// # Errors
///
/// Returns `StoreError::InvalidSlug` for an empty, malformed or too long slug.
pub fn validate_slug(slug: &str) -> Result<(), StoreError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(StoreError::InvalidSlug(slug.to_string()))
    }
}

/// Catalog operations backed by a store
///
/// # Examples
///
/// ```
/// use lifeguard_mav::{AttrStore, Catalog, MemoryStore, NewAttribute, NewUnit, ValueType};
///
/// # fn main() -> Result<(), lifeguard_mav::StoreError> {
/// let store = MemoryStore::new();
/// let kg = store.create_unit(NewUnit::new("kilogram", "kg"))?;
/// let weight = store.create_attribute(NewAttribute::new("weight", ValueType::Decimal).unit(kg.id))?;
///
/// let catalog = Catalog::new(&store);
/// assert_eq!(catalog.label(&weight), "weight (kg)");
/// # Ok(())
/// # }
/// ```
pub struct Catalog<'a, S: AttrStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: AttrStore + ?Sized> Catalog<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    /// Attribute name with its unit symbol; a unit that cannot be loaded is left out
    pub fn label(&self, attribute: &Attribute) -> String {
        let unit = attribute.unit_id.and_then(|id| match self.store.get_unit(id) {
            Ok(unit) => Some(unit),
            Err(err) => {
                log::debug!("label of {} without unit: {err}", attribute.slug);
                None
            }
        });
        attribute.label(unit.as_ref())
    }

    /// Option list of an attribute, see [`Attribute::choices`]
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the choices cannot be loaded.
    pub fn choices(&self, attribute: &Attribute) -> Result<Vec<ChoiceOption>, StoreError> {
        if attribute.value_type == ValueType::Boolean {
            return Ok(attribute.choices(&[]));
        }
        let choices = self.store.choices_for(attribute.id)?;
        Ok(attribute.choices(&choices))
    }

    /// # Errors
    ///
    /// Returns [`ParseError`] if the text does not fit the attribute's type.
    pub fn text_to_value(&self, attribute: &Attribute, text: &str) -> Result<TypedValue, ParseError> {
        attribute.text_to_value(text)
    }

    /// Display text of a value; lookup failures fall back to the plain text
    pub fn value_display(&self, attribute: &Attribute, value: &TypedValue) -> String {
        match self.store.choices_for(attribute.id) {
            Ok(choices) => attribute.value_display(value, &choices),
            Err(err) => {
                log::debug!("choices of {} unavailable: {err}", attribute.slug);
                value.to_string()
            }
        }
    }

    /// Display text of a stored row, loading its attribute
    ///
    /// A missing attribute shows the raw text.
    pub fn display(&self, row: &AttrValue) -> String {
        let attribute = match self.store.get_attribute(row.attribute_id) {
            Ok(attribute) => attribute,
            Err(err) => {
                log::debug!("showing raw value of row {}: {err}", row.id);
                return row.value.clone();
            }
        };
        match self.store.choices_for(attribute.id) {
            Ok(choices) => row.value_display(&attribute, &choices),
            Err(err) => {
                log::debug!("choices of {} unavailable: {err}", attribute.slug);
                row.value.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("screen-size").is_ok());
        assert!(matches!(validate_slug(""), Err(StoreError::InvalidSlug(_))));
    }

    #[test]
    fn test_label_with_deleted_unit() {
        let store = MemoryStore::new();
        let unit = store.create_unit(NewUnit::new("metre", "m")).unwrap();
        let mut attr = store
            .create_attribute(NewAttribute::new("length", ValueType::Decimal).unit(unit.id))
            .unwrap();
        let catalog = Catalog::new(&store);
        assert_eq!(catalog.label(&attr), "length (m)");

        // Stale copy still pointing at the removed unit
        store.delete_unit(unit.id).unwrap();
        assert_eq!(catalog.label(&attr), "length");
        attr.unit_id = None;
        assert_eq!(catalog.label(&attr), "length");
    }

    #[test]
    fn test_boolean_choices_ignore_stored_rows() {
        let store = MemoryStore::new();
        let attr = store
            .create_attribute(NewAttribute::new("in_stock", ValueType::Boolean))
            .unwrap();
        store.create_choice(NewChoice::new(attr.id, "maybe")).unwrap();
        let options = Catalog::new(&store).choices(&attr).unwrap();
        let keys: Vec<&str> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["", "TRUE", "FALSE"]);
    }

    #[test]
    fn test_choices_ordered_by_sort_order_then_name() {
        let store = MemoryStore::new();
        let attr = store
            .create_attribute(NewAttribute::new("grade", ValueType::Text))
            .unwrap();
        store
            .create_choice(NewChoice::new(attr.id, "b").name("B").sort_order(2))
            .unwrap();
        store
            .create_choice(NewChoice::new(attr.id, "a").name("A").sort_order(1))
            .unwrap();
        let labels: Vec<String> = Catalog::new(&store)
            .choices(&attr)
            .unwrap()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn test_display_degrades() {
        let store = MemoryStore::new();
        let attr = store
            .create_attribute(NewAttribute::new("size", ValueType::Integer))
            .unwrap();
        let large = store
            .create_choice(NewChoice::new(attr.id, "L").name("Large"))
            .unwrap();
        let catalog = Catalog::new(&store);

        let value = TypedValue::Integer(large.id);
        assert_eq!(catalog.value_display(&attr, &value), "Large");
        assert_eq!(catalog.value_display(&attr, &TypedValue::Integer(-1)), "-1");

        let orphan = AttrValue {
            id: 1,
            attribute_id: 404,
            object_id: 1,
            value: "raw".to_string(),
        };
        assert_eq!(catalog.display(&orphan), "raw");
    }
}
