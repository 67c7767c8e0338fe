//! Persistence of the catalog and of attribute values.
//!
//! [`AttrStore`] is the seam between the pure catalog logic and storage.
//! [`MemoryStore`] keeps everything in process; [`PgStore`] runs SQL through a
//! [`SqlExecutor`](crate::SqlExecutor).
//!
//! Deletion follows the table constraints: deleting an attribute removes its
//! choices and its values in every attribute-value table, deleting a unit
//! clears the unit of the attributes that used it.

pub mod memory;
pub mod params;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::attr_value::{AttrValue, VALUE_MAX_LENGTH};
use crate::catalog::{Attribute, Choice, NewAttribute, NewChoice, NewUnit, Unit};
use crate::error::StoreError;
use crate::schema::AttrValueType;

/// Refuse values the value column cannot hold
pub(crate) fn check_value_length(value: &str) -> Result<(), StoreError> {
    let len = value.chars().count();
    if len > VALUE_MAX_LENGTH {
        return Err(StoreError::ValueTooLong {
            len,
            max: VALUE_MAX_LENGTH,
        });
    }
    Ok(())
}

/// Storage for units, attributes, choices and attribute values
///
/// Value operations take the [`AttrValueType`] naming the table to use. The
/// trait is object safe.
pub trait AttrStore {
    /// Prepare storage for an attribute-value type
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if storage could not be prepared.
    fn install(&self, ty: &AttrValueType) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::Database` on storage failure.
    fn create_unit(&self, unit: NewUnit) -> Result<Unit, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no unit has this id.
    fn get_unit(&self, id: i64) -> Result<Unit, StoreError>;

    /// All units ordered by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` on storage failure.
    fn units(&self) -> Result<Vec<Unit>, StoreError>;

    /// Delete a unit; attributes using it keep existing without a unit
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no unit has this id.
    fn delete_unit(&self, id: i64) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::InvalidSlug` or `StoreError::DuplicateSlug` when the
    /// slug is unusable, `StoreError::NotFound` when the unit does not exist.
    fn create_attribute(&self, attribute: NewAttribute) -> Result<Attribute, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no attribute has this id.
    fn get_attribute(&self, id: i64) -> Result<Attribute, StoreError>;

    /// Look up by slug; `None` when no attribute has it
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` on storage failure.
    fn get_attribute_by_slug(&self, slug: &str) -> Result<Option<Attribute>, StoreError>;

    /// All attributes ordered by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` on storage failure.
    fn attributes(&self) -> Result<Vec<Attribute>, StoreError>;

    /// Delete an attribute together with its choices and values
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no attribute has this id.
    fn delete_attribute(&self, id: i64) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the attribute does not exist.
    fn create_choice(&self, choice: NewChoice) -> Result<Choice, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no choice has this id.
    fn get_choice(&self, id: i64) -> Result<Choice, StoreError>;

    /// Choices of one attribute ordered by `(attribute_id, sort_order, value, id)`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` on storage failure.
    fn choices_for(&self, attribute_id: i64) -> Result<Vec<Choice>, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no choice has this id.
    fn delete_choice(&self, id: i64) -> Result<(), StoreError>;

    /// The value row for `(attribute_id, object_id)`, created empty if missing
    ///
    /// Concurrent callers get the same row: creation yields to an existing row
    /// instead of failing on the unique constraint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownAttrTable` if `ty` was never installed and
    /// `StoreError::NotFound` if the attribute does not exist. Stores that
    /// enforce the host key also return `NotFound` for a missing object.
    fn get_or_create_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<AttrValue, StoreError>;

    /// Store raw text for `(attribute_id, object_id)`, updating an existing row
    ///
    /// # Errors
    ///
    /// As [`get_or_create_value`](Self::get_or_create_value), and
    /// `StoreError::ValueTooLong` past [`VALUE_MAX_LENGTH`] characters.
    fn set_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
        value: &str,
    ) -> Result<AttrValue, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::UnknownAttrTable` if `ty` was never installed.
    fn get_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<Option<AttrValue>, StoreError>;

    /// All values of one host row ordered by attribute id
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownAttrTable` if `ty` was never installed.
    fn values_for(&self, ty: &AttrValueType, object_id: i64) -> Result<Vec<AttrValue>, StoreError>;

    /// Remove one value; `false` when there was none
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownAttrTable` if `ty` was never installed.
    fn delete_value(
        &self,
        ty: &AttrValueType,
        attribute_id: i64,
        object_id: i64,
    ) -> Result<bool, StoreError>;

    /// Remove every value of a host row, as when the host row is deleted
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownAttrTable` if `ty` was never installed.
    fn delete_values_for_object(&self, ty: &AttrValueType, object_id: i64)
        -> Result<u64, StoreError>;
}
