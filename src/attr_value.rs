//! Rows of the synthesized attribute-value tables.

use crate::catalog::{Attribute, Choice};
use crate::value_type::{ParseError, TypedValue};
use serde::{Deserialize, Serialize};

/// Longest raw value, in characters, an attribute-value column holds
pub const VALUE_MAX_LENGTH: usize = 100;

/// One value of one attribute for one host row
///
/// Every synthesized table shares this shape; which table a row lives in is
/// decided by the [`AttrValueType`](crate::schema::AttrValueType) it was read
/// through. The value is stored as raw text and never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrValue {
    pub id: i64,
    pub attribute_id: i64,
    pub object_id: i64,
    pub value: String,
}

impl AttrValue {
    /// Parse the stored text with the attribute's type
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the stored text does not fit the type,
    /// e.g. after the attribute's type was changed.
    pub fn typed_value(&self, attribute: &Attribute) -> Result<TypedValue, ParseError> {
        attribute.text_to_value(&self.value)
    }

    /// Display text for this value; unparseable values are shown raw
    pub fn value_display(&self, attribute: &Attribute, choices: &[Choice]) -> String {
        match self.typed_value(attribute) {
            Ok(value) => attribute.value_display(&value, choices),
            Err(err) => {
                log::debug!("showing raw value: {err}");
                self.value.clone()
            }
        }
    }
}
