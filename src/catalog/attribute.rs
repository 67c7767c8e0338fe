//! Attributes: the "A" in EAV.
//!
//! The methods here are pure; they work on rows that have already been loaded.
//! [`Catalog`](super::Catalog) binds them to an [`AttrStore`](crate::store::AttrStore).

use super::{Choice, Unit};
use crate::value_type::{ParseError, TypedValue, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute definition (`attribute` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: i64,
    /// Globally unique, immutable identifier
    pub slug: String,
    /// Display name, may be empty (falls back to `slug`)
    pub name: String,
    pub value_type: ValueType,
    pub unit_id: Option<i64>,
}

/// One entry of an attribute's option list: `(key, label)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Submitted/stored key: `""`, `"TRUE"`, `"FALSE"` for booleans, the choice id otherwise
    pub key: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

impl Attribute {
    /// `name`, or `slug` when the name is empty
    pub fn name_display(&self) -> &str {
        if self.name.is_empty() {
            &self.slug
        } else {
            &self.name
        }
    }

    /// Display name followed by the unit symbol, e.g. `weight (kg)`
    ///
    /// `unit` is the unit referenced by `unit_id`, if loaded.
    pub fn label(&self, unit: Option<&Unit>) -> String {
        match unit {
            Some(unit) if self.unit_id.is_some() => {
                format!("{} ({})", self.name_display(), unit.symbol)
            }
            _ => self.name_display().to_string(),
        }
    }

    /// Convert text to a typed value according to this attribute's type
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] (naming the type and the offending text) when the
    /// text does not match the type's grammar.
    pub fn text_to_value(&self, text: &str) -> Result<TypedValue, ParseError> {
        self.value_type.parse(text)
    }

    /// Option list for this attribute
    ///
    /// Booleans always get the fixed unknown/yes/no list regardless of stored
    /// choices. Other types list the choices owned by this attribute ordered by
    /// `(sort_order, name)`; an empty list means the value is free text.
    pub fn choices(&self, choices: &[Choice]) -> Vec<ChoiceOption> {
        if self.value_type == ValueType::Boolean {
            return vec![
                ChoiceOption::new("", "unknown"),
                ChoiceOption::new("TRUE", "yes"),
                ChoiceOption::new("FALSE", "no"),
            ];
        }

        let mut owned: Vec<&Choice> = choices
            .iter()
            .filter(|c| c.attribute_id == self.id)
            .collect();
        owned.sort_by(|a, b| a.option_cmp(b));
        owned
            .into_iter()
            .map(|c| ChoiceOption::new(c.id.to_string(), c.value_display()))
            .collect()
    }

    /// Human readable form of a value
    ///
    /// When this attribute owns choices the value is read as a choice id and the
    /// choice label is returned. A value that names no owned choice, or an
    /// attribute without choices, falls back to the plain text of the value.
    /// This never fails.
    pub fn value_display(&self, value: &TypedValue, choices: &[Choice]) -> String {
        let text = value.to_string();
        let mut owned = choices.iter().filter(|c| c.attribute_id == self.id).peekable();
        if owned.peek().is_none() {
            return text;
        }

        let Ok(choice_id) = text.trim().parse::<i64>() else {
            log::debug!(
                "value {text:?} of attribute {} is not a choice id, showing it as text",
                self.slug
            );
            return text;
        };
        match owned.find(|c| c.id == choice_id) {
            Some(choice) => choice.value_display().to_string(),
            None => {
                log::debug!(
                    "choice {choice_id} not found for attribute {}, showing it as text",
                    self.slug
                );
                text
            }
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_display())
    }
}

/// Insert form of [`Attribute`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttribute {
    pub slug: String,
    pub name: String,
    pub value_type: ValueType,
    pub unit_id: Option<i64>,
}

impl NewAttribute {
    pub fn new(slug: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            slug: slug.into(),
            name: String::new(),
            value_type,
            unit_id: None,
        }
    }

    /// Display name given, slug derived from it: `"Screen size"` -> `screen_size`
    ///
    /// The slug is not shortened; stores refuse one over
    /// [`SLUG_MAX_LENGTH`](crate::utils::SLUG_MAX_LENGTH) characters with
    /// `StoreError::InvalidSlug`.
    pub fn from_name(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self::new(crate::utils::slugify_with_underscores(&name), value_type).name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn unit(mut self, unit_id: i64) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    pub(crate) fn into_attribute(self, id: i64) -> Attribute {
        Attribute {
            id,
            slug: self.slug,
            name: self.name,
            value_type: self.value_type,
            unit_id: self.unit_id,
        }
    }
}
