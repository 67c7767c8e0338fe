//! Choices: the allowed discrete values of an attribute.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A choice for the value of an attribute (`choice` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub attribute_id: i64,
    /// Raw stored text, may be empty
    pub value: String,
    /// Display label, may be empty (falls back to `value`)
    pub name: String,
    pub description: String,
    pub sort_order: i32,
}

impl Choice {
    /// Label shown to users: `name`, or `value` when the name is empty
    pub fn value_display(&self) -> &str {
        if self.name.is_empty() {
            &self.value
        } else {
            &self.name
        }
    }

    /// `<attribute>.<label>`, used in admin listings and log lines
    pub fn qualified_name(&self, attribute_name: &str) -> String {
        format!("{}.{}", attribute_name, self.value_display())
    }

    /// Default ordering of choices: `(attribute_id, sort_order, value, id)`
    pub fn canonical_cmp(&self, other: &Choice) -> Ordering {
        (self.attribute_id, self.sort_order, &self.value, self.id).cmp(&(
            other.attribute_id,
            other.sort_order,
            &other.value,
            other.id,
        ))
    }

    /// Ordering used to build option lists: `(sort_order, name)`
    ///
    /// The id breaks remaining ties so option lists are deterministic.
    pub fn option_cmp(&self, other: &Choice) -> Ordering {
        (self.sort_order, &self.name, self.id).cmp(&(other.sort_order, &other.name, other.id))
    }
}

/// Insert form of [`Choice`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewChoice {
    pub attribute_id: i64,
    pub value: String,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
}

impl NewChoice {
    pub fn new(attribute_id: i64, value: impl Into<String>) -> Self {
        Self {
            attribute_id,
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub(crate) fn into_choice(self, id: i64) -> Choice {
        Choice {
            id,
            attribute_id: self.attribute_id,
            value: self.value,
            name: self.name,
            description: self.description,
            sort_order: self.sort_order,
        }
    }
}
