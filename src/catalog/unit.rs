//! Units of measure attached to attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit for a given attribute (`unit` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    /// Short symbol shown next to attribute labels, e.g. `kg` or `° C`
    pub symbol: String,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Insert form of [`Unit`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewUnit {
    pub name: String,
    pub symbol: String,
}

impl NewUnit {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    pub(crate) fn into_unit(self, id: i64) -> Unit {
        Unit {
            id,
            name: self.name,
            symbol: self.symbol,
        }
    }
}
