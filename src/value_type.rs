//! Value types - the attribute type catalog
//!
//! Every attribute has one of six value types. A value type knows how to turn
//! free text into a typed value ([`ValueType::parse`]) and a typed value knows
//! how to render itself back to canonical text (`Display` on [`TypedValue`]).
//!
//! Storage always holds the raw text; typed values only live in memory.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Texts that parse to `true` for boolean attributes (compared after uppercasing and trimming)
pub const BOOLEAN_TRUE_TEXTS: [&str; 5] = ["TRUE", "YES", "T", "Y", "1"];

/// Texts that parse to `false` for boolean attributes
pub const BOOLEAN_FALSE_TEXTS: [&str; 5] = ["FALSE", "NO", "F", "N", "0"];

/// Texts that parse to "unknown" for boolean attributes
pub const BOOLEAN_NULL_TEXTS: [&str; 2] = ["NULL", ""];

/// The value type of an attribute
///
/// The discriminant is the code persisted in `attribute.type` (`SMALLINT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text = 1,
    Boolean = 2,
    Integer = 3,
    Decimal = 4,
    Date = 5,
    Time = 6,
}

impl ValueType {
    /// All value types, in code order
    pub const ALL: [ValueType; 6] = [
        ValueType::Text,
        ValueType::Boolean,
        ValueType::Integer,
        ValueType::Decimal,
        ValueType::Date,
        ValueType::Time,
    ];

    /// Persisted code of this type
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Look up a type by its persisted code
    pub fn from_code(code: i16) -> Option<ValueType> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Display name of this type
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
            ValueType::Time => "time",
        }
    }

    /// Parse free text into a value of this type
    ///
    /// Text is taken as-is. Every other type first uppercases and trims the
    /// input, so `" yes "` is a valid boolean and `" 12 "` a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the text does not match the type's grammar.
    /// The error carries the original (unnormalised) text.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifeguard_mav::{TypedValue, ValueType};
    ///
    /// assert_eq!(ValueType::Integer.parse("189").unwrap(), TypedValue::Integer(189));
    /// assert!(ValueType::Integer.parse("189.1").is_err());
    /// assert_eq!(ValueType::Boolean.parse("").unwrap(), TypedValue::Boolean(None));
    /// ```
    pub fn parse(self, text: &str) -> Result<TypedValue, ParseError> {
        let normalized = text.to_uppercase();
        let t = normalized.trim();
        let fail = |reason: &str| ParseError::new(self, text, reason);

        match self {
            // Any text is valid text
            ValueType::Text => Ok(TypedValue::Text(text.to_string())),
            ValueType::Integer => t
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| fail(&e.to_string())),
            ValueType::Decimal => {
                let value = t.parse::<f64>().map_err(|e| fail(&e.to_string()))?;
                if !value.is_finite() {
                    return Err(fail("not a finite number"));
                }
                Ok(TypedValue::Decimal(value))
            }
            ValueType::Boolean => parse_boolean(t)
                .map(TypedValue::Boolean)
                .ok_or_else(|| fail("not a recognised boolean literal")),
            ValueType::Date => parse_date(t).map(TypedValue::Date).map_err(|r| fail(&r)),
            ValueType::Time => parse_time(t).map(TypedValue::Time).map_err(|r| fail(&r)),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Input is already uppercased and trimmed.
fn parse_boolean(t: &str) -> Option<Option<bool>> {
    if BOOLEAN_TRUE_TEXTS.contains(&t) {
        Some(Some(true))
    } else if BOOLEAN_FALSE_TEXTS.contains(&t) {
        Some(Some(false))
    } else if BOOLEAN_NULL_TEXTS.contains(&t) {
        Some(None)
    } else {
        None
    }
}

fn parse_component<T: std::str::FromStr>(part: &str, what: &str) -> Result<T, String> {
    part.trim()
        .parse::<T>()
        .map_err(|_| format!("invalid {what} component {:?}", part.trim()))
}

fn parse_date(t: &str) -> Result<NaiveDate, String> {
    let parts: Vec<&str> = t.split('-').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected year-month-day, got {} component(s)",
            parts.len()
        ));
    }
    let year = parse_component::<i32>(parts[0], "year")?;
    let month = parse_component::<u32>(parts[1], "month")?;
    let day = parse_component::<u32>(parts[2], "day")?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{year}-{month}-{day} is not a calendar date"))
}

fn parse_time(t: &str) -> Result<NaiveTime, String> {
    let parts: Vec<&str> = t.split(':').collect();
    if parts.len() > 3 {
        return Err(format!(
            "expected hour[:minute[:second]], got {} components",
            parts.len()
        ));
    }
    let hour = parse_component::<u32>(parts[0], "hour")?;
    let minute = match parts.get(1) {
        Some(part) => parse_component::<u32>(part, "minute")?,
        None => 0,
    };
    let second = match parts.get(2) {
        Some(part) => parse_component::<u32>(part, "second")?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| format!("{hour}:{minute}:{second} is not a time of day"))
}

/// A parsed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    /// `None` means unknown / no value
    Boolean(Option<bool>),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl TypedValue {
    /// The value type this value belongs to
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Text(_) => ValueType::Text,
            TypedValue::Boolean(_) => ValueType::Boolean,
            TypedValue::Integer(_) => ValueType::Integer,
            TypedValue::Decimal(_) => ValueType::Decimal,
            TypedValue::Date(_) => ValueType::Date,
            TypedValue::Time(_) => ValueType::Time,
        }
    }

    /// Whether this is the "unknown" boolean or an empty text
    pub fn is_empty(&self) -> bool {
        match self {
            TypedValue::Text(s) => s.is_empty(),
            TypedValue::Boolean(b) => b.is_none(),
            _ => false,
        }
    }
}

/// Canonical text form; parsing it with the same type yields the same value.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Text(s) => f.write_str(s),
            TypedValue::Boolean(Some(true)) => f.write_str("TRUE"),
            TypedValue::Boolean(Some(false)) => f.write_str("FALSE"),
            TypedValue::Boolean(None) => Ok(()),
            TypedValue::Integer(i) => write!(f, "{i}"),
            TypedValue::Decimal(d) => write!(f, "{d}"),
            TypedValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TypedValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

/// Text could not be converted to the requested value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Target type
    pub value_type: ValueType,
    /// The offending input, as given
    pub text: String,
    /// Why parsing failed
    pub reason: String,
}

impl ParseError {
    fn new(value_type: ValueType, text: &str, reason: &str) -> Self {
        Self {
            value_type,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot convert text {:?} to value of type {}: {}",
            self.text, self.value_type, self.reason
        )
    }
}

impl std::error::Error for ParseError {}
