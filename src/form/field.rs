//! Field descriptors for attribute values and their validation.

use super::field_name;
use crate::attr_value::VALUE_MAX_LENGTH;
use crate::catalog::{Attribute, Choice, ChoiceOption, Unit};
use crate::utils::capfirst;
use crate::value_type::{ParseError, ValueType};
use serde::Serialize;
use std::fmt;

/// Input widget family of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Closed list of options
    Selector,
    Integer,
    /// Accepts `,` as decimal separator
    Decimal,
    Date,
    Text,
}

/// Why a submitted value was refused
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Nothing was selected on a field that needs a value
    Required,
    /// The submitted key is not one of the options
    InvalidChoice(String),
    /// Both `,` and `.` appear in a decimal
    AmbiguousSeparator(String),
    /// Text longer than a stored value can be
    TooLong { len: usize, max: usize },
    /// The text does not fit the field's type
    Invalid(ParseError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "This field is required."),
            FieldError::InvalidChoice(value) => write!(
                f,
                "Select a valid choice. {value} is not one of the available choices."
            ),
            FieldError::AmbiguousSeparator(value) => write!(
                f,
                "Enter a number using either ',' or '.' as decimal separator, not both: {value:?}"
            ),
            FieldError::TooLong { len, max } => write!(
                f,
                "Ensure this value has at most {max} characters (it has {len})."
            ),
            FieldError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for FieldError {
    fn from(err: ParseError) -> Self {
        FieldError::Invalid(err)
    }
}

/// Normalise a decimal that may use a comma as decimal point
///
/// `"1,5"` becomes `"1.5"`; text containing both separators is refused.
///
/// ```
/// use lifeguard_mav::form::relaxed_decimal;
///
/// assert_eq!(relaxed_decimal("1,5").unwrap(), "1.5");
/// assert_eq!(relaxed_decimal("2.25").unwrap(), "2.25");
/// assert!(relaxed_decimal("1.000,5").is_err());
/// ```
///
/// # Errors
///
/// Returns `FieldError::AmbiguousSeparator` when both `,` and `.` are present.
pub fn relaxed_decimal(text: &str) -> Result<String, FieldError> {
    match (text.contains(','), text.contains('.')) {
        (true, true) => Err(FieldError::AmbiguousSeparator(text.to_string())),
        (true, false) => Ok(text.replace(',', ".")),
        _ => Ok(text.to_string()),
    }
}

/// Everything a rendering layer needs to show one attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Form field name, `<prefix><attribute id>`
    pub name: String,
    pub attribute_id: i64,
    pub kind: FieldKind,
    pub required: bool,
    /// Raw stored text
    pub initial: String,
    pub label: String,
    /// Options of selector fields, empty otherwise
    pub choices: Vec<ChoiceOption>,
    #[serde(skip)]
    value_type: ValueType,
}

impl FieldDescriptor {
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Reduce a submitted value to the raw text to store
    ///
    /// Selectors return the option key, numbers and dates their canonical
    /// form, text is kept as submitted up to [`VALUE_MAX_LENGTH`] characters.
    /// Empty input on an optional field gives an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] describing why the input was refused.
    pub fn clean(&self, input: &str) -> Result<String, FieldError> {
        if self.kind == FieldKind::Selector {
            if input.is_empty() && self.required {
                return Err(FieldError::Required);
            }
            return match self.choices.iter().find(|o| o.key == input) {
                Some(option) => Ok(option.key.clone()),
                None if input.is_empty() => Ok(String::new()),
                None => Err(FieldError::InvalidChoice(input.to_string())),
            };
        }

        if self.kind == FieldKind::Text {
            let len = input.chars().count();
            if len > VALUE_MAX_LENGTH {
                return Err(FieldError::TooLong {
                    len,
                    max: VALUE_MAX_LENGTH,
                });
            }
            return Ok(input.to_string());
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        let value = match self.kind {
            FieldKind::Integer => ValueType::Integer.parse(trimmed)?,
            FieldKind::Decimal => ValueType::Decimal.parse(&relaxed_decimal(trimmed)?)?,
            _ => ValueType::Date.parse(trimmed)?,
        };
        Ok(value.to_string())
    }
}

/// Build the field for one attribute
///
/// Attributes with options (every boolean, and any attribute owning choices)
/// become selectors, required unless an empty option exists. Integer, decimal
/// and date attributes get typed optional fields; text and time attributes
/// plain text.
pub fn generate_field(
    attribute: &Attribute,
    unit: Option<&Unit>,
    choices: &[Choice],
    initial: &str,
) -> FieldDescriptor {
    let options = attribute.choices(choices);
    let (kind, required) = if options.is_empty() {
        let kind = match attribute.value_type {
            ValueType::Integer => FieldKind::Integer,
            ValueType::Decimal => FieldKind::Decimal,
            ValueType::Date => FieldKind::Date,
            _ => FieldKind::Text,
        };
        (kind, false)
    } else {
        (FieldKind::Selector, !options.iter().any(|o| o.key.is_empty()))
    };

    FieldDescriptor {
        name: field_name(attribute.id),
        attribute_id: attribute.id,
        kind,
        required,
        initial: initial.to_string(),
        label: capfirst(&attribute.label(unit)),
        choices: options,
        value_type: attribute.value_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewAttribute, NewChoice, NewUnit};

    fn attr(value_type: ValueType) -> Attribute {
        NewAttribute::new("finish", value_type).into_attribute(4)
    }

    #[test]
    fn test_kinds_by_type() {
        let kinds: Vec<FieldKind> = ValueType::ALL
            .iter()
            .map(|t| generate_field(&attr(*t), None, &[], "").kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Text,
                FieldKind::Selector,
                FieldKind::Integer,
                FieldKind::Decimal,
                FieldKind::Date,
                FieldKind::Text,
            ]
        );
    }

    #[test]
    fn test_boolean_selector_is_optional() {
        let field = generate_field(&attr(ValueType::Boolean), None, &[], "TRUE");
        assert!(!field.required);
        assert_eq!(field.initial, "TRUE");
        assert_eq!(field.clean("").unwrap(), "");
        assert_eq!(field.clean("FALSE").unwrap(), "FALSE");
        assert!(matches!(field.clean("maybe"), Err(FieldError::InvalidChoice(_))));
    }

    #[test]
    fn test_choice_selector_is_required() {
        let choices = vec![NewChoice::new(4, "s").name("Small").into_choice(20)];
        let field = generate_field(&attr(ValueType::Text), None, &choices, "");
        assert_eq!(field.kind, FieldKind::Selector);
        assert!(field.required);
        assert_eq!(field.clean("20").unwrap(), "20");
        assert_eq!(field.clean(""), Err(FieldError::Required));
    }

    #[test]
    fn test_label_is_capitalised_with_unit() {
        let unit = NewUnit::new("kilogram", "kg").into_unit(1);
        let attribute = NewAttribute::new("weight", ValueType::Decimal)
            .unit(1)
            .into_attribute(4);
        let field = generate_field(&attribute, Some(&unit), &[], "");
        assert_eq!(field.label, "Weight (kg)");
        assert_eq!(field.name, "__mav__4");
    }

    #[test]
    fn test_relaxed_decimal_field() {
        let field = generate_field(&attr(ValueType::Decimal), None, &[], "");
        assert_eq!(field.clean("1,5").unwrap(), "1.5");
        assert_eq!(field.clean(" 2.25 ").unwrap(), "2.25");
        assert_eq!(field.clean("").unwrap(), "");
        assert!(matches!(
            field.clean("1.000,5"),
            Err(FieldError::AmbiguousSeparator(_))
        ));
        assert!(matches!(field.clean("abc"), Err(FieldError::Invalid(_))));
    }

    #[test]
    fn test_integer_and_date_fields_canonicalise() {
        let int_field = generate_field(&attr(ValueType::Integer), None, &[], "");
        assert_eq!(int_field.clean(" 189 ").unwrap(), "189");
        assert!(int_field.clean("189.1").is_err());

        let date_field = generate_field(&attr(ValueType::Date), None, &[], "");
        assert_eq!(date_field.clean("2000-2-29").unwrap(), "2000-02-29");
        assert!(date_field.clean("2001-2-29").is_err());
    }

    #[test]
    fn test_text_is_passthrough() {
        let field = generate_field(&attr(ValueType::Time), None, &[], "");
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.clean(" anything ").unwrap(), " anything ");
    }

    #[test]
    fn test_text_longer_than_column_refused() {
        let field = generate_field(&attr(ValueType::Text), None, &[], "");
        let long = "ü".repeat(101);
        let err = field.clean(&long).unwrap_err();
        assert_eq!(err, FieldError::TooLong { len: 101, max: 100 });
        assert!(err.to_string().contains("at most 100 characters"));
        assert_eq!(field.clean(&"ü".repeat(100)).unwrap().chars().count(), 100);
    }

    #[test]
    fn test_descriptor_serializes() {
        let field = generate_field(&attr(ValueType::Boolean), None, &[], "");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"], "selector");
        assert_eq!(json["choices"][1]["key"], "TRUE");
        assert!(json.get("value_type").is_none());
    }
}
