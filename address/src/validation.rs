//! Per-field validation, value transforms and address formatting, all driven
//! by the country metadata table. Cheap and synchronous; the form calls these
//! on every keystroke.

use crate::metadata::{CountryAddressMetadata, address_metadata};
use crate::record::AddressRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of validating one field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// Validate a single field value for a country.
///
/// Unknown fields are valid. Blank required fields fail with
/// `"<label> is required"`. Non-blank values must match the field pattern.
pub fn validate_address_field(country_code: &str, field: &str, value: &str) -> ValidationResult {
    validate_with(address_metadata(country_code), field, value)
}

fn validate_with(meta: &CountryAddressMetadata, field: &str, value: &str) -> ValidationResult {
    let Some(config) = meta.field(field) else {
        return ValidationResult::valid();
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        if meta.is_required(field) {
            return ValidationResult::invalid(format!("{} is required", config.label));
        }
        return ValidationResult::valid();
    }

    if let Some(pattern) = &config.pattern
        && !pattern.is_match(trimmed)
    {
        let message = config
            .error
            .map(str::to_string)
            .unwrap_or_else(|| format!("Invalid {}", config.label));
        return ValidationResult::invalid(message);
    }

    if !config.accepts_option(trimmed) {
        return ValidationResult::invalid(format!("Select a valid {}", config.label));
    }

    ValidationResult::valid()
}

/// Apply the field's transform (e.g. uppercase postcodes), identity otherwise.
pub fn transform_field_value(country_code: &str, field: &str, value: &str) -> String {
    match address_metadata(country_code)
        .field(field)
        .and_then(|c| c.transform)
    {
        Some(transform) => transform.apply(value),
        None => value.to_string(),
    }
}

/// Validate every field the country knows about.
///
/// Returns field name to error message for the fields that failed; an empty
/// map means the address can be submitted.
pub fn validate_address_fields(record: &AddressRecord) -> BTreeMap<&'static str, String> {
    let meta = address_metadata(&record.country);
    meta.field_names()
        .filter_map(|field| {
            let value = record.get(field).unwrap_or_default();
            validate_with(meta, field, value)
                .error
                .map(|error| (field, error))
        })
        .collect()
}

/// Render an address using its country's display template.
///
/// Lines whose placeholders are all empty are dropped; leftover separators
/// from partially empty lines are tidied.
pub fn format_address(record: &AddressRecord) -> String {
    let meta = address_metadata(&record.country);
    meta.format
        .lines()
        .filter_map(|line| render_line(line, record))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(template: &str, record: &AddressRecord) -> Option<String> {
    let mut out = String::new();
    let mut any_value = false;
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let value = record.get(&after[..end]).unwrap_or_default().trim();
        if !value.is_empty() {
            any_value = true;
        }
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    if !any_value {
        return None;
    }

    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    let tidied = collapsed
        .replace(" ,", ",")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string();
    Some(tidied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_blank_is_invalid() {
        let result = validate_address_field("GB", "postal_code", "");
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Postcode is required"));

        let result = validate_address_field("US", "city", "   ");
        assert_eq!(result.error.as_deref(), Some("City is required"));
    }

    #[test]
    fn test_blank_invalid_exactly_when_required() {
        use crate::metadata::CountryCode;
        use strum::IntoEnumIterator;

        for code in CountryCode::iter() {
            let meta = address_metadata(code.as_str());
            for name in meta.field_names() {
                for blank in ["", "   "] {
                    let result = validate_address_field(code.as_str(), name, blank);
                    assert_eq!(
                        result.is_valid,
                        !meta.is_required(name),
                        "{code}.{name} with {blank:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_optional_blank_is_valid() {
        assert!(validate_address_field("GB", "building_name", "").is_valid);
        assert!(validate_address_field("IE", "postal_code", "").is_valid);
    }

    #[test]
    fn test_unknown_field_is_valid() {
        assert!(validate_address_field("GB", "favourite_colour", "").is_valid);
        assert!(validate_address_field("HK", "postal_code", "").is_valid);
    }

    #[test]
    fn test_pattern_mismatch_uses_configured_error() {
        let result = validate_address_field("US", "postal_code", "ABCDE");
        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Enter a 5-digit ZIP code (or ZIP+4)")
        );
        assert!(validate_address_field("US", "postal_code", "94105-1234").is_valid);
    }

    #[test]
    fn test_gb_postcode_accepts_lowercase() {
        assert!(validate_address_field("gb", "postal_code", "sw1a 1aa").is_valid);
        assert!(!validate_address_field("GB", "postal_code", "12345").is_valid);
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        assert!(validate_address_field("US", "state", "CA").is_valid);
        let result = validate_address_field("US", "state", "Narnia");
        assert_eq!(result.error.as_deref(), Some("Select a valid State"));
    }

    #[test]
    fn test_transform() {
        assert_eq!(
            transform_field_value("GB", "postal_code", "sw1a 1aa"),
            "SW1A 1AA"
        );
        assert_eq!(transform_field_value("GB", "city", "london"), "london");
        assert_eq!(transform_field_value("XX", "nope", "as is"), "as is");
    }

    #[test]
    fn test_validate_whole_record() {
        let record = AddressRecord::new("US")
            .with("address", "1 Market St")
            .with("city", "San Francisco")
            .with("postal_code", "941");
        let errors = validate_address_fields(&record);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("state").map(String::as_str), Some("State is required"));
        assert!(errors.contains_key("postal_code"));
    }

    #[test]
    fn test_hong_kong_never_requires_postcode() {
        let record = AddressRecord::new("HK")
            .with("address", "1 Queen's Road Central")
            .with("city", "Central")
            .with("state", "Hong Kong Island");
        assert!(validate_address_fields(&record).is_empty());
    }

    #[test]
    fn test_format_drops_empty_lines() {
        let record = AddressRecord::new("GB")
            .with("address", "10 Downing Street")
            .with("city", "London")
            .with("postal_code", "SW1A 2AA");
        assert_eq!(
            format_address(&record),
            "10 Downing Street\nLondon\nSW1A 2AA"
        );
    }

    #[test]
    fn test_format_tidies_partial_lines() {
        let record = AddressRecord::new("US")
            .with("address", "1 Market St")
            .with("city", "San Francisco")
            .with("postal_code", "94105");
        assert_eq!(format_address(&record), "1 Market St\nSan Francisco, 94105");
    }
}
