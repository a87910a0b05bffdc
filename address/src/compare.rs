//! Comparison between a user-entered address and a lookup suggestion

use crate::record::{ADDRESS_FIELDS, AddressRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fields that decide whether two addresses are the same place
const MATCH_FIELDS: &[&str] = &["address", "city", "postal_code"];

/// One differing field, as shown side by side to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressDifference {
    pub user: String,
    pub suggested: String,
}

/// Lowercase, collapse internal whitespace, trim.
pub fn normalize_for_comparison(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalized_field(record: &AddressRecord, field: &str) -> String {
    normalize_for_comparison(record.get(field).unwrap_or_default())
}

/// True when `address`, `city` and `postal_code` all match after normalization.
pub fn compare_addresses(a: &AddressRecord, b: &AddressRecord) -> bool {
    MATCH_FIELDS
        .iter()
        .all(|field| normalized_field(a, field) == normalized_field(b, field))
}

/// Every field of the fixed display list whose normalized values differ.
pub fn address_differences(
    user: &AddressRecord,
    suggested: &AddressRecord,
) -> BTreeMap<&'static str, AddressDifference> {
    ADDRESS_FIELDS
        .iter()
        .filter(|field| normalized_field(user, field) != normalized_field(suggested, field))
        .map(|&field| {
            (
                field,
                AddressDifference {
                    user: user.get(field).unwrap_or_default().to_string(),
                    suggested: suggested.get(field).unwrap_or_default().to_string(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn downing(address: &str, city: &str, postal_code: &str) -> AddressRecord {
        AddressRecord::new("GB")
            .with("address", address)
            .with("city", city)
            .with("postal_code", postal_code)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_for_comparison("  10   Downing\tSTREET "), "10 downing street");
        assert_eq!(normalize_for_comparison(""), "");
    }

    #[test]
    fn test_case_and_whitespace_insensitive_match() {
        let a = downing("10 Downing Street", "London", "SW1A 2AA");
        let b = downing("10 DOWNING STREET", "london", "sw1a 2aa");
        assert!(compare_addresses(&a, &b));
    }

    #[test]
    fn test_any_match_field_difference_fails() {
        let a = downing("10 Downing Street", "London", "SW1A 2AA");
        assert!(!compare_addresses(&a, &downing("11 Downing Street", "London", "SW1A 2AA")));
        assert!(!compare_addresses(&a, &downing("10 Downing Street", "Leeds", "SW1A 2AA")));
        assert!(!compare_addresses(&a, &downing("10 Downing Street", "London", "SW1A 2AB")));
    }

    #[test]
    fn test_non_match_fields_ignored_by_compare() {
        let a = downing("10 Downing Street", "London", "SW1A 2AA");
        let b = downing("10 Downing Street", "London", "SW1A 2AA").with("state", "Greater London");
        assert!(compare_addresses(&a, &b));
        assert_eq!(address_differences(&a, &b).len(), 1);
    }

    #[test]
    fn test_differences_report_original_values() {
        let user = downing("10 downing st", "London", "sw1a 2aa");
        let suggested = downing("10 Downing Street", "LONDON", "SW1A 2AA");
        let diff = address_differences(&user, &suggested);

        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.get("address"),
            Some(&AddressDifference {
                user: "10 downing st".to_string(),
                suggested: "10 Downing Street".to_string(),
            })
        );
    }
}
