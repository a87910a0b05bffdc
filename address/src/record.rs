//! Address value type shared by the form, the lookup client and the
//! comparison engine.

use serde::{Deserialize, Serialize};

/// Field names in the order they are compared and displayed.
pub const ADDRESS_FIELDS: &[&str] = &[
    "building_name",
    "address",
    "address_line_2",
    "city",
    "state",
    "postal_code",
];

/// A postal address. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_line_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    /// Provider id for records that came from a lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl AddressRecord {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter, mostly for tests and fixtures
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Value of a named field; `None` for unknown names
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "building_name" => &self.building_name,
            "address" => &self.address,
            "address_line_2" => &self.address_line_2,
            "city" => &self.city,
            "state" => &self.state,
            "postal_code" => &self.postal_code,
            "country" => &self.country,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Apply an `onChange`-style `{ name, value }` event.
    ///
    /// Returns `false` (and changes nothing) for unknown names.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "building_name" => &mut self.building_name,
            "address" => &mut self.address,
            "address_line_2" => &mut self.address_line_2,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "postal_code" => &mut self.postal_code,
            "country" => &mut self.country,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// True when no address field has a value
    pub fn is_blank(&self) -> bool {
        ADDRESS_FIELDS
            .iter()
            .filter_map(|f| self.get(f))
            .all(|v| v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_by_name() {
        let mut record = AddressRecord::new("GB");
        assert!(record.set("postal_code", "SW1A 1AA"));
        assert_eq!(record.get("postal_code"), Some("SW1A 1AA"));
        assert!(!record.set("planet", "Mars"));
        assert_eq!(record.get("planet"), None);
    }

    #[test]
    fn test_is_blank_ignores_country() {
        assert!(AddressRecord::new("US").is_blank());
        assert!(!AddressRecord::new("US").with("city", "Boston").is_blank());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let record: AddressRecord =
            serde_json::from_str(r#"{"address":"1 Main St","country":"US"}"#).expect("parse");
        assert_eq!(record.address, "1 Main St");
        assert_eq!(record.city, "");
        assert_eq!(record.id, None);
    }
}
