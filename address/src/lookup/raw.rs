//! Raw lookup provider payloads and their normalization into [`AddressRecord`].

use crate::record::AddressRecord;
use serde::{Deserialize, Serialize};

/// Response body of both lookup endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub addresses: Vec<RawAddress>,
}

/// Address as returned by the provider; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawAddress {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub town_or_city: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub building_name: Option<String>,
    pub building_number: Option<String>,
    pub sub_building_name: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub id: Option<String>,
}

/// Trim whitespace and trailing punctuation the provider leaves behind.
pub fn clean_component(value: &str) -> String {
    value
        .trim()
        .trim_end_matches([',', ';', '.'])
        .trim_end()
        .to_string()
}

fn cleaned(value: &Option<String>) -> String {
    value.as_deref().map(clean_component).unwrap_or_default()
}

fn join_non_empty(parts: &[String], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(sep)
}

impl RawAddress {
    /// Map into the engine's address shape.
    ///
    /// `fallback_country` is used when the provider omits the country.
    pub fn normalize(&self, fallback_country: &str) -> AddressRecord {
        let line_1 = cleaned(&self.line_1);
        let line_2 = cleaned(&self.line_2);
        let number = cleaned(&self.building_number);

        let (address, address_line_2) = if !line_1.is_empty() {
            (line_1, line_2)
        } else {
            (join_non_empty(&[number, line_2], " "), String::new())
        };

        let state = match cleaned(&self.state) {
            s if s.is_empty() => cleaned(&self.county),
            s => s,
        };

        let building_name = join_non_empty(
            &[cleaned(&self.sub_building_name), cleaned(&self.building_name)],
            ", ",
        );
        // Providers often repeat the building name as line 1.
        let building_name = if building_name == address {
            String::new()
        } else {
            building_name
        };

        let country = match cleaned(&self.country) {
            c if c.is_empty() => fallback_country.to_string(),
            c => c,
        };

        AddressRecord {
            building_name,
            address,
            address_line_2,
            city: cleaned(&self.town_or_city),
            state,
            postal_code: cleaned(&self.postcode),
            country,
            id: self
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }
}
