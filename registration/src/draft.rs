//! Profile values collected by the wizard

use serde::Serialize;
use shopfront_address::{ADDRESS_FIELDS, AddressRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Fields never echoed back in submissions or change sets
pub const SECRET_FIELDS: &[&str] = &["password", "confirm_password"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    pub fields: BTreeMap<String, String>,
    pub address: AddressRecord,
}

fn is_address_field(name: &str) -> bool {
    name == "country" || ADDRESS_FIELDS.contains(&name)
}

impl ProfileDraft {
    pub fn get(&self, name: &str) -> &str {
        if is_address_field(name) {
            return self.address.get(name).unwrap_or_default();
        }
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if is_address_field(name) {
            self.address.set(name, value);
        } else {
            self.fields.insert(name.to_string(), value.into());
        }
    }

    /// Builder-style setter for fixtures and existing profiles
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Every field name that has ever been given a value on either draft
    fn all_names<'a>(&'a self, other: &'a Self) -> BTreeSet<&'a str> {
        self.fields
            .keys()
            .chain(other.fields.keys())
            .map(String::as_str)
            .chain(ADDRESS_FIELDS.iter().copied())
            .chain(std::iter::once("country"))
            .collect()
    }

    /// Names whose values differ from `baseline`, ignoring surrounding
    /// whitespace and secret fields
    pub fn changed_since(&self, baseline: &Self) -> BTreeSet<String> {
        self.all_names(baseline)
            .into_iter()
            .filter(|name| !SECRET_FIELDS.contains(name))
            .filter(|name| self.get(name).trim() != baseline.get(name).trim())
            .map(str::to_string)
            .collect()
    }

    /// Copy with secrets removed
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        for secret in SECRET_FIELDS {
            out.fields.remove(*secret);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_address_fields_route_to_record() {
        let draft = ProfileDraft::default()
            .with("postal_code", "SW1A 1AA")
            .with("country", "GB")
            .with("first_name", "Ada");
        assert_eq!(draft.address.postal_code, "SW1A 1AA");
        assert_eq!(draft.address.country, "GB");
        assert_eq!(draft.get("first_name"), "Ada");
        assert_eq!(draft.get("missing"), "");
    }

    #[test]
    fn test_changed_since() {
        let base = ProfileDraft::default()
            .with("first_name", "Ada")
            .with("city", "London");
        let edited = base
            .clone()
            .with("first_name", "Ada ")
            .with("city", "Leeds")
            .with("phone", "0113 496 0000")
            .with("password", "hunter22");

        let changed: Vec<String> = edited.changed_since(&base).into_iter().collect();
        assert_eq!(changed, vec!["city".to_string(), "phone".to_string()]);
    }

    #[test]
    fn test_redacted_drops_secrets() {
        let draft = ProfileDraft::default()
            .with("email", "a@example.com")
            .with("password", "hunter22")
            .with("confirm_password", "hunter22");
        let redacted = draft.redacted();
        assert_eq!(redacted.get("password"), "");
        assert_eq!(redacted.get("email"), "a@example.com");
    }
}
