//! Field rules for the non-address steps
//!
//! Address fields are delegated to `shopfront_address` so the wizard and the
//! checkout form agree on what a valid address is.

use crate::draft::ProfileDraft;
use crate::step::WizardStep;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use shopfront_address::{ValidationResult, address_metadata, validate_address_field};
use std::collections::BTreeMap;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Values accepted by the `role` select
pub const ROLE_OPTIONS: &[(&str, &str)] = &[
    ("teacher", "Teacher"),
    ("teaching_assistant", "Teaching assistant"),
    ("school_leader", "School leader"),
    ("parent", "Parent or carer"),
    ("tutor", "Private tutor"),
    ("other", "Other"),
];

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("email", r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

static PHONE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| compile("phone", r"^\+?[0-9][0-9 ()\-]{6,19}$"));

fn compile(field: &'static str, pattern: &'static str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(
                field,
                pattern,
                error = %e,
                "Invalid profile field pattern; field will not be pattern-checked"
            );
            None
        }
    }
}

fn matches(re: &Option<Regex>, value: &str) -> bool {
    re.as_ref().is_none_or(|re| re.is_match(value))
}

fn required(value: &str, label: &str) -> Option<ValidationResult> {
    value
        .trim()
        .is_empty()
        .then(|| ValidationResult::invalid(format!("{label} is required")))
}

/// Validate one field given the rest of the draft (for cross-field rules).
pub fn validate_field(name: &str, draft: &ProfileDraft) -> ValidationResult {
    let value = draft.get(name);
    let trimmed = value.trim();

    let result = match name {
        "email" => required(value, "Email").or_else(|| {
            (!matches(&EMAIL_RE, trimmed))
                .then(|| ValidationResult::invalid("Enter a valid email address"))
        }),
        "password" => required(value, "Password").or_else(|| {
            (value.chars().count() < MIN_PASSWORD_LEN).then(|| {
                ValidationResult::invalid(format!(
                    "Password must be at least {MIN_PASSWORD_LEN} characters"
                ))
            })
        }),
        "confirm_password" => required(value, "Password confirmation").or_else(|| {
            (value != draft.get("password"))
                .then(|| ValidationResult::invalid("Passwords do not match"))
        }),
        "first_name" => required(value, "First name"),
        "last_name" => required(value, "Last name"),
        "phone" => (!trimmed.is_empty() && !matches(&PHONE_RE, trimmed))
            .then(|| ValidationResult::invalid("Enter a valid phone number")),
        "role" => required(value, "Role").or_else(|| {
            (!ROLE_OPTIONS.iter().any(|(v, _)| *v == trimmed))
                .then(|| ValidationResult::invalid("Select a valid role"))
        }),
        "marketing_opt_in" => (!matches!(trimmed, "" | "yes" | "no"))
            .then(|| ValidationResult::invalid("Choose yes or no")),
        "country" => required(value, "Country"),
        _ if WizardStep::for_field(name) == Some(WizardStep::Address) => {
            let outcome = validate_address_field(&draft.address.country, name, value);
            (!outcome.is_valid).then_some(outcome)
        }
        _ => None,
    };

    result.unwrap_or_else(ValidationResult::valid)
}

/// Field names validated on `step`, including the country's address fields.
pub fn step_fields(step: WizardStep, draft: &ProfileDraft) -> Vec<&'static str> {
    let mut fields = step.fields().to_vec();
    if step == WizardStep::Address {
        fields.extend(address_metadata(&draft.address.country).field_names());
    }
    fields
}

/// Errors for every field on `step`
pub fn validate_step(step: WizardStep, draft: &ProfileDraft) -> BTreeMap<String, String> {
    step_fields(step, draft)
        .into_iter()
        .filter_map(|name| {
            validate_field(name, draft)
                .error
                .map(|e| (name.to_string(), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error(name: &str, draft: &ProfileDraft) -> Option<String> {
        validate_field(name, draft).error
    }

    #[test]
    fn test_profile_patterns_compile() {
        assert!(EMAIL_RE.is_some());
        assert!(PHONE_RE.is_some());
    }

    #[test]
    fn test_email() {
        let draft = ProfileDraft::default().with("email", "not-an-email");
        assert_eq!(
            error("email", &draft).as_deref(),
            Some("Enter a valid email address")
        );
        let draft = draft.with("email", "ada@example.org");
        assert_eq!(error("email", &draft), None);
        assert_eq!(
            error("email", &ProfileDraft::default()).as_deref(),
            Some("Email is required")
        );
    }

    #[test]
    fn test_password_rules() {
        let draft = ProfileDraft::default()
            .with("password", "short")
            .with("confirm_password", "shorter");
        assert_eq!(
            error("password", &draft).as_deref(),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            error("confirm_password", &draft).as_deref(),
            Some("Passwords do not match")
        );

        let draft = draft
            .with("password", "correct horse")
            .with("confirm_password", "correct horse");
        assert_eq!(error("password", &draft), None);
        assert_eq!(error("confirm_password", &draft), None);
    }

    #[test]
    fn test_phone_is_optional_but_checked() {
        assert_eq!(error("phone", &ProfileDraft::default()), None);
        let draft = ProfileDraft::default().with("phone", "call me");
        assert!(error("phone", &draft).is_some());
        let draft = draft.with("phone", "+44 20 7946 0000");
        assert_eq!(error("phone", &draft), None);
    }

    #[test]
    fn test_role_must_be_known() {
        let draft = ProfileDraft::default().with("role", "wizard");
        assert_eq!(error("role", &draft).as_deref(), Some("Select a valid role"));
        assert_eq!(error("role", &draft.with("role", "teacher")), None);
    }

    #[test]
    fn test_address_fields_follow_country_metadata() {
        let draft = ProfileDraft::default()
            .with("country", "GB")
            .with("postal_code", "nope");
        assert_eq!(
            error("postal_code", &draft).as_deref(),
            Some("Enter a valid UK postcode")
        );

        let hk = ProfileDraft::default().with("country", "HK");
        assert!(!step_fields(WizardStep::Address, &hk).contains(&"postal_code"));
        assert_eq!(error("postal_code", &hk), None);
    }

    #[test]
    fn test_validate_step_collects_all_errors() {
        let errors = validate_step(WizardStep::Personal, &ProfileDraft::default());
        let names: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["first_name", "last_name"]);
    }
}
