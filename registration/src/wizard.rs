//! Registration / profile wizard state machine
//!
//! The wizard owns the draft, the step cursor and the "has the user
//! interacted" bookkeeping. Errors for a field are only surfaced once the
//! field was touched or the user tried to leave the step.

use crate::draft::ProfileDraft;
use crate::errors::{Result, WizardError};
use crate::rules::{validate_field, validate_step};
use crate::step::{WizardMode, WizardStep};
use serde::Serialize;
use shopfront_address::{
    ResolvedAddress, ValidationResult, address_metadata, resolve_country, transform_field_value,
};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    InProgress(WizardStep),
    Submitted,
}

/// What the wizard hands to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSubmission {
    pub mode: WizardMode,
    pub profile: ProfileDraft,
    /// Fields that differ from the profile the wizard started with
    pub changed: BTreeSet<String>,
    /// Whether the address was confirmed by the lookup provider
    pub address_validated: bool,
}

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    mode: WizardMode,
    state: WizardState,
    draft: ProfileDraft,
    initial: ProfileDraft,
    touched: BTreeSet<String>,
    attempted: BTreeSet<WizardStep>,
    furthest: WizardStep,
    address_validated: bool,
}

impl RegistrationWizard {
    /// New account registration with the address country preselected
    pub fn register(default_country: &str) -> Self {
        let draft = ProfileDraft::default().with("country", resolve_country(default_country));
        Self::start(WizardMode::Register, draft)
    }

    /// Edit an existing profile; change tracking is relative to `existing`
    pub fn edit(existing: ProfileDraft) -> Self {
        Self::start(WizardMode::EditProfile, existing)
    }

    fn start(mode: WizardMode, draft: ProfileDraft) -> Self {
        let first = WizardStep::first(mode);
        Self {
            mode,
            state: WizardState::InProgress(first),
            initial: draft.clone(),
            draft,
            touched: BTreeSet::new(),
            attempted: BTreeSet::new(),
            furthest: first,
            address_validated: false,
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    fn current(&self) -> Result<WizardStep> {
        match self.state {
            WizardState::InProgress(step) => Ok(step),
            WizardState::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    pub fn current_step(&self) -> Option<WizardStep> {
        self.current().ok()
    }

    /// Apply an input change on the current step.
    ///
    /// Address values are transformed per country (e.g. uppercase
    /// postcodes); a country given by display name is stored as its code.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<ValidationResult> {
        let step = self.current()?;
        let owner =
            WizardStep::for_field(name).ok_or_else(|| WizardError::UnknownField(name.to_string()))?;
        if owner != step {
            return Err(WizardError::FieldNotOnStep {
                field: name.to_string(),
                step: owner,
            });
        }

        match name {
            "country" => self.change_country(value),
            _ if step == WizardStep::Address => {
                let transformed = transform_field_value(&self.draft.address.country, name, value);
                self.draft.set(name, transformed);
                self.address_validated = false;
            }
            _ => self.draft.set(name, value),
        }
        self.touched.insert(name.to_string());

        Ok(validate_field(name, &self.draft))
    }

    fn change_country(&mut self, value: &str) {
        let code = resolve_country(value);
        if code == self.draft.address.country {
            return;
        }

        // Drop values the new country has no field for.
        let meta = address_metadata(&code);
        for field in shopfront_address::ADDRESS_FIELDS {
            if meta.field(field).is_none() {
                self.draft.set(field, "");
            }
        }
        tracing::debug!(from = %self.draft.address.country, to = %code, "Address country changed");
        self.draft.set("country", code);
        self.address_validated = false;
    }

    /// Errors the form should show right now for the current step
    pub fn errors_for_display(&self) -> BTreeMap<String, String> {
        let Ok(step) = self.current() else {
            return BTreeMap::new();
        };
        let reveal_all = self.attempted.contains(&step);
        validate_step(step, &self.draft)
            .into_iter()
            .filter(|(name, _)| reveal_all || self.touched.contains(name))
            .collect()
    }

    /// Validate the current step and move forward.
    ///
    /// On failure the wizard stays put and reveals every error on the step.
    pub fn advance(&mut self) -> Result<WizardStep> {
        let step = self.current()?;
        self.attempted.insert(step);

        let errors = validate_step(step, &self.draft);
        if !errors.is_empty() {
            tracing::debug!(%step, invalid = errors.len(), "Wizard step blocked");
            return Err(WizardError::StepInvalid { step, errors });
        }

        let next = step
            .next(self.mode)
            .ok_or(WizardError::NoNextStep(step))?;
        self.state = WizardState::InProgress(next);
        if next > self.furthest {
            self.furthest = next;
        }
        tracing::debug!(from = %step, to = %next, "Wizard advanced");
        Ok(next)
    }

    /// Move back one step without validating
    pub fn back(&mut self) -> Result<WizardStep> {
        let step = self.current()?;
        let previous = step
            .previous(self.mode)
            .ok_or(WizardError::NoPreviousStep(step))?;
        self.state = WizardState::InProgress(previous);
        Ok(previous)
    }

    /// Jump to a step the user has already reached
    pub fn go_to(&mut self, target: WizardStep) -> Result<()> {
        self.current()?;
        let reachable = WizardStep::sequence(self.mode).contains(&target) && target <= self.furthest;
        if !reachable {
            return Err(WizardError::StepNotReached(target));
        }
        self.state = WizardState::InProgress(target);
        Ok(())
    }

    /// Take the address chosen in the submit-time validation flow
    pub fn apply_resolved_address(&mut self, resolved: &ResolvedAddress) -> Result<()> {
        self.current()?;
        let country = self.draft.address.country.clone();
        self.draft.address = resolved.address.clone();
        if self.draft.address.country.trim().is_empty() {
            self.draft.address.country = country;
        }
        for field in shopfront_address::ADDRESS_FIELDS {
            if !self.draft.get(field).is_empty() {
                self.touched.insert((*field).to_string());
            }
        }
        self.address_validated = resolved.validated;
        Ok(())
    }

    pub fn changed_fields(&self) -> BTreeSet<String> {
        self.draft.changed_since(&self.initial)
    }

    pub fn is_dirty(&self) -> bool {
        !self.changed_fields().is_empty()
    }

    /// Finish the wizard from the review step.
    ///
    /// Every step is re-validated; the first failing step becomes current.
    pub fn submit(&mut self) -> Result<ProfileSubmission> {
        let step = self.current()?;
        if step != WizardStep::Review {
            return Err(WizardError::NotOnReview);
        }

        for &check in WizardStep::sequence(self.mode) {
            let errors = validate_step(check, &self.draft);
            if !errors.is_empty() {
                self.attempted.insert(check);
                self.state = WizardState::InProgress(check);
                return Err(WizardError::StepInvalid {
                    step: check,
                    errors,
                });
            }
        }

        let mut profile = self.draft.clone();
        profile.fields.remove("confirm_password");
        if self.mode == WizardMode::EditProfile {
            profile = profile.redacted();
        }

        let submission = ProfileSubmission {
            mode: self.mode,
            profile,
            changed: self.changed_fields(),
            address_validated: self.address_validated,
        };
        self.state = WizardState::Submitted;
        tracing::info!(
            mode = ?self.mode,
            changed = submission.changed.len(),
            "Profile submitted"
        );
        Ok(submission)
    }
}
