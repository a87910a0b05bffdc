use crate::step::WizardStep;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{step} step has {} invalid field(s)", errors.len())]
    StepInvalid {
        step: WizardStep,
        errors: BTreeMap<String, String>,
    },

    #[error("cannot jump to {0} before reaching it")]
    StepNotReached(WizardStep),

    #[error("no step after {0}")]
    NoNextStep(WizardStep),

    #[error("no step before {0}")]
    NoPreviousStep(WizardStep),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("{field} belongs to the {step} step")]
    FieldNotOnStep { field: String, step: WizardStep },

    #[error("profile can only be submitted from the review step")]
    NotOnReview,

    #[error("profile already submitted")]
    AlreadySubmitted,
}

pub type Result<T> = std::result::Result<T, WizardError>;
