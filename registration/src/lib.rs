//! Multi-step registration and profile wizard
//!
//! Steps run `Account -> Personal -> Address -> Preferences -> Review`
//! (profile editing skips `Account`). Address fields are validated and
//! transformed with the same country metadata the checkout uses.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod draft;
pub mod errors;
pub mod rules;
pub mod step;
pub mod wizard;

pub use draft::ProfileDraft;
pub use errors::{Result, WizardError};
pub use rules::{ROLE_OPTIONS, validate_field, validate_step};
pub use step::{WizardMode, WizardStep};
pub use wizard::{ProfileSubmission, RegistrationWizard, WizardState};
