use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Whether the wizard creates an account or edits an existing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    Register,
    /// Skips the account step; credentials are managed elsewhere
    EditProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Account,
    Personal,
    Address,
    Preferences,
    Review,
}

impl WizardStep {
    /// Steps in order for a mode
    pub fn sequence(mode: WizardMode) -> &'static [WizardStep] {
        match mode {
            WizardMode::Register => &[
                Self::Account,
                Self::Personal,
                Self::Address,
                Self::Preferences,
                Self::Review,
            ],
            WizardMode::EditProfile => {
                &[Self::Personal, Self::Address, Self::Preferences, Self::Review]
            }
        }
    }

    pub fn first(mode: WizardMode) -> Self {
        match mode {
            WizardMode::Register => Self::Account,
            WizardMode::EditProfile => Self::Personal,
        }
    }

    fn position(&self, mode: WizardMode) -> Option<usize> {
        Self::sequence(mode).iter().position(|s| s == self)
    }

    pub fn next(&self, mode: WizardMode) -> Option<Self> {
        let idx = self.position(mode)?;
        Self::sequence(mode).get(idx + 1).copied()
    }

    pub fn previous(&self, mode: WizardMode) -> Option<Self> {
        let idx = self.position(mode)?;
        idx.checked_sub(1)
            .and_then(|i| Self::sequence(mode).get(i).copied())
    }

    /// Field names collected on this step (address fields come from the
    /// country metadata instead)
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Account => &["email", "password", "confirm_password"],
            Self::Personal => &["first_name", "last_name", "phone", "organisation"],
            Self::Address => &["country"],
            Self::Preferences => &["role", "subjects", "marketing_opt_in"],
            Self::Review => &[],
        }
    }

    /// Step that owns `field`, if any
    pub fn for_field(field: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        if shopfront_address::ADDRESS_FIELDS.contains(&field) {
            return Some(Self::Address);
        }
        Self::iter().find(|step| step.fields().contains(&field))
    }
}
