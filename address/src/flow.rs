//! Submit-time address validation
//!
//! ```text
//! Idle --submit--> LookingUp --match, differs--> NeedsComparison --choose--> Resolved
//!                      |                                                      ^
//!                      +--match, same / no match / error---------------------+
//! ```
//!
//! `Resolved` feeds the form's save path; submitting again restarts the flow.

use crate::compare::{AddressDifference, address_differences, compare_addresses};
use crate::errors::{AddressError, Result};
use crate::lookup::{AddressLookup, AddressLookupApi};
use crate::record::AddressRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of checking an address against the lookup provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub has_match: bool,
    pub best_match: Option<AddressRecord>,
    pub needs_comparison: bool,
    pub all_matches: Vec<AddressRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResult {
    fn no_match() -> Self {
        Self::default()
    }
}

/// Check a user-entered address against the lookup provider.
///
/// Never fails: provider errors are reported in `error` with
/// `has_match = false`. The best match is the first result, completed via
/// the retrieve endpoint when it carries an id.
pub async fn validate_address<A: AddressLookupApi>(
    lookup: &AddressLookup<A>,
    address: &AddressRecord,
) -> LookupResult {
    let postcode = Some(address.postal_code.as_str()).filter(|p| !p.trim().is_empty());

    let matches = match lookup
        .try_search(&address.address, postcode, &address.country)
        .await
    {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(
                country = %address.country,
                error = %e,
                "Address validation lookup failed"
            );
            return LookupResult {
                error: Some(e.to_string()),
                ..LookupResult::no_match()
            };
        }
    };

    let Some(first) = matches.first() else {
        return LookupResult::no_match();
    };

    let best = lookup.retrieve_details(first).await;
    let needs_comparison = !compare_addresses(address, &best);

    tracing::debug!(
        country = %address.country,
        candidates = matches.len(),
        needs_comparison,
        "Address validation lookup complete"
    );

    LookupResult {
        has_match: true,
        best_match: Some(best),
        needs_comparison,
        all_matches: matches,
        error: None,
    }
}

/// Where a resolved address is going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressUsage {
    /// Saved to the user's profile
    Profile,
    /// Used for a single order and not persisted
    OrderOnly,
}

impl AddressUsage {
    pub fn persist(&self) -> bool {
        matches!(self, Self::Profile)
    }
}

/// The user's answer on the comparison screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    KeepOriginal,
    AcceptSuggested,
}

/// Final address handed back to the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddress {
    pub address: AddressRecord,
    /// Whether the provider confirmed the address
    pub validated: bool,
    pub usage: AddressUsage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    LookingUp {
        address: AddressRecord,
    },
    NeedsComparison {
        user: AddressRecord,
        suggested: AddressRecord,
        differences: BTreeMap<&'static str, AddressDifference>,
    },
    Resolved(ResolvedAddress),
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LookingUp { .. } => "looking-up",
            Self::NeedsComparison { .. } => "needs-comparison",
            Self::Resolved(_) => "resolved",
        }
    }
}

/// Explicit state machine for validating an address on submit
#[derive(Debug, Clone)]
pub struct ValidationFlow {
    state: FlowState,
    usage: AddressUsage,
}

impl ValidationFlow {
    pub fn new(usage: AddressUsage) -> Self {
        Self {
            state: FlowState::Idle,
            usage,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn usage(&self) -> AddressUsage {
        self.usage
    }

    pub fn resolved(&self) -> Option<&ResolvedAddress> {
        match &self.state {
            FlowState::Resolved(resolved) => Some(resolved),
            _ => None,
        }
    }

    fn invalid(&self, event: &'static str) -> AddressError {
        AddressError::InvalidTransition {
            event,
            state: self.state.name(),
        }
    }

    /// User submitted the form. Allowed from `Idle` and `Resolved`.
    pub fn submit(&mut self, address: AddressRecord) -> Result<()> {
        match self.state {
            FlowState::Idle | FlowState::Resolved(_) => {
                self.state = FlowState::LookingUp { address };
                Ok(())
            }
            _ => Err(self.invalid("submit")),
        }
    }

    /// The lookup for the submitted address returned.
    pub fn lookup_finished(&mut self, result: LookupResult) -> Result<&FlowState> {
        let FlowState::LookingUp { address } = &self.state else {
            return Err(self.invalid("finish lookup"));
        };
        let user = address.clone();

        self.state = match result.best_match {
            Some(suggested) if result.has_match && result.needs_comparison => {
                FlowState::NeedsComparison {
                    differences: address_differences(&user, &suggested),
                    user,
                    suggested,
                }
            }
            Some(_) if result.has_match => FlowState::Resolved(ResolvedAddress {
                address: user,
                validated: true,
                usage: self.usage,
            }),
            _ => FlowState::Resolved(ResolvedAddress {
                address: user,
                validated: false,
                usage: self.usage,
            }),
        };
        Ok(&self.state)
    }

    /// User picked an address on the comparison screen.
    ///
    /// The flow moves to `Resolved`; a copy of the resolved address is
    /// returned for the form.
    pub fn choose(&mut self, choice: Choice) -> Result<ResolvedAddress> {
        let FlowState::NeedsComparison {
            user, suggested, ..
        } = &self.state
        else {
            return Err(self.invalid("choose"));
        };

        let address = match choice {
            Choice::KeepOriginal => user.clone(),
            Choice::AcceptSuggested => AddressRecord {
                country: if suggested.country.trim().is_empty() {
                    user.country.clone()
                } else {
                    suggested.country.clone()
                },
                ..suggested.clone()
            },
        };
        let resolved = ResolvedAddress {
            address,
            validated: choice == Choice::AcceptSuggested,
            usage: self.usage,
        };
        self.state = FlowState::Resolved(resolved.clone());
        Ok(resolved)
    }

    /// Submit `address`, look it up and apply the result in one go.
    pub async fn run<A: AddressLookupApi>(
        &mut self,
        lookup: &AddressLookup<A>,
        address: AddressRecord,
    ) -> Result<&FlowState> {
        self.submit(address.clone())?;
        let result = validate_address(lookup, &address).await;
        self.lookup_finished(result)
    }

    pub fn reset(&mut self) {
        self.state = FlowState::Idle;
    }
}
