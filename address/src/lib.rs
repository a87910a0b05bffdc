//! Address engine for the storefront checkout and profile forms
//!
//! Provides:
//! - Static per-country address metadata (labels, required fields, patterns,
//!   transforms, layout, lookup capabilities) with a generic fallback
//! - Field validation and value transforms cheap enough for every keystroke
//! - An address lookup client that shapes queries per country and degrades
//!   provider failures to "no suggestions"
//! - Comparison of user-entered addresses against lookup suggestions and the
//!   submit-time validation state machine built on top of it

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod compare;
pub mod config;
pub mod countries;
pub mod errors;
pub mod flow;
pub mod lookup;
pub mod metadata;
pub mod record;
pub mod validation;

pub use compare::{AddressDifference, address_differences, compare_addresses};
pub use config::AddressConfig;
pub use countries::{country_code, resolve_country};
pub use errors::{AddressError, ErrorCategory, Result};
pub use flow::{
    AddressUsage, Choice, FlowState, LookupResult, ResolvedAddress, ValidationFlow,
    validate_address,
};
pub use lookup::{
    AddressLookup, AddressLookupApi, HttpLookupApi, LookupQuery, LookupSequencer, LookupTicket,
    RawAddress,
};
pub use metadata::{
    CountryAddressMetadata, CountryCode, FieldConfig, FieldKind, FieldTransform, LayoutCell,
    PostcodeQuery, SelectOption, address_metadata, metadata_for, supported_countries,
};
pub use record::{ADDRESS_FIELDS, AddressRecord};
pub use validation::{
    ValidationResult, format_address, transform_field_value, validate_address_field,
    validate_address_fields,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
