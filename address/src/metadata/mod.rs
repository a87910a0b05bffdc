//! Country address metadata
//!
//! Static per-country field definitions: labels, placeholders, which fields
//! are required, validation patterns, value transforms, form layout and how
//! the lookup endpoint wants its postcode. Built once on first access and
//! never mutated afterwards.

mod table;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Countries with dedicated address metadata.
///
/// Anything else resolves to [`CountryCode::Default`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CountryCode {
    #[strum(serialize = "GB")]
    Gb,
    #[strum(serialize = "US")]
    Us,
    #[strum(serialize = "CA")]
    Ca,
    #[strum(serialize = "AU")]
    Au,
    #[strum(serialize = "NZ")]
    Nz,
    #[strum(serialize = "IE")]
    Ie,
    #[strum(serialize = "HK")]
    Hk,
    #[strum(serialize = "DEFAULT")]
    Default,
}

impl CountryCode {
    /// Resolve a (case-insensitive) ISO code, falling back to `Default`
    /// for blank or unmapped codes.
    pub fn resolve(code: &str) -> Self {
        Self::from_str(code.trim()).unwrap_or(Self::Default)
    }

    /// ISO code as used on the wire
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Widget used to collect a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Select,
}

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Pure value transform applied as the user types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTransform {
    Uppercase,
    Trim,
    CollapseWhitespace,
    /// Uppercase and collapse runs of whitespace to one space
    UppercaseCollapse,
}

impl FieldTransform {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::Uppercase => value.to_uppercase(),
            Self::Trim => value.trim().to_string(),
            Self::CollapseWhitespace => collapse_whitespace(value),
            Self::UppercaseCollapse => collapse_whitespace(&value.to_uppercase()),
        }
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Configuration for a single address field
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    /// Only populated for `FieldKind::Select`
    pub options: Vec<SelectOption>,
    /// Source of `pattern`, kept for diagnostics
    pub pattern_source: Option<&'static str>,
    pub pattern: Option<Regex>,
    pub error: Option<&'static str>,
    pub transform: Option<FieldTransform>,
}

impl FieldConfig {
    pub(crate) fn text(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            kind: FieldKind::Text,
            options: Vec::new(),
            pattern_source: None,
            pattern: None,
            error: None,
            transform: None,
        }
    }

    pub(crate) fn select(
        label: &'static str,
        placeholder: &'static str,
        options: &[(&'static str, &'static str)],
    ) -> Self {
        Self {
            kind: FieldKind::Select,
            options: options
                .iter()
                .map(|&(value, label)| SelectOption { value, label })
                .collect(),
            ..Self::text(label, placeholder)
        }
    }

    pub(crate) fn with_pattern(mut self, pattern: &'static str, error: &'static str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => self.pattern = Some(re),
            Err(e) => tracing::error!(
                pattern,
                label = self.label,
                error = %e,
                "Invalid address field pattern; field will not be pattern-checked"
            ),
        }
        self.pattern_source = Some(pattern);
        self.error = Some(error);
        self
    }

    pub(crate) fn with_transform(mut self, transform: FieldTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Whether `value` is one of the select options (always true for text fields)
    pub fn accepts_option(&self, value: &str) -> bool {
        self.kind == FieldKind::Text || self.options.iter().any(|o| o.value == value)
    }
}

/// How a postcode is passed to the lookup endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostcodeQuery {
    /// Sent as its own `postcode=` parameter
    SeparateParam,
    /// Appended to the free-text query
    AppendToQuery,
    /// Never sent
    Omit,
}

/// A single cell of the form layout grid (12 columns per row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutCell {
    pub field: &'static str,
    pub span: u8,
}

/// Columns available in one layout row
pub const LAYOUT_COLUMNS: u8 = 12;

/// Address metadata for one country
#[derive(Debug, Clone)]
pub struct CountryAddressMetadata {
    pub code: CountryCode,
    /// Display template, one output line per `\n`, `{field}` placeholders
    pub format: &'static str,
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    pub has_postcode: bool,
    pub address_lookup_supported: bool,
    pub requires_postcode_for_lookup: bool,
    pub postcode_query: PostcodeQuery,
    pub fields: BTreeMap<&'static str, FieldConfig>,
    pub layout: Vec<Vec<LayoutCell>>,
}

impl CountryAddressMetadata {
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(&name)
    }

    /// Required fields followed by optional ones, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }

    /// Whether the address-line input can be used yet.
    ///
    /// Countries that need a postcode before lookup keep the address line
    /// disabled until one is entered; postcode-less countries never wait.
    pub fn address_input_enabled(&self, postcode: &str) -> bool {
        if self.has_postcode && self.requires_postcode_for_lookup {
            return !postcode.trim().is_empty();
        }
        true
    }

    /// Names listed in `required`/`optional`/`layout` that have no field config
    pub fn dangling_field_names(&self) -> Vec<&'static str> {
        self.field_names()
            .chain(self.layout.iter().flatten().map(|c| c.field))
            .filter(|name| !self.fields.contains_key(name))
            .collect()
    }
}

static METADATA: Lazy<BTreeMap<CountryCode, CountryAddressMetadata>> = Lazy::new(table::build);

/// Metadata for a known country code
pub fn metadata_for(code: CountryCode) -> &'static CountryAddressMetadata {
    match METADATA.get(&code) {
        Some(meta) => meta,
        None => default_metadata(),
    }
}

fn default_metadata() -> &'static CountryAddressMetadata {
    static FALLBACK: Lazy<CountryAddressMetadata> = Lazy::new(table::default_entry);
    METADATA.get(&CountryCode::Default).unwrap_or(&FALLBACK)
}

/// Metadata for an ISO code string.
///
/// Case-insensitive; blank or unmapped codes get the generic `DEFAULT` entry.
pub fn address_metadata(code: &str) -> &'static CountryAddressMetadata {
    metadata_for(CountryCode::resolve(code))
}

/// Codes with dedicated (non-default) metadata
pub fn supported_countries() -> Vec<CountryCode> {
    METADATA
        .keys()
        .copied()
        .filter(|c| *c != CountryCode::Default)
        .collect()
}
