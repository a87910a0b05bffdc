//! Country display name to ISO code resolution
//!
//! The storefront's countries API hands us display names; the metadata table
//! is keyed by ISO code. Names missing from this dictionary resolve to `None`
//! and callers fall back to the generic metadata.

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("united kingdom", "GB"),
    ("great britain", "GB"),
    ("uk", "GB"),
    ("england", "GB"),
    ("scotland", "GB"),
    ("wales", "GB"),
    ("northern ireland", "GB"),
    ("united states", "US"),
    ("united states of america", "US"),
    ("usa", "US"),
    ("canada", "CA"),
    ("australia", "AU"),
    ("new zealand", "NZ"),
    ("ireland", "IE"),
    ("republic of ireland", "IE"),
    ("hong kong", "HK"),
    ("hong kong sar", "HK"),
    ("france", "FR"),
    ("germany", "DE"),
    ("spain", "ES"),
    ("italy", "IT"),
    ("portugal", "PT"),
    ("netherlands", "NL"),
    ("belgium", "BE"),
    ("luxembourg", "LU"),
    ("switzerland", "CH"),
    ("austria", "AT"),
    ("denmark", "DK"),
    ("sweden", "SE"),
    ("norway", "NO"),
    ("finland", "FI"),
    ("iceland", "IS"),
    ("poland", "PL"),
    ("czech republic", "CZ"),
    ("greece", "GR"),
    ("cyprus", "CY"),
    ("malta", "MT"),
    ("singapore", "SG"),
    ("malaysia", "MY"),
    ("japan", "JP"),
    ("south korea", "KR"),
    ("china", "CN"),
    ("india", "IN"),
    ("united arab emirates", "AE"),
    ("saudi arabia", "SA"),
    ("qatar", "QA"),
    ("south africa", "ZA"),
    ("nigeria", "NG"),
    ("kenya", "KE"),
    ("mexico", "MX"),
    ("brazil", "BR"),
    ("argentina", "AR"),
    ("chile", "CL"),
];

/// Resolve a country display name to its ISO code.
///
/// Matching ignores case and surrounding whitespace.
pub fn country_code(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    COUNTRY_NAMES
        .iter()
        .find(|(known, _)| *known == needle)
        .map(|&(_, code)| code)
}

/// Accept either a display name ("Hong Kong") or an ISO code ("hk") and
/// return the uppercase code.
pub fn resolve_country(value: &str) -> String {
    country_code(value)
        .map(str::to_string)
        .unwrap_or_else(|| value.trim().to_uppercase())
}
