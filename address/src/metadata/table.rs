use super::{
    CountryAddressMetadata, CountryCode, FieldConfig, FieldTransform, LayoutCell, PostcodeQuery,
};
use std::collections::BTreeMap;

const GB_POSTCODE: &str = r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$";
const US_ZIP: &str = r"^[0-9]{5}(-[0-9]{4})?$";
const CA_POSTAL: &str = r"(?i)^[A-Z][0-9][A-Z] ?[0-9][A-Z][0-9]$";
const FOUR_DIGIT_POSTCODE: &str = r"^[0-9]{4}$";
const IE_EIRCODE: &str = r"(?i)^[A-Z][0-9][0-9W] ?[A-Z0-9]{4}$";

const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

const CA_PROVINCES: &[(&str, &str)] = &[
    ("AB", "Alberta"),
    ("BC", "British Columbia"),
    ("MB", "Manitoba"),
    ("NB", "New Brunswick"),
    ("NL", "Newfoundland and Labrador"),
    ("NS", "Nova Scotia"),
    ("NT", "Northwest Territories"),
    ("NU", "Nunavut"),
    ("ON", "Ontario"),
    ("PE", "Prince Edward Island"),
    ("QC", "Quebec"),
    ("SK", "Saskatchewan"),
    ("YT", "Yukon"),
];

const AU_STATES: &[(&str, &str)] = &[
    ("ACT", "Australian Capital Territory"),
    ("NSW", "New South Wales"),
    ("NT", "Northern Territory"),
    ("QLD", "Queensland"),
    ("SA", "South Australia"),
    ("TAS", "Tasmania"),
    ("VIC", "Victoria"),
    ("WA", "Western Australia"),
];

const HK_REGIONS: &[(&str, &str)] = &[
    ("Hong Kong Island", "Hong Kong Island"),
    ("Kowloon", "Kowloon"),
    ("New Territories", "New Territories"),
];

fn cell(field: &'static str, span: u8) -> LayoutCell {
    LayoutCell { field, span }
}

fn common_lines() -> Vec<(&'static str, FieldConfig)> {
    vec![
        (
            "building_name",
            FieldConfig::text("Building name", "e.g. Riverside House")
                .with_transform(FieldTransform::CollapseWhitespace),
        ),
        (
            "address",
            FieldConfig::text("Address line 1", "Start typing your address")
                .with_transform(FieldTransform::CollapseWhitespace),
        ),
        (
            "address_line_2",
            FieldConfig::text("Address line 2", "Apartment, suite, unit")
                .with_transform(FieldTransform::CollapseWhitespace),
        ),
    ]
}

fn fields(extra: Vec<(&'static str, FieldConfig)>) -> BTreeMap<&'static str, FieldConfig> {
    common_lines().into_iter().chain(extra).collect()
}

fn gb() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Gb,
        format: "{building_name}\n{address}\n{address_line_2}\n{city}\n{state}\n{postal_code}",
        required: vec!["address", "city", "postal_code"],
        optional: vec!["building_name", "address_line_2", "state"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: true,
        postcode_query: PostcodeQuery::SeparateParam,
        fields: fields(vec![
            ("city", FieldConfig::text("Town or city", "e.g. London")),
            ("state", FieldConfig::text("County", "e.g. Greater London")),
            (
                "postal_code",
                FieldConfig::text("Postcode", "e.g. SW1A 1AA")
                    .with_pattern(GB_POSTCODE, "Enter a valid UK postcode")
                    .with_transform(FieldTransform::Uppercase),
            ),
        ]),
        layout: vec![
            vec![cell("postal_code", 6)],
            vec![cell("building_name", 12)],
            vec![cell("address", 12)],
            vec![cell("address_line_2", 12)],
            vec![cell("city", 6), cell("state", 6)],
        ],
    }
}

fn us() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Us,
        format: "{building_name}\n{address}\n{address_line_2}\n{city}, {state} {postal_code}",
        required: vec!["address", "city", "state", "postal_code"],
        optional: vec!["building_name", "address_line_2"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("City", "e.g. Springfield")),
            ("state", FieldConfig::select("State", "Select a state", US_STATES)),
            (
                "postal_code",
                FieldConfig::text("ZIP code", "e.g. 94105")
                    .with_pattern(US_ZIP, "Enter a 5-digit ZIP code (or ZIP+4)")
                    .with_transform(FieldTransform::Trim),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 5), cell("state", 4), cell("postal_code", 3)],
        ],
    }
}

fn ca() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Ca,
        format: "{building_name}\n{address}\n{address_line_2}\n{city} {state} {postal_code}",
        required: vec!["address", "city", "state", "postal_code"],
        optional: vec!["building_name", "address_line_2"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("City", "e.g. Toronto")),
            (
                "state",
                FieldConfig::select("Province", "Select a province", CA_PROVINCES),
            ),
            (
                "postal_code",
                FieldConfig::text("Postal code", "e.g. K1A 0B1")
                    .with_pattern(CA_POSTAL, "Enter a valid postal code, e.g. K1A 0B1")
                    .with_transform(FieldTransform::UppercaseCollapse),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 5), cell("state", 4), cell("postal_code", 3)],
        ],
    }
}

fn au() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Au,
        format: "{building_name}\n{address}\n{address_line_2}\n{city} {state} {postal_code}",
        required: vec!["address", "city", "state", "postal_code"],
        optional: vec!["building_name", "address_line_2"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("Suburb", "e.g. Surry Hills")),
            ("state", FieldConfig::select("State", "Select a state", AU_STATES)),
            (
                "postal_code",
                FieldConfig::text("Postcode", "e.g. 2010")
                    .with_pattern(FOUR_DIGIT_POSTCODE, "Postcode must be 4 digits")
                    .with_transform(FieldTransform::Trim),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 6), cell("state", 3), cell("postal_code", 3)],
        ],
    }
}

fn nz() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Nz,
        format: "{building_name}\n{address}\n{address_line_2}\n{city} {postal_code}",
        required: vec!["address", "city", "postal_code"],
        optional: vec!["building_name", "address_line_2"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("Town or city", "e.g. Wellington")),
            (
                "postal_code",
                FieldConfig::text("Postcode", "e.g. 6011")
                    .with_pattern(FOUR_DIGIT_POSTCODE, "Postcode must be 4 digits")
                    .with_transform(FieldTransform::Trim),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 8), cell("postal_code", 4)],
        ],
    }
}

fn ie() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Ie,
        format: "{building_name}\n{address}\n{address_line_2}\n{city}\n{state}\n{postal_code}",
        required: vec!["address", "city", "state"],
        optional: vec!["building_name", "address_line_2", "postal_code"],
        has_postcode: true,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("Town or city", "e.g. Galway")),
            ("state", FieldConfig::text("County", "e.g. Co. Galway")),
            (
                "postal_code",
                FieldConfig::text("Eircode", "e.g. D02 X285")
                    .with_pattern(IE_EIRCODE, "Enter a valid Eircode, e.g. D02 X285")
                    .with_transform(FieldTransform::UppercaseCollapse),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 4), cell("state", 4), cell("postal_code", 4)],
        ],
    }
}

fn hk() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Hk,
        format: "{address_line_2}\n{building_name}\n{address}\n{city}\n{state}",
        required: vec!["address", "city", "state"],
        optional: vec!["building_name", "address_line_2"],
        has_postcode: false,
        address_lookup_supported: true,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::Omit,
        fields: fields(vec![
            ("city", FieldConfig::text("District", "e.g. Wan Chai")),
            ("state", FieldConfig::select("Region", "Select a region", HK_REGIONS)),
        ]),
        layout: vec![
            vec![cell("address_line_2", 6), cell("building_name", 6)],
            vec![cell("address", 12)],
            vec![cell("city", 6), cell("state", 6)],
        ],
    }
}

pub(super) fn default_entry() -> CountryAddressMetadata {
    CountryAddressMetadata {
        code: CountryCode::Default,
        format: "{building_name}\n{address}\n{address_line_2}\n{city}\n{state}\n{postal_code}",
        required: vec!["address", "city"],
        optional: vec!["building_name", "address_line_2", "state", "postal_code"],
        has_postcode: true,
        address_lookup_supported: false,
        requires_postcode_for_lookup: false,
        postcode_query: PostcodeQuery::AppendToQuery,
        fields: fields(vec![
            ("city", FieldConfig::text("City", "City or town")),
            ("state", FieldConfig::text("State / Province / Region", "")),
            (
                "postal_code",
                FieldConfig::text("Postal code", "")
                    .with_transform(FieldTransform::UppercaseCollapse),
            ),
        ]),
        layout: vec![
            vec![cell("address", 12)],
            vec![cell("address_line_2", 8), cell("building_name", 4)],
            vec![cell("city", 6), cell("state", 6)],
            vec![cell("postal_code", 6)],
        ],
    }
}

pub(super) fn build() -> BTreeMap<CountryCode, CountryAddressMetadata> {
    [gb(), us(), ca(), au(), nz(), ie(), hk(), default_entry()]
        .into_iter()
        .map(|meta| (meta.code, meta))
        .collect()
}
