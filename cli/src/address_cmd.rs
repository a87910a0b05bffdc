//! Address CLI Commands
//!
//! ## Commands
//!
//! - `shopfront countries` - List countries with dedicated address metadata
//! - `shopfront fields <COUNTRY>` - Show the form fields for a country
//! - `shopfront validate-field` - Transform and validate a single value
//! - `shopfront lookup` - Search the lookup provider
//! - `shopfront check` - Validate a full address and compare it to the best match

use crate::exit_code;
use anyhow::Context;
use clap::{Args, Subcommand};
use shopfront_address::{
    AddressConfig, AddressLookup, AddressRecord, CountryAddressMetadata, FieldKind, LookupResult,
    address_differences, address_metadata, format_address, resolve_country, supported_countries,
    transform_field_value, validate_address, validate_address_field, validate_address_fields,
};
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum AddressSubcommand {
    /// List countries with dedicated address metadata
    Countries,

    /// Show the address form definition for a country
    Fields(FieldsArgs),

    /// Apply the country's transform to a value and validate it
    ValidateField(ValidateFieldArgs),

    /// Search for address suggestions
    Lookup(LookupArgs),

    /// Validate a complete address and check it against the lookup provider
    ///
    /// Exit codes: 0 confirmed, 1 needs attention (no match or the best
    /// match differs), 2 invalid fields, 3 configuration error.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Country name or ISO code
    pub country: String,
}

#[derive(Debug, Args)]
pub struct ValidateFieldArgs {
    /// Country name or ISO code
    #[arg(long)]
    pub country: String,

    /// Field name, e.g. postal_code
    #[arg(long)]
    pub field: String,

    /// Raw value as typed by the user
    #[arg(long)]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Country name or ISO code
    #[arg(long)]
    pub country: String,

    /// Free-text address query
    #[arg(long, default_value = "")]
    pub query: String,

    /// Postcode, for countries that search by postcode
    #[arg(long)]
    pub postcode: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Country name or ISO code
    #[arg(long)]
    pub country: String,

    #[arg(long, default_value = "")]
    pub building_name: String,

    /// First address line
    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub address_line_2: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub state: String,

    #[arg(long, default_value = "")]
    pub postal_code: String,
}

impl CheckArgs {
    /// Build the record the form would submit, with per-field transforms applied
    fn to_record(&self) -> AddressRecord {
        let country = resolve_country(&self.country);
        let mut record = AddressRecord::new(country.clone());
        for (field, value) in [
            ("building_name", &self.building_name),
            ("address", &self.address),
            ("address_line_2", &self.address_line_2),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ] {
            record.set(field, transform_field_value(&country, field, value));
        }
        record
    }
}

/// Load the address config, honouring an explicit path and base URL override
pub fn load_config(
    path: Option<&Path>,
    api_base_url: Option<String>,
) -> anyhow::Result<AddressConfig> {
    let cfg = match path {
        Some(path) => AddressConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AddressConfig::load().context("loading address config")?,
    };
    match api_base_url {
        Some(url) => cfg.with_api_base_url(url).context("applying --api-base-url"),
        None => Ok(cfg),
    }
}

pub async fn run(command: AddressSubcommand, cfg: &AddressConfig, json: bool) -> i32 {
    match command {
        AddressSubcommand::Countries => run_countries(json),
        AddressSubcommand::Fields(args) => run_fields(&args, json),
        AddressSubcommand::ValidateField(args) => run_validate_field(&args, json),
        AddressSubcommand::Lookup(args) => run_lookup(&args, cfg, json).await,
        AddressSubcommand::Check(args) => run_check(&args, cfg, json).await,
    }
}

fn run_countries(json: bool) -> i32 {
    let countries = supported_countries();
    if json {
        let out: Vec<serde_json::Value> = countries
            .iter()
            .map(|code| {
                let meta = address_metadata(code.as_str());
                serde_json::json!({
                    "code": code.as_str(),
                    "has_postcode": meta.has_postcode,
                    "address_lookup_supported": meta.address_lookup_supported,
                    "requires_postcode_for_lookup": meta.requires_postcode_for_lookup,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(out));
    } else {
        for code in countries {
            let meta = address_metadata(code.as_str());
            let lookup = if !meta.address_lookup_supported {
                "no lookup"
            } else if meta.requires_postcode_for_lookup {
                "lookup by postcode"
            } else {
                "lookup"
            };
            println!("{code}  {lookup}");
        }
    }
    exit_code::OK
}

fn fields_json(meta: &CountryAddressMetadata) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = meta
        .field_names()
        .filter_map(|name| meta.field(name).map(|f| (name, f)))
        .map(|(name, f)| {
            serde_json::json!({
                "name": name,
                "label": f.label,
                "placeholder": f.placeholder,
                "kind": f.kind,
                "required": meta.is_required(name),
                "options": f.options,
                "pattern": f.pattern_source,
                "error": f.error,
            })
        })
        .collect();
    serde_json::json!({
        "code": meta.code.as_str(),
        "format": meta.format,
        "postcode_query": meta.postcode_query,
        "fields": fields,
        "layout": meta.layout,
    })
}

fn run_fields(args: &FieldsArgs, json: bool) -> i32 {
    let meta = address_metadata(&resolve_country(&args.country));
    if json {
        print_json(&fields_json(meta));
        return exit_code::OK;
    }

    println!("\n Address fields for {}\n", meta.code);
    for name in meta.field_names() {
        let Some(field) = meta.field(name) else {
            continue;
        };
        let marker = if meta.is_required(name) { "*" } else { " " };
        let kind = match field.kind {
            FieldKind::Text => "text".to_string(),
            FieldKind::Select => format!("select, {} options", field.options.len()),
        };
        println!("{marker} {name:<16} {:<20} ({kind})", field.label);
    }
    println!();
    exit_code::OK
}

fn run_validate_field(args: &ValidateFieldArgs, json: bool) -> i32 {
    let country = resolve_country(&args.country);
    let value = transform_field_value(&country, &args.field, &args.value);
    let result = validate_address_field(&country, &args.field, &value);

    if json {
        print_json(&serde_json::json!({
            "country": country,
            "field": args.field,
            "value": value,
            "is_valid": result.is_valid,
            "error": result.error,
        }));
    } else {
        match &result.error {
            None => println!("[OK]   {}: {value}", args.field),
            Some(error) => println!("[FAIL] {}: {value}  ({error})", args.field),
        }
    }

    if result.is_valid {
        exit_code::OK
    } else {
        exit_code::ATTENTION
    }
}

async fn run_lookup(args: &LookupArgs, cfg: &AddressConfig, json: bool) -> i32 {
    let country = resolve_country(&args.country);
    let lookup = AddressLookup::from_config(cfg);
    let postcode = args.postcode.as_deref().filter(|p| !p.trim().is_empty());

    let results = match lookup.try_search(&args.query, postcode, &country).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!(
                category = e.category().as_str(),
                error = %e,
                "Address lookup failed"
            );
            return exit_code::INFRA;
        }
    };

    if json {
        print_json(&serde_json::json!(results));
    } else if results.is_empty() {
        println!("No addresses found. Enter the address manually.");
    } else {
        for (i, record) in results.iter().enumerate() {
            println!("{:>3}. {}", i + 1, format_address(record).replace('\n', ", "));
        }
    }

    if results.is_empty() {
        exit_code::ATTENTION
    } else {
        exit_code::OK
    }
}

async fn run_check(args: &CheckArgs, cfg: &AddressConfig, json: bool) -> i32 {
    let record = args.to_record();

    let errors = validate_address_fields(&record);
    if !errors.is_empty() {
        if json {
            print_json(&serde_json::json!({ "address": record, "errors": errors }));
        } else {
            for (field, error) in &errors {
                println!("[FAIL] {field}: {error}");
            }
        }
        return exit_code::INVALID;
    }

    let lookup = AddressLookup::from_config(cfg);
    let result = validate_address(&lookup, &record).await;

    if json {
        let differences = result
            .best_match
            .as_ref()
            .map(|best| address_differences(&record, best))
            .unwrap_or_default();
        print_json(&serde_json::json!({
            "address": record,
            "result": result,
            "differences": differences,
        }));
    } else {
        print_check_result(&record, &result);
    }

    match (&result.best_match, result.needs_comparison) {
        (Some(_), false) => exit_code::OK,
        _ => exit_code::ATTENTION,
    }
}

fn print_check_result(record: &AddressRecord, result: &LookupResult) {
    println!("\n{}\n", format_address(record));

    if let Some(error) = &result.error {
        println!("[WARN] Lookup unavailable: {error}");
        println!("       The address will be saved as entered.");
        return;
    }

    let Some(best) = &result.best_match else {
        println!("[WARN] No matching address found; it will be saved as entered.");
        return;
    };

    if !result.needs_comparison {
        println!("[OK]   Address confirmed.");
        return;
    }

    println!("[DIFF] Closest match differs:");
    for (field, diff) in address_differences(record, best) {
        println!("       {field:<16} {:?} -> {:?}", diff.user, diff.suggested);
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
    }
}
