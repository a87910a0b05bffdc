//! Address lookup client
//!
//! ## Architecture
//!
//! - [`AddressLookupApi`]: raw search/retrieve calls, errors surfaced
//! - [`HttpLookupApi`]: reqwest implementation against the storefront API
//! - [`AddressLookup`]: engine facade that applies per-country query rules,
//!   normalizes results and degrades every failure to "no suggestions"
//! - `mock::MockLookupApi` (tests) - canned responses, call recording

mod http;
mod raw;
mod sequencer;

pub use http::HttpLookupApi;
pub use raw::{LookupResponse, RawAddress, clean_component};
pub use sequencer::{LookupSequencer, LookupTicket};

use crate::config::AddressConfig;
use crate::errors::Result;
use crate::metadata::{PostcodeQuery, address_metadata};
use crate::record::AddressRecord;
use async_trait::async_trait;

/// Whether the last whitespace-separated tokens of `query` spell `postcode`
fn ends_with_postcode(query: &str, postcode: &str) -> bool {
    let wanted: Vec<&str> = postcode.split_whitespace().collect();
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if wanted.is_empty() || tokens.len() < wanted.len() {
        return false;
    }
    tokens[tokens.len() - wanted.len()..]
        .iter()
        .zip(&wanted)
        .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Query parameters for one search call, already shaped for the country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub query: String,
    pub postcode: Option<String>,
    pub country: String,
}

impl LookupQuery {
    /// Assemble a search query following the country's postcode rule.
    ///
    /// - `SeparateParam` (GB): postcode travels as its own parameter
    /// - `AppendToQuery`: postcode is appended to the free text
    /// - `Omit`, or countries without postcodes: postcode is dropped
    pub fn build(query: &str, postcode: Option<&str>, country_code: &str) -> Self {
        let meta = address_metadata(country_code);
        let country = country_code.trim().to_uppercase();
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        let postcode = postcode
            .map(str::trim)
            .filter(|p| !p.is_empty() && meta.has_postcode);

        match (meta.postcode_query, postcode) {
            (PostcodeQuery::SeparateParam, Some(p)) => Self {
                query,
                postcode: Some(p.to_string()),
                country,
            },
            (PostcodeQuery::AppendToQuery, Some(p)) if !ends_with_postcode(&query, p) => Self {
                query: format!("{query} {p}").trim().to_string(),
                postcode: None,
                country,
            },
            _ => Self {
                query,
                postcode: None,
                country,
            },
        }
    }

    /// Query-string pairs in request order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("country", self.country.clone()),
        ];
        if let Some(postcode) = &self.postcode {
            params.push(("postcode", postcode.clone()));
        }
        params
    }
}

/// Raw access to the lookup provider
#[async_trait]
pub trait AddressLookupApi: Send + Sync {
    /// Candidate addresses for a partial query
    async fn search(&self, query: &LookupQuery) -> Result<Vec<RawAddress>>;

    /// Full detail for a candidate returned by `search`
    async fn retrieve(&self, id: &str, country: &str) -> Result<Vec<RawAddress>>;
}

/// Lookup facade used by forms and the validation flow
#[derive(Debug)]
pub struct AddressLookup<A> {
    api: A,
    enabled: bool,
    max_results: usize,
    sequencer: LookupSequencer,
}

impl AddressLookup<HttpLookupApi> {
    /// HTTP-backed lookup configured from `cfg`
    pub fn from_config(cfg: &AddressConfig) -> Self {
        Self::with_config(HttpLookupApi::from_config(cfg), cfg)
    }
}

impl<A: AddressLookupApi> AddressLookup<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, &AddressConfig::default())
    }

    pub fn with_config(api: A, cfg: &AddressConfig) -> Self {
        Self {
            api,
            enabled: cfg.lookup_enabled,
            max_results: cfg.max_results,
            sequencer: LookupSequencer::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sequencer(&self) -> &LookupSequencer {
        &self.sequencer
    }

    /// Whether a search for these inputs would reach the provider
    pub fn should_search(&self, query: &str, postcode: Option<&str>, country_code: &str) -> bool {
        let meta = address_metadata(country_code);
        let has_postcode = postcode.is_some_and(|p| !p.trim().is_empty());

        if !self.enabled || !meta.address_lookup_supported {
            return false;
        }
        if meta.has_postcode && meta.requires_postcode_for_lookup && !has_postcode {
            return false;
        }
        !query.trim().is_empty() || has_postcode
    }

    /// Search for candidate addresses.
    ///
    /// Never fails: transport errors, bad status codes and undecodable
    /// bodies are logged and reported as no results so the user can fall
    /// back to manual entry.
    pub async fn search_addresses(
        &self,
        query: &str,
        postcode: Option<&str>,
        country_code: &str,
    ) -> Vec<AddressRecord> {
        match self.try_search(query, postcode, country_code).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    country = country_code,
                    category = e.category().as_str(),
                    error = %e,
                    "Address lookup failed; continuing without suggestions"
                );
                Vec::new()
            }
        }
    }

    /// Like [`Self::search_addresses`] but hands provider errors back.
    ///
    /// Skipped searches (unsupported country, missing postcode, lookup
    /// disabled) are `Ok(vec![])`.
    pub async fn try_search(
        &self,
        query: &str,
        postcode: Option<&str>,
        country_code: &str,
    ) -> Result<Vec<AddressRecord>> {
        if !self.should_search(query, postcode, country_code) {
            tracing::debug!(country = country_code, "Address lookup skipped");
            return Ok(Vec::new());
        }

        let lookup_query = LookupQuery::build(query, postcode, country_code);
        let raw = self.api.search(&lookup_query).await?;

        let limit = if self.max_results == 0 {
            usize::MAX
        } else {
            self.max_results
        };
        let results: Vec<AddressRecord> = raw
            .iter()
            .take(limit)
            .map(|r| r.normalize(&lookup_query.country))
            .collect();

        tracing::debug!(
            country = %lookup_query.country,
            results = results.len(),
            "Address lookup complete"
        );
        Ok(results)
    }

    /// Search, but only return results if no newer lookup started meanwhile.
    pub async fn search_latest(
        &self,
        query: &str,
        postcode: Option<&str>,
        country_code: &str,
    ) -> Option<Vec<AddressRecord>> {
        let ticket = self.sequencer.begin();
        let results = self.search_addresses(query, postcode, country_code).await;
        self.sequencer.accept(ticket, results)
    }

    /// Complete a partial search result via the retrieve endpoint.
    ///
    /// Records without an id are returned unchanged; a failed or empty
    /// retrieve falls back to the partial record.
    pub async fn retrieve_details(&self, partial: &AddressRecord) -> AddressRecord {
        let Some(id) = partial.id.as_deref() else {
            return partial.clone();
        };
        let country = partial.country.trim().to_uppercase();

        match self.api.retrieve(id, &country).await {
            Ok(raw) => match raw.first() {
                Some(full) => {
                    let mut record = full.normalize(&country);
                    if record.id.is_none() {
                        record.id = partial.id.clone();
                    }
                    record
                }
                None => {
                    tracing::warn!(id, "Address retrieve returned nothing; using partial result");
                    partial.clone()
                }
            },
            Err(e) => {
                tracing::warn!(
                    id,
                    category = e.category().as_str(),
                    error = %e,
                    "Address retrieve failed; using partial result"
                );
                partial.clone()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock implementation for tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used)] // Mock code: panicking on poisoned lock is acceptable in tests
pub mod mock {
    use super::*;
    use crate::errors::AddressError;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// Canned-response implementation of [`AddressLookupApi`]
    #[derive(Debug, Default)]
    pub struct MockLookupApi {
        search_results: Arc<RwLock<Vec<RawAddress>>>,
        details: Arc<RwLock<HashMap<String, RawAddress>>>,
        fail_search: Arc<RwLock<bool>>,
        fail_retrieve: Arc<RwLock<bool>>,
        /// Track search calls for verification
        searches: Arc<RwLock<Vec<LookupQuery>>>,
    }

    impl MockLookupApi {
        pub fn new() -> Self {
            Self::default()
        }

        /// Results every search returns
        pub fn with_results(self, results: Vec<RawAddress>) -> Self {
            *self.search_results.write().unwrap() = results;
            self
        }

        /// Full record returned by `retrieve(id)`
        pub fn with_detail(self, id: &str, detail: RawAddress) -> Self {
            self.details.write().unwrap().insert(id.to_string(), detail);
            self
        }

        pub fn failing_search(self) -> Self {
            *self.fail_search.write().unwrap() = true;
            self
        }

        pub fn failing_retrieve(self) -> Self {
            *self.fail_retrieve.write().unwrap() = true;
            self
        }

        /// Queries seen so far (for test verification)
        pub fn searches(&self) -> Vec<LookupQuery> {
            self.searches.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl AddressLookupApi for MockLookupApi {
        async fn search(&self, query: &LookupQuery) -> Result<Vec<RawAddress>> {
            self.searches.write().unwrap().push(query.clone());
            if *self.fail_search.read().unwrap() {
                return Err(AddressError::lookup("GET /api/utils/address-lookup/ failed: 502"));
            }
            Ok(self.search_results.read().unwrap().clone())
        }

        async fn retrieve(&self, id: &str, _country: &str) -> Result<Vec<RawAddress>> {
            if *self.fail_retrieve.read().unwrap() {
                return Err(AddressError::lookup("GET /api/utils/address-retrieve/ failed: 500"));
            }
            Ok(self
                .details
                .read()
                .unwrap()
                .get(id)
                .cloned()
                .into_iter()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLookupApi;
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(line_1: &str, city: &str, postcode: &str, id: Option<&str>) -> RawAddress {
        RawAddress {
            line_1: Some(line_1.to_string()),
            town_or_city: Some(city.to_string()),
            postcode: Some(postcode.to_string()),
            id: id.map(str::to_string),
            ..RawAddress::default()
        }
    }

    #[test]
    fn test_query_gb_uses_separate_postcode() {
        let q = LookupQuery::build("10 Downing", Some(" SW1A 2AA "), "gb");
        assert_eq!(q.query, "10 Downing");
        assert_eq!(q.postcode.as_deref(), Some("SW1A 2AA"));
        assert_eq!(q.country, "GB");
        assert_eq!(q.params().len(), 3);
    }

    #[test]
    fn test_query_us_appends_postcode() {
        let q = LookupQuery::build("1 Market St", Some("94105"), "US");
        assert_eq!(q.query, "1 Market St 94105");
        assert_eq!(q.postcode, None);

        let already = LookupQuery::build("1 Market St 94105", Some("94105"), "US");
        assert_eq!(already.query, "1 Market St 94105");
    }

    #[test]
    fn test_query_appends_postcode_contained_in_house_number() {
        let au = LookupQuery::build("12000 Pitt St", Some("2000"), "AU");
        assert_eq!(au.query, "12000 Pitt St 2000");
        assert_eq!(au.postcode, None);

        let us = LookupQuery::build("194105 Ocean Ave", Some("94105"), "US");
        assert_eq!(us.query, "194105 Ocean Ave 94105");
    }

    #[test]
    fn test_query_multi_part_postcode_already_at_end() {
        let q = LookupQuery::build("24 Sussex Dr k1a 0b1", Some("K1A 0B1"), "CA");
        assert_eq!(q.query, "24 Sussex Dr k1a 0b1");

        let q = LookupQuery::build("24 Sussex Dr 0B1", Some("K1A 0B1"), "CA");
        assert_eq!(q.query, "24 Sussex Dr 0B1 K1A 0B1");
    }

    #[test]
    fn test_query_hk_omits_postcode() {
        let q = LookupQuery::build("1 Queen's Road", Some("999077"), "HK");
        assert_eq!(q.query, "1 Queen's Road");
        assert_eq!(q.postcode, None);
        assert!(q.params().iter().all(|(k, _)| *k != "postcode"));
    }

    #[test]
    fn test_should_search_rules() {
        let lookup = AddressLookup::new(MockLookupApi::new());
        assert!(!lookup.should_search("10 Downing", None, "GB"));
        assert!(lookup.should_search("10 Downing", Some("SW1A 2AA"), "GB"));
        assert!(lookup.should_search("1 Queen's Road", None, "HK"));
        assert!(!lookup.should_search("", None, "US"));
        assert!(!lookup.should_search("Rue de Rivoli", None, "FR"));
    }

    #[tokio::test]
    async fn test_search_normalizes_and_limits() {
        let api = MockLookupApi::new().with_results(vec![
            raw("1 High St,", "Oxford.", "OX1 1AA", None),
            raw("2 High St", "Oxford", "OX1 1AB", None),
        ]);
        let cfg = AddressConfig {
            max_results: 1,
            ..AddressConfig::default()
        };
        let lookup = AddressLookup::with_config(api, &cfg);

        let results = lookup.search_addresses("High St", Some("OX1"), "GB").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].address, "1 High St");
        assert_eq!(results[0].city, "Oxford");
        assert_eq!(results[0].country, "GB");
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty() {
        let lookup = AddressLookup::new(MockLookupApi::new().failing_search());
        let results = lookup.search_addresses("1 Market St", None, "US").await;
        assert!(results.is_empty());
        assert_eq!(lookup.api().searches().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_lookup_never_calls_api() {
        let cfg = AddressConfig {
            lookup_enabled: false,
            ..AddressConfig::default()
        };
        let lookup = AddressLookup::with_config(MockLookupApi::new(), &cfg);
        assert!(lookup.search_addresses("1 Market St", None, "US").await.is_empty());
        assert!(lookup.api().searches().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_details_completes_partial() {
        let api = MockLookupApi::new().with_detail(
            "id-1",
            RawAddress {
                county: Some("Oxfordshire".to_string()),
                ..raw("1 High St", "Oxford", "OX1 1AA", None)
            },
        );
        let lookup = AddressLookup::new(api);
        let partial = AddressRecord::new("GB").with("address", "1 High St");
        let partial = AddressRecord {
            id: Some("id-1".to_string()),
            ..partial
        };

        let full = lookup.retrieve_details(&partial).await;
        assert_eq!(full.state, "Oxfordshire");
        assert_eq!(full.postal_code, "OX1 1AA");
        assert_eq!(full.id.as_deref(), Some("id-1"));
    }

    #[tokio::test]
    async fn test_retrieve_failure_falls_back_to_partial() {
        let lookup = AddressLookup::new(MockLookupApi::new().failing_retrieve());
        let partial = AddressRecord {
            id: Some("id-9".to_string()),
            ..AddressRecord::new("GB").with("address", "9 Low St")
        };
        assert_eq!(lookup.retrieve_details(&partial).await, partial);

        let unknown = AddressLookup::new(MockLookupApi::new());
        assert_eq!(unknown.retrieve_details(&partial).await, partial);
    }

    #[tokio::test]
    async fn test_search_latest_returns_current_results() {
        let api =
            MockLookupApi::new().with_results(vec![raw("1 High St", "Oxford", "OX1 1AA", None)]);
        let lookup = AddressLookup::new(api);
        let results = lookup.search_latest("High St", Some("OX1 1AA"), "GB").await;
        assert_eq!(results.map(|r| r.len()), Some(1));
    }
}
