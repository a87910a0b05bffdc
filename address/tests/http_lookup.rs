//! HTTP lookup client tests against a wiremock server
//!
//! Covers the query-string rules per country, the no-throw degradation on
//! provider failures, and the retrieve fallback.

use pretty_assertions::assert_eq;
use serde_json::json;
use shopfront_address::{
    AddressConfig, AddressLookup, AddressLookupApi, AddressRecord, ErrorCategory, HttpLookupApi,
    LookupQuery, validate_address,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH: &str = "/api/utils/address-lookup/";
const RETRIEVE: &str = "/api/utils/address-retrieve/";

fn lookup_for(server: &MockServer) -> AddressLookup<HttpLookupApi> {
    let cfg = AddressConfig {
        api_base_url: server.uri(),
        request_timeout_secs: 2,
        ..AddressConfig::default()
    };
    AddressLookup::from_config(&cfg)
}

fn downing_street() -> serde_json::Value {
    json!({
        "line_1": "10 Downing Street,",
        "town_or_city": "London",
        "county": "Greater London",
        "postcode": "SW1A 2AA",
        "country": "GB"
    })
}

#[tokio::test]
async fn gb_search_sends_postcode_as_separate_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("query", "10 Downing"))
        .and(query_param("country", "GB"))
        .and(query_param("postcode", "SW1A 2AA"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "addresses": [downing_street()] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = lookup_for(&server)
        .search_addresses("10 Downing", Some("SW1A 2AA"), "GB")
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].address, "10 Downing Street");
    assert_eq!(results[0].state, "Greater London");
}

#[tokio::test]
async fn us_search_appends_postcode_to_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("query", "1 Market St 94105"))
        .and(query_param("country", "US"))
        .and(query_param_is_missing("postcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "addresses": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let results = lookup_for(&server)
        .search_addresses("1 Market St", Some("94105"), "us")
        .await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn hong_kong_search_omits_postcode_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("query", "1 Queen's Road Central"))
        .and(query_param("country", "HK"))
        .and(query_param_is_missing("postcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addresses": [{
                "line_1": "1 Queen's Road Central",
                "town_or_city": "Central",
                "state": "Hong Kong Island"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = lookup_for(&server)
        .search_addresses("1 Queen's Road Central", None, "HK")
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].country, "HK");
}

#[tokio::test]
async fn server_error_degrades_to_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let lookup = lookup_for(&server);
    assert!(
        lookup
            .search_addresses("1 Market St", None, "US")
            .await
            .is_empty()
    );

    let err = lookup
        .api()
        .search(&LookupQuery::build("1 Market St", None, "US"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::LookupError);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let lookup = lookup_for(&server);
    let err = lookup
        .api()
        .search(&LookupQuery::build("1 Market St", None, "US"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DecodeError);
    assert!(
        lookup
            .search_addresses("1 Market St", None, "US")
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "addresses": [downing_street()] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let api = HttpLookupApi::new(server.uri(), Duration::from_millis(200));
    let result = api
        .search(&LookupQuery::build("10 Downing", Some("SW1A 2AA"), "GB"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn search_result_with_id_is_completed_via_retrieve() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addresses": [{ "line_1": "10 Downing Street", "id": "gb-10" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RETRIEVE))
        .and(query_param("id", "gb-10"))
        .and(query_param("country", "GB"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "addresses": [downing_street()] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = AddressRecord::new("GB")
        .with("address", "10 downing street")
        .with("city", "LONDON")
        .with("postal_code", "sw1a 2aa");
    let result = validate_address(&lookup_for(&server), &user).await;

    assert!(result.has_match);
    assert!(!result.needs_comparison);
    let best = result.best_match.expect("best match");
    assert_eq!(best.postal_code, "SW1A 2AA");
    assert_eq!(best.id.as_deref(), Some("gb-10"));
}

#[tokio::test]
async fn failed_retrieve_falls_back_to_partial_and_flags_comparison() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "addresses": [{
                "line_1": "11 Downing Street",
                "town_or_city": "London",
                "postcode": "SW1A 2AB",
                "id": "gb-11"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RETRIEVE))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let user = AddressRecord::new("GB")
        .with("address", "10 Downing Street")
        .with("city", "London")
        .with("postal_code", "SW1A 2AA");
    let result = validate_address(&lookup_for(&server), &user).await;

    assert!(result.has_match);
    assert!(result.needs_comparison);
    let best = result.best_match.expect("best match");
    assert_eq!(best.address, "11 Downing Street");
    assert_eq!(result.all_matches.len(), 1);
}

#[tokio::test]
async fn unreachable_provider_reports_error_without_panicking() {
    // Nothing listens on port 9 on the loopback interface.
    let cfg = AddressConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 1,
        ..AddressConfig::default()
    };
    let lookup = AddressLookup::from_config(&cfg);
    let user = AddressRecord::new("US")
        .with("address", "1 Market St")
        .with("city", "San Francisco")
        .with("postal_code", "94105");

    let result = validate_address(&lookup, &user).await;
    assert!(!result.has_match);
    assert!(result.error.is_some());
}
