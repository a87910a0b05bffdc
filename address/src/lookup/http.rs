//! reqwest-backed implementation of [`AddressLookupApi`]

use super::raw::{LookupResponse, RawAddress};
use super::{AddressLookupApi, LookupQuery};
use crate::config::AddressConfig;
use crate::errors::{AddressError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

const SEARCH_PATH: &str = "/api/utils/address-lookup/";
const RETRIEVE_PATH: &str = "/api/utils/address-retrieve/";

/// HTTP client for the storefront address endpoints
#[derive(Debug, Clone)]
pub struct HttpLookupApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpLookupApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(cfg: &AddressConfig) -> Self {
        Self::new(cfg.api_base_url.clone(), cfg.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_addresses(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<RawAddress>> {
        let url = format!("{}{path}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AddressError::lookup_with_source(format!("GET {path} failed"), e))?;

        if resp.status() != StatusCode::OK {
            return Err(AddressError::lookup(format!(
                "GET {path} failed: {}",
                resp.status()
            )));
        }

        let parsed: LookupResponse = resp
            .json()
            .await
            .map_err(|e| AddressError::decode_with_source(format!("parse {path} response"), e))?;

        Ok(parsed.addresses)
    }
}

#[async_trait]
impl AddressLookupApi for HttpLookupApi {
    async fn search(&self, query: &LookupQuery) -> Result<Vec<RawAddress>> {
        let params = query.params();
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.get_addresses(SEARCH_PATH, &borrowed).await
    }

    async fn retrieve(&self, id: &str, country: &str) -> Result<Vec<RawAddress>> {
        self.get_addresses(RETRIEVE_PATH, &[("id", id), ("country", country)])
            .await
    }
}
