//! Remote mirror client
//!
//! Fetches the static JSON files of the mirror with caching disabled. A
//! failed fetch is reported as such instead of being folded into an empty
//! collection, so callers can tell "nothing there" from "could not look".

use std::time::Duration;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use crate::config::RemoteConfig;
use crate::utils::errors::{RemoteFetchError, Result, ShopDeskError};
use crate::utils::logging::log_fetch_failure;

pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const ORDERS_FILE: &str = "orders.json";

/// Result of fetching one remote resource
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Failed(RemoteFetchError),
}

impl<T> FetchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

impl<T: Default> FetchOutcome<T> {
    /// The fetched value, or the empty collection/record on failure
    pub fn unwrap_or_empty(self) -> T {
        match self {
            FetchOutcome::Fetched(value) => value,
            FetchOutcome::Failed(_) => T::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: Url,
}

impl RemoteSource {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ShopDesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ShopDeskError::Http)?;

        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resource_url(&self, name: &str) -> Result<Url> {
        Ok(self.base_url.join(name)?)
    }

    /// Fetch and decode one JSON resource, logging any failure
    pub async fn fetch_collection<T: DeserializeOwned>(&self, name: &str) -> FetchOutcome<T> {
        match self.try_fetch(name).await {
            Ok(value) => FetchOutcome::Fetched(value),
            Err(e) => {
                log_fetch_failure(name, &e.to_string());
                FetchOutcome::Failed(e)
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(&self, name: &str) -> std::result::Result<T, RemoteFetchError> {
        let url = self.resource_url(name).map_err(|e| RemoteFetchError::Network {
            url: format!("{}{}", self.base_url, name),
            message: e.to_string(),
        })?;

        debug!(url = %url, "Fetching remote resource");

        let response = self.client
            .get(url.clone())
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| RemoteFetchError::Network { url: url.to_string(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteFetchError::Network { url: url.to_string(), message: e.to_string() })?;

        serde_json::from_slice(&body)
            .map_err(|e| RemoteFetchError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn remote_config(base_url: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: base_url.to_string(),
            ..Settings::default().remote
        }
    }

    #[test]
    fn test_resource_url_keeps_base_path() {
        let remote = RemoteSource::new(&remote_config(
            "https://raw.githubusercontent.com/owner/repo/main/bot_data",
        )).unwrap();

        assert_eq!(
            remote.resource_url(PRODUCTS_FILE).unwrap().as_str(),
            "https://raw.githubusercontent.com/owner/repo/main/bot_data/products.json"
        );
    }

    #[test]
    fn test_failed_outcome_falls_back_to_empty() {
        let failed: FetchOutcome<Vec<i64>> = FetchOutcome::Failed(RemoteFetchError::Status {
            url: "https://example.com/orders.json".to_string(),
            status: 500,
        });
        assert!(failed.is_failed());
        assert!(failed.unwrap_or_empty().is_empty());
    }
}
