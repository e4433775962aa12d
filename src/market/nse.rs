//! NSE (National Stock Exchange of India) REST client.
//!
//! Read-only access to the public website API:
//! - Option chains for indices and equities
//! - Corporate announcements (equities)
//!
//! The API refuses requests without session cookies, so every fetch first
//! visits the site root with browser-like headers and then reuses the
//! cookie jar for the API call.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::traits::{AnnouncementFeed, OptionChainProvider};
use super::types::*;
use crate::config::NseConfig;

/// Underlyings served by the index option-chain endpoint.
const INDEX_SYMBOLS: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "NIFTYNXT50"];

/// NSE API client for option chains and corporate announcements.
#[derive(Debug, Clone)]
pub struct NseClient {
    client: Client,
    base_url: String,
}

impl NseClient {
    /// Create a new NSE client from configuration.
    pub fn new(config: &NseConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{}/", base_url)).context("Invalid NSE base URL")?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Whether `symbol` is served by the index endpoint rather than equities.
    pub fn is_index(symbol: &str) -> bool {
        INDEX_SYMBOLS.contains(&symbol)
    }

    fn option_chain_url(&self, symbol: &str) -> String {
        let segment = if Self::is_index(symbol) {
            "option-chain-indices"
        } else {
            "option-chain-equities"
        };
        format!(
            "{}/api/{}?symbol={}",
            self.base_url,
            segment,
            urlencoding::encode(symbol)
        )
    }

    /// Visit the site root so the cookie store holds a session.
    async fn warm_up(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to open NSE session")?;

        debug!(status = %response.status(), "NSE session warm-up");
        Ok(())
    }

    /// GET an API path and decode the JSON body, failing on non-2xx status.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        self.warm_up().await?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("NSE API error {} for {}: {}", status, what, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    /// Get the option chain for an index or equity underlying.
    #[instrument(skip(self), name = "nse_option_chain")]
    pub async fn get_option_chain(&self, symbol: &str) -> Result<OptionChainSnapshot> {
        let url = self.option_chain_url(symbol);
        let snapshot: OptionChainSnapshot = self.get_json(&url, "option chain").await?;

        info!(
            symbol,
            rows = snapshot.rows().len(),
            underlying = ?snapshot.records.underlying_value,
            "Fetched NSE option chain"
        );
        Ok(snapshot)
    }

    /// Get the latest corporate announcements for equities.
    #[instrument(skip(self), name = "nse_announcements")]
    pub async fn get_announcements(&self) -> Result<Vec<CorporateAnnouncement>> {
        let url = format!("{}/api/corporate-announcements?index=equities", self.base_url);
        let payload: AnnouncementsPayload = self.get_json(&url, "corporate announcements").await?;
        let announcements = payload.into_announcements();

        info!(count = announcements.len(), "Fetched NSE corporate announcements");
        Ok(announcements)
    }
}

#[async_trait]
impl OptionChainProvider for NseClient {
    async fn fetch_option_chain(&self, symbol: &str) -> Result<OptionChainSnapshot> {
        self.get_option_chain(symbol).await
    }
}

#[async_trait]
impl AnnouncementFeed for NseClient {
    async fn fetch_announcements(&self) -> Result<Vec<CorporateAnnouncement>> {
        self.get_announcements().await
    }
}
