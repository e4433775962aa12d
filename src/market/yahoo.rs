//! Yahoo Finance chart client for global market cues.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::traits::{MacroIndicator, MacroIndicatorSource};
use super::types::ChartResponse;
use crate::config::YahooConfig;

/// Yahoo Finance client fetching the latest regular-market price of a ticker.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Create a new Yahoo client from configuration.
    pub fn new(config: &YahooConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the latest regular-market price for a Yahoo ticker (e.g. "^DJI").
    #[instrument(skip(self), name = "yahoo_quote")]
    pub async fn get_regular_market_price(&self, ticker: &str) -> Result<Decimal> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1d",
            self.base_url,
            urlencoding::encode(ticker)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch quote for {}", ticker))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Yahoo Finance API error {} for {}", status, ticker);
        }

        let chart: ChartResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse chart response for {}", ticker))?;

        let price = chart
            .regular_market_price()
            .with_context(|| format!("No regularMarketPrice for {}", ticker))?;

        debug!(ticker, %price, "Fetched Yahoo quote");
        Ok(price)
    }
}

#[async_trait]
impl MacroIndicatorSource for YahooClient {
    async fn fetch_indicator(&self, indicator: MacroIndicator) -> Result<Decimal> {
        self.get_regular_market_price(indicator.ticker()).await
    }
}
