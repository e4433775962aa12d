//! Configuration management for straddle watch.
//!
//! Loads settings from an optional `config.toml` and `STRADDLE__*`
//! environment variables.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// NSE endpoints (option chain, corporate announcements)
    #[serde(default)]
    pub nse: NseConfig,
    /// Yahoo Finance endpoint for macro cues
    #[serde(default)]
    pub yahoo: YahooConfig,
    /// Corporate event matching rules
    #[serde(default)]
    pub events: EventConfig,
    /// Straddle decision thresholds
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Macro cue collection
    #[serde(default)]
    pub macro_cues: MacroConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NseConfig {
    /// Site root; also visited first to obtain session cookies
    #[serde(default = "default_nse_base_url")]
    pub base_url: String,
    /// NSE rejects requests without a browser-like user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahooConfig {
    #[serde(default = "default_yahoo_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Description keywords that mark a market-moving event
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Only the first N announcements of the feed are inspected
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// Match keywords case-sensitively
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
    /// Ignore announcements older than this many days (unset = no date check)
    #[serde(default)]
    pub max_age_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Average IV strictly below this is "low"
    #[serde(default = "default_low_iv")]
    pub low_iv: Decimal,
    /// Average IV strictly above this is "too high"
    #[serde(default = "default_high_iv")]
    pub high_iv: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroConfig {
    /// How a failed indicator affects the rest of the snapshot
    #[serde(default)]
    pub policy: MacroFailurePolicy,
}

/// Degradation policy for the macro snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroFailurePolicy {
    /// Any failed indicator blanks the whole snapshot
    #[default]
    FailTogether,
    /// Only failed indicators show as unavailable
    PerIndicator,
}

// Default value functions
fn default_nse_base_url() -> String {
    "https://www.nseindia.com".to_string()
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_keywords() -> Vec<String> {
    ["Result", "Meeting", "Dividend"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_lookback() -> usize {
    50
}

fn default_case_sensitive() -> bool {
    true
}

fn default_low_iv() -> Decimal {
    Decimal::new(25, 0) // 25%
}

fn default_high_iv() -> Decimal {
    Decimal::new(50, 0) // 50%
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .prefix("STRADDLE")
                    .list_separator(",")
                    .with_list_parse_key("events.keywords")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.events.lookback > 0, "events.lookback must be positive");

        anyhow::ensure!(
            !self.events.keywords.is_empty()
                && self.events.keywords.iter().all(|k| !k.trim().is_empty()),
            "events.keywords must contain at least one non-blank keyword"
        );

        anyhow::ensure!(
            self.decision.low_iv >= Decimal::ZERO && self.decision.low_iv < self.decision.high_iv,
            "decision.low_iv must be >= 0 and below decision.high_iv"
        );

        anyhow::ensure!(
            self.nse.timeout_secs > 0 && self.yahoo.timeout_secs > 0,
            "timeouts must be positive"
        );

        Ok(())
    }
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            base_url: default_nse_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: default_yahoo_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            lookback: default_lookback(),
            case_sensitive: default_case_sensitive(),
            max_age_days: None,
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            low_iv: default_low_iv(),
            high_iv: default_high_iv(),
        }
    }
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            policy: MacroFailurePolicy::FailTogether,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.events.lookback, 50);
        assert_eq!(config.decision.low_iv, dec!(25));
        assert_eq!(config.decision.high_iv, dec!(50));
        assert_eq!(config.macro_cues.policy, MacroFailurePolicy::FailTogether);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = Config::default();
        config.decision.low_iv = dec!(60);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_lookback_rejected() {
        let mut config = Config::default();
        config.events.lookback = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let mut config = Config::default();
        config.events.keywords.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let toml = r#"
            [events]
            lookback = 80

            [macro_cues]
            policy = "per_indicator"
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.events.lookback, 80);
        assert_eq!(config.events.keywords, vec!["Result", "Meeting", "Dividend"]);
        assert_eq!(config.macro_cues.policy, MacroFailurePolicy::PerIndicator);
        assert_eq!(config.nse.base_url, "https://www.nseindia.com");
    }
}
