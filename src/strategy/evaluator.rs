//! One straddle evaluation, end to end.
//!
//! Fetch chain -> extract quote -> fetch announcements -> match events ->
//! decide -> collect macro cues. Every upstream failure degrades the
//! affected field only; an evaluation always produces a report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument, warn};

use super::decision::{average_iv, DecisionEngine, StraddleVerdict};
use super::events::{EventMatcher, EventScan};
use super::macro_cues::{MacroIndicatorSet, MacroSnapshot};
use super::quote::{extract_quote, Expiry, OptionQuote, QuoteError};
use crate::config::{Config, EventConfig};
use crate::market::{AnnouncementFeed, MacroIndicatorSource, OptionChainProvider};

/// What the trader asked about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StraddleQuery {
    pub symbol: String,
    pub strike: Decimal,
    pub expiry: Expiry,
}

impl StraddleQuery {
    /// Build a query; the symbol is trimmed and upper-cased to NSE form.
    pub fn new(symbol: &str, strike: Decimal, expiry: Expiry) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            strike,
            expiry,
        }
    }
}

/// Why no verdict could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The option chain could not be fetched at all
    ChainUnavailable,
    /// The chain was fetched but holds no usable row for the query
    QuoteNotFound {
        expiry: Expiry,
        strike: Decimal,
        #[serde(skip)]
        cause: QuoteError,
    },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::ChainUnavailable => {
                write!(f, "Cannot fetch option chain (weekend or blocked)")
            }
            UnavailableReason::QuoteNotFound { cause, .. } => {
                write!(f, "Cannot evaluate: {}", cause)
            }
        }
    }
}

impl From<QuoteError> for UnavailableReason {
    fn from(cause: QuoteError) -> Self {
        UnavailableReason::QuoteNotFound {
            expiry: cause.expiry(),
            strike: cause.strike(),
            cause,
        }
    }
}

/// Final suggestion, including the "cannot evaluate" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Verdict(StraddleVerdict),
    Unavailable(UnavailableReason),
}

impl Recommendation {
    pub fn verdict(&self) -> Option<StraddleVerdict> {
        match self {
            Recommendation::Verdict(v) => Some(*v),
            Recommendation::Unavailable(_) => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Verdict(v) => write!(f, "{}", v),
            Recommendation::Unavailable(reason) => write!(f, "{}", reason),
        }
    }
}

/// Everything the output surface shows for one query.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub query: StraddleQuery,
    pub quote: Option<OptionQuote>,
    pub avg_iv: Option<Decimal>,
    pub events: EventScan,
    /// False when the announcement feed could not be fetched
    pub events_available: bool,
    pub macro_cues: MacroIndicatorSet,
    pub recommendation: Recommendation,
}

/// Runs evaluations against pluggable market data sources.
pub struct StraddleEvaluator {
    chain_provider: Box<dyn OptionChainProvider>,
    announcement_feed: Box<dyn AnnouncementFeed>,
    macro_source: Box<dyn MacroIndicatorSource>,
    event_config: EventConfig,
    engine: DecisionEngine,
    macro_snapshot: MacroSnapshot,
}

impl StraddleEvaluator {
    pub fn new(
        config: &Config,
        chain_provider: Box<dyn OptionChainProvider>,
        announcement_feed: Box<dyn AnnouncementFeed>,
        macro_source: Box<dyn MacroIndicatorSource>,
    ) -> Self {
        Self {
            chain_provider,
            announcement_feed,
            macro_source,
            event_config: config.events.clone(),
            engine: DecisionEngine::new(&config.decision),
            macro_snapshot: MacroSnapshot::new(config.macro_cues.policy),
        }
    }

    /// Evaluate one symbol / strike / expiry. `as_of` anchors the event window.
    #[instrument(
        skip(self),
        fields(symbol = %query.symbol, strike = %query.strike, expiry = %query.expiry)
    )]
    pub async fn evaluate(&self, query: &StraddleQuery, as_of: NaiveDate) -> EvaluationReport {
        let quote = self.fetch_quote(query).await;
        let (events, events_available) = self.fetch_events(&query.symbol, as_of).await;

        let (avg_iv, recommendation) = match &quote {
            Ok(q) => {
                let avg_iv = average_iv(q);
                let verdict = self.engine.decide(avg_iv, events.triggered);
                info!(
                    %avg_iv,
                    event_flag = events.triggered,
                    verdict = verdict.label(),
                    "Straddle verdict"
                );
                (Some(avg_iv), Recommendation::Verdict(verdict))
            }
            Err(reason) => {
                warn!(%reason, "Straddle cannot be evaluated");
                (None, Recommendation::Unavailable(reason.clone()))
            }
        };

        let macro_cues = self.macro_snapshot.collect(self.macro_source.as_ref()).await;

        EvaluationReport {
            query: query.clone(),
            quote: quote.ok(),
            avg_iv,
            events,
            events_available,
            macro_cues,
            recommendation,
        }
    }

    /// Matched events only (no option chain or macro fetch).
    pub async fn scan_events(&self, symbol: &str, as_of: NaiveDate) -> (EventScan, bool) {
        self.fetch_events(&symbol.trim().to_uppercase(), as_of).await
    }

    /// Macro snapshot only.
    pub async fn macro_cues(&self) -> MacroIndicatorSet {
        self.macro_snapshot.collect(self.macro_source.as_ref()).await
    }

    async fn fetch_quote(&self, query: &StraddleQuery) -> Result<OptionQuote, UnavailableReason> {
        let snapshot = match self.chain_provider.fetch_option_chain(&query.symbol).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Option chain unavailable");
                return Err(UnavailableReason::ChainUnavailable);
            }
        };

        extract_quote(&snapshot, query.expiry, query.strike).map_err(UnavailableReason::from)
    }

    async fn fetch_events(&self, symbol: &str, as_of: NaiveDate) -> (EventScan, bool) {
        match self.announcement_feed.fetch_announcements().await {
            Ok(announcements) => {
                let matcher = EventMatcher::new(&self.event_config, as_of);
                (matcher.scan(&announcements, symbol), true)
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Announcement feed unavailable");
                (EventScan::default(), false)
            }
        }
    }
}
