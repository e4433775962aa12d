//! Source-agnostic traits for the market data the straddle check consumes.
//!
//! The evaluation pipeline only talks to these traits, so any option chain,
//! announcement or macro quote source can be plugged in:
//! - `OptionChainProvider`: full option chain for one underlying
//! - `AnnouncementFeed`: unscoped corporate announcements, newest first
//! - `MacroIndicatorSource`: latest quote for one global cue

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use super::types::{CorporateAnnouncement, OptionChainSnapshot};

/// Global market cue shown next to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MacroIndicator {
    DowFutures,
    SgxNifty,
    CrudeOil,
    UsdInr,
}

impl MacroIndicator {
    /// Every indicator, in display order.
    pub const ALL: [MacroIndicator; 4] = [
        MacroIndicator::DowFutures,
        MacroIndicator::SgxNifty,
        MacroIndicator::CrudeOil,
        MacroIndicator::UsdInr,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            MacroIndicator::DowFutures => "Dow Futures",
            MacroIndicator::SgxNifty => "SGX Nifty",
            MacroIndicator::CrudeOil => "Crude Oil",
            MacroIndicator::UsdInr => "USD-INR",
        }
    }

    /// Yahoo Finance ticker used as the quote source.
    pub fn ticker(&self) -> &'static str {
        match self {
            MacroIndicator::DowFutures => "^DJI",
            MacroIndicator::SgxNifty => "^NSEI",
            MacroIndicator::CrudeOil => "CL=F",
            MacroIndicator::UsdInr => "USDINR=X",
        }
    }
}

impl fmt::Display for MacroIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of option chain snapshots.
///
/// An `Err` means the chain could not be fetched at all (transport error,
/// blocked session, market closed); callers degrade to "cannot evaluate".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionChainProvider: Send + Sync {
    /// Fetch the full option chain for `symbol`.
    async fn fetch_option_chain(&self, symbol: &str) -> anyhow::Result<OptionChainSnapshot>;
}

/// Feed of corporate announcements, not scoped to a symbol.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementFeed: Send + Sync {
    /// Fetch the latest announcements, newest first.
    async fn fetch_announcements(&self) -> anyhow::Result<Vec<CorporateAnnouncement>>;
}

/// Source of the latest quote for a macro indicator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MacroIndicatorSource: Send + Sync {
    async fn fetch_indicator(&self, indicator: MacroIndicator) -> anyhow::Result<Decimal>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_names_and_tickers() {
        assert_eq!(MacroIndicator::DowFutures.to_string(), "Dow Futures");
        assert_eq!(MacroIndicator::UsdInr.name(), "USD-INR");
        assert_eq!(MacroIndicator::CrudeOil.ticker(), "CL=F");
        assert_eq!(MacroIndicator::SgxNifty.ticker(), "^NSEI");
    }

    #[test]
    fn test_all_indicators_are_distinct() {
        let mut all = MacroIndicator::ALL.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 4);
    }
}
