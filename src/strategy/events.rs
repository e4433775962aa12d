//! Corporate event matching.
//!
//! Flags a symbol when a recent announcement looks market-moving (results,
//! board meetings, dividends). Both filters are substring matches:
//! - keyword in the description (case-sensitive by default)
//! - target symbol inside the announcement symbol, so "RELIANCE" also
//!   matches "RELIANCEPOWER"

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::EventConfig;
use crate::market::CorporateAnnouncement;

/// Result of scanning the feed for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventScan {
    /// At least one market-moving announcement concerns the symbol
    pub triggered: bool,
    /// Every matching announcement, in feed order
    pub matches: Vec<CorporateAnnouncement>,
}

/// Matches announcements against a symbol using configured keywords.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    keywords: Vec<String>,
    lookback: usize,
    case_sensitive: bool,
    /// Oldest announcement date still considered, when a recency window is set
    not_before: Option<NaiveDate>,
}

impl EventMatcher {
    /// Create a matcher from configuration; `as_of` anchors the recency window.
    pub fn new(config: &EventConfig, as_of: NaiveDate) -> Self {
        let keywords = if config.case_sensitive {
            config.keywords.clone()
        } else {
            config.keywords.iter().map(|k| k.to_lowercase()).collect()
        };

        Self {
            keywords,
            lookback: config.lookback,
            case_sensitive: config.case_sensitive,
            not_before: config
                .max_age_days
                .map(|days| as_of - Duration::days(i64::from(days))),
        }
    }

    /// Whether any considered announcement is a trigger event for `symbol`.
    pub fn has_trigger_event(
        &self,
        announcements: &[CorporateAnnouncement],
        symbol: &str,
    ) -> bool {
        self.considered(announcements)
            .any(|a| self.is_match(a, symbol))
    }

    /// Scan the feed, returning the flag and the matched announcements.
    #[instrument(skip(self, announcements), fields(feed_len = announcements.len()))]
    pub fn scan(&self, announcements: &[CorporateAnnouncement], symbol: &str) -> EventScan {
        let matches: Vec<CorporateAnnouncement> = self
            .considered(announcements)
            .filter(|a| self.is_match(a, symbol))
            .cloned()
            .collect();

        for event in &matches {
            debug!(symbol = %event.symbol, date = %event.date, "Event: {}", event.description);
        }

        EventScan {
            triggered: !matches.is_empty(),
            matches,
        }
    }

    /// The bounded head of the feed; anything past `lookback` is never seen.
    fn considered<'a>(
        &'a self,
        announcements: &'a [CorporateAnnouncement],
    ) -> impl Iterator<Item = &'a CorporateAnnouncement> + 'a {
        announcements
            .iter()
            .take(self.lookback)
            .filter(move |a| self.is_recent(a))
    }

    fn is_match(&self, announcement: &CorporateAnnouncement, symbol: &str) -> bool {
        self.has_keyword(&announcement.description) && announcement.symbol.contains(symbol)
    }

    fn has_keyword(&self, description: &str) -> bool {
        if self.case_sensitive {
            self.keywords.iter().any(|k| description.contains(k.as_str()))
        } else {
            let description = description.to_lowercase();
            self.keywords.iter().any(|k| description.contains(k.as_str()))
        }
    }

    /// Undated or unparseable announcements are kept.
    fn is_recent(&self, announcement: &CorporateAnnouncement) -> bool {
        match (self.not_before, announcement.announced_on()) {
            (Some(cutoff), Some(date)) => date >= cutoff,
            _ => true,
        }
    }
}
