//! Type definitions for NSE and Yahoo Finance API responses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== NSE option chain ====================

/// Option chain snapshot as returned by `/api/option-chain-*`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionChainSnapshot {
    #[serde(default)]
    pub records: OptionChainRecords,
}

/// Record envelope holding every (strike, expiry) row of the chain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainRecords {
    #[serde(default)]
    pub data: Vec<OptionChainRow>,
    /// Underlying spot price at snapshot time
    #[serde(default)]
    pub underlying_value: Option<Decimal>,
    /// Exchange timestamp string (e.g. "07-Aug-2025 15:30:00")
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl OptionChainSnapshot {
    /// Build a snapshot from rows (fixtures and tests).
    pub fn from_rows(rows: Vec<OptionChainRow>) -> Self {
        Self {
            records: OptionChainRecords {
                data: rows,
                underlying_value: None,
                timestamp: None,
            },
        }
    }

    pub fn rows(&self) -> &[OptionChainRow] {
        &self.records.data
    }

    pub fn is_empty(&self) -> bool {
        self.records.data.is_empty()
    }
}

/// A single strike/expiry row with its call and put legs.
///
/// NSE omits a leg entirely when nothing is listed on that side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainRow {
    pub strike_price: Decimal,
    pub expiry_date: String,
    #[serde(rename = "CE", default)]
    pub ce: Option<OptionLeg>,
    #[serde(rename = "PE", default)]
    pub pe: Option<OptionLeg>,
}

/// Call or put quote at one strike.
///
/// NSE omits or nulls fields for illiquid strikes; a missing figure stays
/// `None` so it can never be mistaken for a zero quote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeg {
    #[serde(default)]
    pub last_price: Option<Decimal>,
    /// Implied volatility in percentage points
    #[serde(default)]
    pub implied_volatility: Option<Decimal>,
    /// Outstanding contracts
    #[serde(default)]
    pub open_interest: Option<Decimal>,
}

impl OptionLeg {
    pub fn new(last_price: Decimal, implied_volatility: Decimal, open_interest: Decimal) -> Self {
        Self {
            last_price: Some(last_price),
            implied_volatility: Some(implied_volatility),
            open_interest: Some(open_interest),
        }
    }
}

/// Which side of the straddle a leg belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leg {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Call => write!(f, "CE"),
            Leg::Put => write!(f, "PE"),
        }
    }
}

// ==================== NSE corporate announcements ====================

/// Corporate announcement from the NSE equities feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateAnnouncement {
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Announcement date as published (kept verbatim for display)
    #[serde(rename = "dt", default)]
    pub date: String,
}

/// Date layouts seen in the announcement feed.
const ANNOUNCEMENT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%d%m%Y"];

impl CorporateAnnouncement {
    pub fn new(symbol: &str, description: &str, date: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            description: description.to_string(),
            date: date.to_string(),
        }
    }

    /// Calendar date of the announcement, if the published date parses.
    ///
    /// Accepts a trailing time component ("07-Aug-2025 18:02:11").
    pub fn announced_on(&self) -> Option<NaiveDate> {
        let day = self.date.split_whitespace().next()?;
        ANNOUNCEMENT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
    }
}

/// Announcement payload: NSE has served both a wrapped object and a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnnouncementsPayload {
    Wrapped {
        #[serde(default)]
        announcements: Vec<CorporateAnnouncement>,
    },
    Bare(Vec<CorporateAnnouncement>),
}

impl AnnouncementsPayload {
    pub fn into_announcements(self) -> Vec<CorporateAnnouncement> {
        match self {
            AnnouncementsPayload::Wrapped { announcements } => announcements,
            AnnouncementsPayload::Bare(list) => list,
        }
    }
}

// ==================== Yahoo Finance chart ====================

/// Response from `/v8/finance/chart/{ticker}`.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<Decimal>,
}

impl ChartResponse {
    /// Latest regular-market price of the first result, if any.
    pub fn regular_market_price(&self) -> Option<Decimal> {
        self.chart
            .result
            .as_ref()?
            .first()?
            .meta
            .regular_market_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_option_chain_deserializes_nse_payload() {
        let json = r#"{
            "records": {
                "timestamp": "07-Aug-2025 15:30:00",
                "underlyingValue": 49012.35,
                "data": [
                    {
                        "strikePrice": 49000,
                        "expiryDate": "07-Aug-2025",
                        "CE": {"lastPrice": 320.5, "impliedVolatility": 14.2, "openInterest": 12000},
                        "PE": {"lastPrice": 280, "impliedVolatility": 15.8, "openInterest": 9500}
                    },
                    {
                        "strikePrice": 49100,
                        "expiryDate": "07-Aug-2025",
                        "PE": {"lastPrice": 330, "impliedVolatility": 16.1, "openInterest": 400}
                    }
                ]
            }
        }"#;

        let snapshot: OptionChainSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.rows().len(), 2);

        let row = &snapshot.rows()[0];
        assert_eq!(row.strike_price, dec!(49000));
        assert_eq!(row.ce.as_ref().unwrap().last_price, Some(dec!(320.5)));
        assert_eq!(row.pe.as_ref().unwrap().open_interest, Some(dec!(9500)));
        assert!(snapshot.rows()[1].ce.is_none());
        assert_eq!(snapshot.records.underlying_value, Some(dec!(49012.35)));
    }

    #[test]
    fn test_missing_leg_figures_stay_unset() {
        let json = r#"{
            "records": {
                "data": [
                    {
                        "strikePrice": 49000,
                        "expiryDate": "07-Aug-2025",
                        "CE": {"lastPrice": 320.5, "openInterest": 12000},
                        "PE": {"lastPrice": 280, "impliedVolatility": null, "openInterest": 9500}
                    }
                ]
            }
        }"#;

        let snapshot: OptionChainSnapshot = serde_json::from_str(json).unwrap();
        let row = &snapshot.rows()[0];
        assert_eq!(row.ce.as_ref().unwrap().implied_volatility, None);
        assert_eq!(row.pe.as_ref().unwrap().implied_volatility, None);
        assert_eq!(row.pe.as_ref().unwrap().last_price, Some(dec!(280)));
    }

    #[test]
    fn test_empty_option_chain_payload() {
        let snapshot: OptionChainSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_announcements_payload_shapes() {
        let wrapped = r#"{"announcements": [{"symbol": "TCS", "desc": "Annual Report", "dt": "2025-08-05"}]}"#;
        let bare = r#"[{"symbol": "TCS", "desc": "Annual Report", "dt": "2025-08-05"}]"#;
        let missing = r#"{}"#;

        let wrapped: AnnouncementsPayload = serde_json::from_str(wrapped).unwrap();
        let bare: AnnouncementsPayload = serde_json::from_str(bare).unwrap();
        let missing: AnnouncementsPayload = serde_json::from_str(missing).unwrap();

        assert_eq!(wrapped.into_announcements().len(), 1);
        assert_eq!(bare.into_announcements()[0].symbol, "TCS");
        assert!(missing.into_announcements().is_empty());
    }

    #[test]
    fn test_announced_on_formats() {
        let iso = CorporateAnnouncement::new("TCS", "Result", "2025-08-05");
        let nse = CorporateAnnouncement::new("TCS", "Result", "05-Aug-2025 18:02:11");
        let junk = CorporateAnnouncement::new("TCS", "Result", "yesterday");

        let expected = NaiveDate::from_ymd_opt(2025, 8, 5);
        assert_eq!(iso.announced_on(), expected);
        assert_eq!(nse.announced_on(), expected);
        assert_eq!(junk.announced_on(), None);
    }

    #[test]
    fn test_chart_regular_market_price() {
        let json = r#"{"chart": {"result": [{"meta": {"symbol": "CL=F", "currency": "USD", "regularMarketPrice": 71.42}}], "error": null}}"#;
        let chart: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(chart.regular_market_price(), Some(dec!(71.42)));

        let empty = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let chart: ChartResponse = serde_json::from_str(empty).unwrap();
        assert_eq!(chart.regular_market_price(), None);
    }
}
