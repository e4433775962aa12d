//! At-the-money quote extraction from an option chain snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::market::{Leg, OptionChainRow, OptionChainSnapshot, OptionLeg};

/// NSE display format for expiries, e.g. "07-Aug-2025".
const EXPIRY_FORMAT: &str = "%d-%b-%Y";

/// Option expiry date, entered and displayed in NSE format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry(NaiveDate);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid expiry '{0}', expected a date like 07-Aug-2025")]
pub struct ExpiryParseError(String);

impl Expiry {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whether a chain row's expiry string refers to this expiry.
    ///
    /// Exact match on the canonical text, or the same calendar date when the
    /// row uses a different casing or zero padding.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        raw == self.to_string() || raw.parse::<Expiry>().map_or(false, |e| e == *self)
    }
}

impl FromStr for Expiry {
    type Err = ExpiryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), EXPIRY_FORMAT)
            .map(Expiry)
            .map_err(|_| ExpiryParseError(s.to_string()))
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(EXPIRY_FORMAT))
    }
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// CE/PE figures for one strike and expiry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionQuote {
    pub strike: Decimal,
    pub expiry: Expiry,
    pub ce_price: Decimal,
    pub pe_price: Decimal,
    pub ce_iv: Decimal,
    pub pe_iv: Decimal,
    pub ce_oi: Decimal,
    pub pe_oi: Decimal,
}

impl OptionQuote {
    /// Cost of buying both legs.
    pub fn total_premium(&self) -> Decimal {
        self.ce_price + self.pe_price
    }
}

/// Why a quote could not be extracted. Either way the straddle cannot be
/// evaluated; numbers are never defaulted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("no option chain row for strike {strike} expiring {expiry}")]
    NotFound { expiry: Expiry, strike: Decimal },

    #[error("strike {strike} expiring {expiry} has no {leg} quote")]
    MissingLeg {
        expiry: Expiry,
        strike: Decimal,
        leg: Leg,
    },

    #[error("strike {strike} expiring {expiry} has no {leg} {field}")]
    MissingField {
        expiry: Expiry,
        strike: Decimal,
        leg: Leg,
        field: &'static str,
    },
}

impl QuoteError {
    pub fn expiry(&self) -> Expiry {
        match self {
            QuoteError::NotFound { expiry, .. }
            | QuoteError::MissingLeg { expiry, .. }
            | QuoteError::MissingField { expiry, .. } => *expiry,
        }
    }

    pub fn strike(&self) -> Decimal {
        match self {
            QuoteError::NotFound { strike, .. }
            | QuoteError::MissingLeg { strike, .. }
            | QuoteError::MissingField { strike, .. } => *strike,
        }
    }
}

/// Price, IV and OI of one leg, all present.
struct LegFigures {
    price: Decimal,
    iv: Decimal,
    oi: Decimal,
}

fn leg_figures(
    leg: Option<&OptionLeg>,
    side: Leg,
    expiry: Expiry,
    strike: Decimal,
) -> Result<LegFigures, QuoteError> {
    let leg = leg.ok_or(QuoteError::MissingLeg {
        expiry,
        strike,
        leg: side,
    })?;
    let require = |value: Option<Decimal>, field: &'static str| {
        value.ok_or(QuoteError::MissingField {
            expiry,
            strike,
            leg: side,
            field,
        })
    };

    Ok(LegFigures {
        price: require(leg.last_price, "last price")?,
        iv: require(leg.implied_volatility, "implied volatility")?,
        oi: require(leg.open_interest, "open interest")?,
    })
}

/// Locate the row for `expiry` and `strike` and pull out both legs.
///
/// The strike must be listed exactly; there is no nearest-strike search.
pub fn extract_quote(
    snapshot: &OptionChainSnapshot,
    expiry: Expiry,
    strike: Decimal,
) -> Result<OptionQuote, QuoteError> {
    let row: &OptionChainRow = snapshot
        .rows()
        .iter()
        .filter(|row| expiry.matches(&row.expiry_date))
        .find(|row| row.strike_price == strike)
        .ok_or(QuoteError::NotFound { expiry, strike })?;

    let ce = leg_figures(row.ce.as_ref(), Leg::Call, expiry, strike)?;
    let pe = leg_figures(row.pe.as_ref(), Leg::Put, expiry, strike)?;

    Ok(OptionQuote {
        strike,
        expiry,
        ce_price: ce.price,
        pe_price: pe.price,
        ce_iv: ce.iv,
        pe_iv: pe.iv,
        ce_oi: ce.oi,
        pe_oi: pe.oi,
    })
}
