//! Straddle decision engine.
//!
//! A deliberately coarse table over averaged IV and the event flag,
//! evaluated top to bottom (first match wins):
//!
//! | avg IV   | event | verdict  |
//! |----------|-------|----------|
//! | < low    | yes   | BUY      |
//! | > high   | yes   | RISKY    |
//! | < low    | no    | POSSIBLE |
//! | anything | any   | AVOID    |
//!
//! Exactly `low`, exactly `high` and the band between them fall through to
//! AVOID. There is no smoothing or hysteresis.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

use super::quote::OptionQuote;
use crate::config::DecisionConfig;
use crate::utils::decimal::mean;

/// Qualitative straddle suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StraddleVerdict {
    BuyStraddle,
    RiskyStraddle,
    PossibleStraddle,
    AvoidStraddle,
}

impl StraddleVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            StraddleVerdict::BuyStraddle => "BUY STRADDLE",
            StraddleVerdict::RiskyStraddle => "RISKY STRADDLE",
            StraddleVerdict::PossibleStraddle => "Possible Straddle",
            StraddleVerdict::AvoidStraddle => "AVOID STRADDLE",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            StraddleVerdict::BuyStraddle => "Low IV + Event Trigger",
            StraddleVerdict::RiskyStraddle => "IV too high, only if big gap expected",
            StraddleVerdict::PossibleStraddle => "Low IV but no major event",
            StraddleVerdict::AvoidStraddle => "High IV & No trigger",
        }
    }
}

impl fmt::Display for StraddleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.rationale())
    }
}

/// Mean of call and put implied volatility, in percentage points.
pub fn average_iv(quote: &OptionQuote) -> Decimal {
    mean(quote.ce_iv, quote.pe_iv)
}

/// Decision table with configurable IV thresholds.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    low_iv: Decimal,
    high_iv: Decimal,
}

impl DecisionEngine {
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            low_iv: config.low_iv,
            high_iv: config.high_iv,
        }
    }

    /// Map averaged IV and the event flag to a verdict. Total and pure.
    pub fn decide(&self, avg_iv: Decimal, event_flag: bool) -> StraddleVerdict {
        let low = avg_iv < self.low_iv;
        let high = avg_iv > self.high_iv;

        match (low, high, event_flag) {
            (true, _, true) => StraddleVerdict::BuyStraddle,
            (_, true, true) => StraddleVerdict::RiskyStraddle,
            (true, _, false) => StraddleVerdict::PossibleStraddle,
            _ => StraddleVerdict::AvoidStraddle,
        }
    }

    /// Decide straight from a quote.
    pub fn decide_quote(&self, quote: &OptionQuote, event_flag: bool) -> StraddleVerdict {
        self.decide(average_iv(quote), event_flag)
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self {
            low_iv: dec!(25),
            high_iv: dec!(50),
        }
    }
}

/// Decide with the standard 25 / 50 thresholds.
pub fn decide(avg_iv: Decimal, event_flag: bool) -> StraddleVerdict {
    DecisionEngine::default().decide(avg_iv, event_flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_iv_with_event_is_buy() {
        assert_eq!(decide(dec!(18.5), true), StraddleVerdict::BuyStraddle);
        assert_eq!(decide(dec!(0), true), StraddleVerdict::BuyStraddle);
        assert_eq!(decide(dec!(24.99), true), StraddleVerdict::BuyStraddle);
    }

    #[test]
    fn test_high_iv_with_event_is_risky() {
        assert_eq!(decide(dec!(62.0), true), StraddleVerdict::RiskyStraddle);
        assert_eq!(decide(dec!(50.01), true), StraddleVerdict::RiskyStraddle);
        assert_eq!(decide(dec!(300), true), StraddleVerdict::RiskyStraddle);
    }

    #[test]
    fn test_low_iv_without_event_is_possible() {
        assert_eq!(decide(dec!(10.0), false), StraddleVerdict::PossibleStraddle);
    }

    #[test]
    fn test_boundaries_fall_through_to_avoid() {
        assert_eq!(decide(dec!(25), true), StraddleVerdict::AvoidStraddle);
        assert_eq!(decide(dec!(25), false), StraddleVerdict::AvoidStraddle);
        assert_eq!(decide(dec!(50), true), StraddleVerdict::AvoidStraddle);
        assert_eq!(decide(dec!(37.5), true), StraddleVerdict::AvoidStraddle);
    }

    #[test]
    fn test_high_iv_without_event_is_avoid() {
        assert_eq!(decide(dec!(62.0), false), StraddleVerdict::AvoidStraddle);
        assert_eq!(decide(dec!(30), false), StraddleVerdict::AvoidStraddle);
    }

    #[test]
    fn test_negative_iv_is_still_classified() {
        // Bad upstream data must not panic; it simply reads as "low".
        assert_eq!(decide(dec!(-1), false), StraddleVerdict::PossibleStraddle);
    }

    #[test]
    fn test_total_over_a_grid() {
        let mut iv = dec!(-10);
        while iv <= dec!(310) {
            for flag in [true, false] {
                let first = decide(iv, flag);
                assert_eq!(first, decide(iv, flag), "not deterministic at {} {}", iv, flag);
            }
            iv += dec!(0.5);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = DecisionEngine::new(&DecisionConfig {
            low_iv: dec!(15),
            high_iv: dec!(40),
        });
        assert_eq!(engine.decide(dec!(18.5), true), StraddleVerdict::AvoidStraddle);
        assert_eq!(engine.decide(dec!(45), true), StraddleVerdict::RiskyStraddle);
    }

    #[test]
    fn test_average_iv_and_quote_decision() {
        let quote = OptionQuote {
            strike: dec!(49000),
            expiry: "07-Aug-2025".parse().unwrap(),
            ce_price: dec!(320),
            pe_price: dec!(280),
            ce_iv: dec!(14.2),
            pe_iv: dec!(15.8),
            ce_oi: dec!(12000),
            pe_oi: dec!(9500),
        };
        assert_eq!(average_iv(&quote), dec!(15));
        assert_eq!(
            DecisionEngine::default().decide_quote(&quote, true),
            StraddleVerdict::BuyStraddle
        );
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(
            StraddleVerdict::BuyStraddle.to_string(),
            "BUY STRADDLE (Low IV + Event Trigger)"
        );
        assert_eq!(
            serde_json::to_string(&StraddleVerdict::AvoidStraddle).unwrap(),
            "\"AVOID_STRADDLE\""
        );
    }
}
