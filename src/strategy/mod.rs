//! Straddle strategy implementation.
//!
//! Contains the core logic for:
//! - At-the-money quote extraction from the option chain
//! - Corporate event matching
//! - The straddle decision table
//! - Macro cue collection
//! - The end-to-end evaluation pipeline

mod decision;
mod evaluator;
mod events;
mod macro_cues;
mod quote;

pub use decision::{average_iv, decide, DecisionEngine, StraddleVerdict};
pub use evaluator::{
    EvaluationReport, Recommendation, StraddleEvaluator, StraddleQuery, UnavailableReason,
};
pub use events::{EventMatcher, EventScan};
pub use macro_cues::{IndicatorValue, MacroIndicatorSet, MacroSnapshot};
pub use quote::{extract_quote, Expiry, ExpiryParseError, OptionQuote, QuoteError};
