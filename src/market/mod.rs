//! Market data integrations for the straddle check.
//!
//! ## NSE
//! Public website API for:
//! - Option chains (indices and equities)
//! - Corporate announcements
//!
//! ## Yahoo Finance
//! Chart API quotes for the global cues (Dow, Nifty, crude, USD-INR).

mod nse;
pub mod traits;
mod types;
mod yahoo;

pub use nse::NseClient;
pub use traits::{AnnouncementFeed, MacroIndicator, MacroIndicatorSource, OptionChainProvider};
pub use types::*;
pub use yahoo::YahooClient;
