//! # Straddle Watch
//!
//! Decision support for options straddles on Indian markets: CE/PE prices,
//! implied volatility, open interest, corporate events and global cues for
//! one symbol / strike / expiry, combined into a BUY/AVOID suggestion.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `market`: NSE and Yahoo Finance clients behind provider traits
//! - `strategy`: Quote extraction, event matching, decision table, pipeline
//! - `report`: Terminal rendering of evaluation results
//! - `utils`: Shared utilities and decimal arithmetic

pub mod config;
pub mod market;
pub mod report;
pub mod strategy;
pub mod utils;

pub use config::Config;
