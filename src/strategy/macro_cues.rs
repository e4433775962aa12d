//! Global market cues shown alongside the verdict.
//!
//! Purely informational; nothing here feeds the decision engine.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::config::MacroFailurePolicy;
use crate::market::{MacroIndicator, MacroIndicatorSource};

/// Latest value of one indicator, or an explicit gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorValue {
    Quoted(Decimal),
    Unavailable,
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Quoted(v) => write!(f, "{}", v),
            IndicatorValue::Unavailable => write!(f, "N/A"),
        }
    }
}

impl Serialize for IndicatorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IndicatorValue::Quoted(v) => Serialize::serialize(v, serializer),
            IndicatorValue::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Values for every indicator in `MacroIndicator::ALL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroIndicatorSet {
    values: BTreeMap<MacroIndicator, IndicatorValue>,
}

impl MacroIndicatorSet {
    /// Every indicator marked unavailable.
    pub fn unavailable() -> Self {
        Self {
            values: MacroIndicator::ALL
                .iter()
                .map(|&i| (i, IndicatorValue::Unavailable))
                .collect(),
        }
    }

    pub fn get(&self, indicator: MacroIndicator) -> IndicatorValue {
        self.values
            .get(&indicator)
            .copied()
            .unwrap_or(IndicatorValue::Unavailable)
    }

    /// Indicators in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MacroIndicator, IndicatorValue)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    pub fn is_fully_unavailable(&self) -> bool {
        self.values.values().all(|v| *v == IndicatorValue::Unavailable)
    }

    fn set(&mut self, indicator: MacroIndicator, value: IndicatorValue) {
        self.values.insert(indicator, value);
    }
}

impl Serialize for MacroIndicatorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(k, v)| (k.name(), v)))
    }
}

/// Collects the macro snapshot under a failure policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroSnapshot {
    policy: MacroFailurePolicy,
}

impl MacroSnapshot {
    pub fn new(policy: MacroFailurePolicy) -> Self {
        Self { policy }
    }

    /// Query each indicator once. Never fails; gaps become `Unavailable`.
    pub async fn collect<S>(&self, source: &S) -> MacroIndicatorSet
    where
        S: MacroIndicatorSource + ?Sized,
    {
        let mut set = MacroIndicatorSet::unavailable();
        let mut failures = 0usize;

        for indicator in MacroIndicator::ALL {
            match source.fetch_indicator(indicator).await {
                Ok(price) => set.set(indicator, IndicatorValue::Quoted(price)),
                Err(e) => {
                    failures += 1;
                    warn!(%indicator, error = %e, "Macro indicator unavailable");
                    if self.policy == MacroFailurePolicy::FailTogether {
                        return MacroIndicatorSet::unavailable();
                    }
                }
            }
        }

        info!(
            fetched = MacroIndicator::ALL.len() - failures,
            failures,
            "Macro snapshot collected"
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::traits::MockMacroIndicatorSource;
    use rust_decimal_macros::dec;

    fn all_quoted_except_crude() -> MockMacroIndicatorSource {
        let mut source = MockMacroIndicatorSource::new();
        source.expect_fetch_indicator().returning(|indicator| match indicator {
            MacroIndicator::DowFutures => Ok(dec!(44150.2)),
            MacroIndicator::SgxNifty => Ok(dec!(24596.15)),
            MacroIndicator::CrudeOil => Err(anyhow::anyhow!("timeout")),
            MacroIndicator::UsdInr => Ok(dec!(87.72)),
        });
        source
    }

    #[tokio::test]
    async fn test_all_indicators_quoted() {
        let mut source = MockMacroIndicatorSource::new();
        source
            .expect_fetch_indicator()
            .times(4)
            .returning(|_| Ok(dec!(100)));

        let set = MacroSnapshot::default().collect(&source).await;
        for (_, value) in set.iter() {
            assert_eq!(value, IndicatorValue::Quoted(dec!(100)));
        }
        assert_eq!(set.iter().count(), 4);
    }

    #[tokio::test]
    async fn test_fail_together_blanks_everything() {
        let source = all_quoted_except_crude();
        let set = MacroSnapshot::new(MacroFailurePolicy::FailTogether)
            .collect(&source)
            .await;

        assert!(set.is_fully_unavailable());
        assert_eq!(set.iter().count(), 4);
    }

    #[tokio::test]
    async fn test_per_indicator_keeps_good_values() {
        let source = all_quoted_except_crude();
        let set = MacroSnapshot::new(MacroFailurePolicy::PerIndicator)
            .collect(&source)
            .await;

        assert_eq!(set.get(MacroIndicator::DowFutures), IndicatorValue::Quoted(dec!(44150.2)));
        assert_eq!(set.get(MacroIndicator::CrudeOil), IndicatorValue::Unavailable);
        assert_eq!(set.get(MacroIndicator::UsdInr), IndicatorValue::Quoted(dec!(87.72)));
        assert!(!set.is_fully_unavailable());
    }

    #[test]
    fn test_display_and_json() {
        let mut set = MacroIndicatorSet::unavailable();
        set.set(MacroIndicator::UsdInr, IndicatorValue::Quoted(dec!(87.72)));

        assert_eq!(IndicatorValue::Unavailable.to_string(), "N/A");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["Dow Futures"], "N/A");
        assert_eq!(json["USD-INR"], "87.72");
    }
}
