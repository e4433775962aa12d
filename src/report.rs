//! Plain-text rendering of evaluation results for the terminal.

use std::fmt::{self, Write};

use crate::strategy::{
    EvaluationReport, EventScan, MacroIndicatorSet, Recommendation, StraddleVerdict,
};
use crate::utils::decimal::{format_inr, format_pct};

/// Marker shown before the verdict text.
fn verdict_marker(recommendation: &Recommendation) -> &'static str {
    match recommendation.verdict() {
        Some(StraddleVerdict::BuyStraddle) => "✅",
        Some(StraddleVerdict::RiskyStraddle) => "⚠️ ",
        Some(StraddleVerdict::PossibleStraddle) => "📈",
        Some(StraddleVerdict::AvoidStraddle) | None => "❌",
    }
}

/// Render the matched-events section.
pub fn render_events(out: &mut String, events: &EventScan, available: bool) -> fmt::Result {
    if !available {
        writeln!(out, "Events: cannot fetch corporate announcements")?;
    } else if events.matches.is_empty() {
        writeln!(out, "Events: none")?;
    } else {
        for event in &events.matches {
            writeln!(
                out,
                "📜 Event: {} → {} on {}",
                event.symbol, event.description, event.date
            )?;
        }
    }
    Ok(())
}

/// Render the global cues section.
pub fn render_macro_cues(out: &mut String, cues: &MacroIndicatorSet) -> fmt::Result {
    writeln!(out, "🌍 Global Market Cues")?;
    for (indicator, value) in cues.iter() {
        writeln!(out, "   {:<12} {}", indicator.name(), value)?;
    }
    Ok(())
}

/// Render the full report.
pub fn render(report: &EvaluationReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let q = &report.query;

    writeln!(out, "📈 Option Chain Analysis: {} {} {}", q.symbol, q.strike, q.expiry)?;
    match (&report.quote, report.avg_iv) {
        (Some(quote), Some(avg_iv)) => {
            writeln!(
                out,
                "CE Price: {} | PE Price: {} | Total Premium: {}",
                format_inr(quote.ce_price),
                format_inr(quote.pe_price),
                format_inr(quote.total_premium())
            )?;
            writeln!(
                out,
                "IV: {} | CE OI: {} | PE OI: {}",
                format_pct(avg_iv),
                quote.ce_oi.normalize(),
                quote.pe_oi.normalize()
            )?;
        }
        _ => writeln!(out, "Quote: unavailable")?,
    }

    render_events(&mut out, &report.events, report.events_available)?;
    writeln!(out)?;
    render_macro_cues(&mut out, &report.macro_cues)?;
    writeln!(out)?;

    writeln!(out, "🎯 Decision")?;
    writeln!(
        out,
        "{} {}",
        verdict_marker(&report.recommendation),
        report.recommendation
    )?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::CorporateAnnouncement;
    use crate::strategy::{OptionQuote, StraddleQuery, UnavailableReason};
    use rust_decimal_macros::dec;

    fn report(recommendation: Recommendation, with_quote: bool) -> EvaluationReport {
        let expiry = "07-Aug-2025".parse().unwrap();
        let quote = OptionQuote {
            strike: dec!(49000),
            expiry,
            ce_price: dec!(320.50),
            pe_price: dec!(280),
            ce_iv: dec!(14.2),
            pe_iv: dec!(15.8),
            ce_oi: dec!(12000),
            pe_oi: dec!(9500),
        };

        EvaluationReport {
            query: StraddleQuery::new("BANKNIFTY", dec!(49000), expiry),
            quote: with_quote.then_some(quote),
            avg_iv: with_quote.then_some(dec!(15)),
            events: EventScan {
                triggered: true,
                matches: vec![CorporateAnnouncement::new(
                    "BANKNIFTY",
                    "Board Meeting",
                    "2025-08-05",
                )],
            },
            events_available: true,
            macro_cues: MacroIndicatorSet::unavailable(),
            recommendation,
        }
    }

    #[test]
    fn test_render_verdict_report() {
        let text = render(&report(
            Recommendation::Verdict(StraddleVerdict::BuyStraddle),
            true,
        ))
        .unwrap();

        assert!(text.contains("CE Price: ₹320.5 | PE Price: ₹280 | Total Premium: ₹600.5"));
        assert!(text.contains("IV: 15.00% | CE OI: 12000 | PE OI: 9500"));
        assert!(text.contains("📜 Event: BANKNIFTY → Board Meeting on 2025-08-05"));
        assert!(text.contains("Dow Futures  N/A"));
        assert!(text.contains("✅ BUY STRADDLE (Low IV + Event Trigger)"));
    }

    #[test]
    fn test_render_unavailable_report() {
        let text = render(&report(
            Recommendation::Unavailable(UnavailableReason::ChainUnavailable),
            false,
        ))
        .unwrap();

        assert!(text.contains("Quote: unavailable"));
        assert!(text.contains("❌ Cannot fetch option chain (weekend or blocked)"));
        assert!(!text.contains("CE Price"));
    }
}
