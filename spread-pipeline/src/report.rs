//! Report rendering for pipeline outcomes.
//!
//! Generates reports in two formats:
//! - Text (fixed-width trade table plus basket summary)
//! - JSON (the full outcome, for programmatic use)
//!
//! Output depends only on the outcome, never on wall-clock time, so
//! identical runs render identically.

use serde::{Deserialize, Serialize};
use spread_common::util::fit_width;

use crate::finalize::{FinalBasket, Recommendation};
use crate::pipeline::PipelineOutcome;

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Fixed-width table (human-readable)
    Text,
    /// JSON (machine-readable)
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "table" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Column headers with their minimum widths. Columns grow to fit the
/// widest cell so no leg or thesis text is cut.
const COLUMNS: [(&str, usize); 6] = [
    ("#", 2),
    ("Ticker", 6),
    ("Strategy", 9),
    ("Legs", 22),
    ("Thesis", 48),
    ("POP", 4),
];

/// Render an outcome in the requested format.
pub fn render(outcome: &PipelineOutcome, format: ReportFormat) -> spread_common::Result<String> {
    match format {
        ReportFormat::Text => Ok(to_text(outcome)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
    }
}

/// Fixed-width text report.
pub fn to_text(outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Credit spread selection as of {} (regime: {})\n\n",
        outcome.as_of, outcome.regime
    ));

    match &outcome.recommendation {
        Recommendation::Execute(basket) => {
            out.push_str(&trade_table(basket));
            out.push('\n');
            out.push_str(&basket_summary(basket));
        }
        Recommendation::Abstain { message } => {
            out.push_str(message);
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&funnel_summary(outcome));
    out
}

fn row(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| fit_width(cell, *width))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}\n", line.trim_end())
}

fn trade_table(basket: &FinalBasket) -> String {
    let rows: Vec<[String; 6]> = basket
        .trades
        .iter()
        .enumerate()
        .map(|(i, spread)| {
            [
                (i + 1).to_string(),
                spread.symbol.clone(),
                spread.strategy.to_string(),
                spread.legs_label(),
                spread.thesis.clone(),
                format!("{:.0}%", spread.pop * 100.0),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|(_, w)| w);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = row(&COLUMNS.map(|(name, _)| name.to_string()), &widths);
    let rule_width = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    table.push_str(&"-".repeat(rule_width));
    table.push('\n');
    for cells in &rows {
        table.push_str(&row(cells, &widths));
    }
    table
}

fn basket_summary(basket: &FinalBasket) -> String {
    format!(
        "Basket net delta:    {:+.1}\n\
         Basket net vega:     {:+.1}\n\
         Max loss per trade:  {}\n\
         Capital at risk:     {}\n",
        basket.net_delta,
        basket.net_vega,
        format_money(basket.max_loss_per_trade),
        format_money(basket.capital_at_risk),
    )
}

fn funnel_summary(outcome: &PipelineOutcome) -> String {
    let mut out = String::from("Funnel:\n");
    for stage in &outcome.funnel {
        out.push_str(&format!(
            "  {} {:>4} -> {:>4}",
            fit_width(&stage.stage.to_string(), 20),
            stage.input,
            stage.passed
        ));
        let reasons: Vec<String> = stage
            .rejections
            .iter()
            .map(|(reason, count)| format!("{reason}={count}"))
            .collect();
        if !reasons.is_empty() {
            out.push_str(&format!("  ({})", reasons.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// `$1,234.56`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStage, StageResult};
    use crate::scoring::MarketRegime;
    use crate::spread::tests::sample_spread;
    use chrono::NaiveDate;

    fn outcome(recommendation: Recommendation) -> PipelineOutcome {
        PipelineOutcome {
            as_of: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            regime: MarketRegime::Goldilocks,
            funnel: vec![StageResult::new(PipelineStage::CandidateFilter, 30, 22)],
            scores: Vec::new(),
            recommendation,
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("table".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(2000.0), "$2,000.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(12.5), "$12.50");
        assert_eq!(format_money(-950.0), "-$950.00");
    }

    #[test]
    fn test_abstain_text() {
        let text = to_text(&outcome(Recommendation::Abstain {
            message: "fewer than 5 trades meet criteria, do not execute".into(),
        }));
        assert!(text.contains("fewer than 5 trades meet criteria, do not execute"));
        assert!(!text.contains("Ticker"));
        assert!(text.contains("Candidate filter"));
    }

    #[test]
    fn test_execute_text_has_table_and_summary() {
        let basket = FinalBasket {
            trades: vec![sample_spread("AAPL", "Technology", 250.0)],
            net_delta: 8.0,
            net_vega: -3.7,
            max_loss_per_trade: 2000.0,
            capital_at_risk: 1820.0,
        };
        let text = to_text(&outcome(Recommendation::Execute(basket)));
        let header = text.lines().find(|l| l.starts_with("#")).unwrap();
        assert!(header.contains("Ticker"));
        assert!(header.ends_with("POP"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("-90P/+85P 2024-04-19"));
        assert!(text.contains("87%"));
        assert!(text.contains("Basket net delta:    +8.0"));
        assert!(text.contains("Max loss per trade:  $2,000.00"));
    }

    #[test]
    fn test_long_legs_and_thesis_are_not_cut() {
        let mut cheap = sample_spread("F", "Consumer Cyclical", 240.0);
        cheap.short_leg.strike = 21.5;
        cheap.long_leg.strike = 20.5;
        cheap.thesis =
            "Bull Put Consumer Cyclical: IV/HV 1.30, score 240; news: earnings, lawsuit (wait)"
                .to_string();
        let legs = cheap.legs_label();
        assert_eq!(legs, "-21.5P/+20.5P 2024-04-19");

        let basket = FinalBasket {
            trades: vec![sample_spread("AAPL", "Technology", 250.0), cheap.clone()],
            net_delta: 16.0,
            net_vega: -7.4,
            max_loss_per_trade: 2000.0,
            capital_at_risk: 3640.0,
        };
        let text = to_text(&outcome(Recommendation::Execute(basket)));
        assert!(text.contains(&legs));
        assert!(text.contains(&cheap.thesis));

        // Every table line lines up on the same column separators
        let table: Vec<&str> = text.lines().filter(|l| l.contains(" | ")).collect();
        let header_bars: Vec<usize> = table[0].match_indices(" | ").map(|(i, _)| i).collect();
        for line in &table[1..] {
            let bars: Vec<usize> = line.match_indices(" | ").map(|(i, _)| i).collect();
            assert_eq!(bars[..4], header_bars[..4]);
        }
    }

    #[test]
    fn test_json_round_trips_decision() {
        let json = render(
            &outcome(Recommendation::Abstain {
                message: "fewer than 5 trades meet criteria, do not execute".into(),
            }),
            ReportFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["recommendation"]["decision"], "abstain");
        assert_eq!(value["regime"], "goldilocks");
    }
}
