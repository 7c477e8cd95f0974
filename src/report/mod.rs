//! Plain-text rendering of an analysis for the terminal.

use std::fmt::Write;

use tabled::{Table, Tabled, settings::Style};

use crate::{
    domain::{Candle, Timeframe},
    models::{AnalysisError, EnhancedZone, SmcAnalysis, TradePlan},
    utils::{epoch_ms_to_utc, format_duration},
};

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Dist %")]
    distance: String,
    #[tabled(rename = "Strength")]
    strength: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Tested")]
    tested: String,
    #[tabled(rename = "Fib")]
    confluence: String,
}

impl From<&EnhancedZone> for ZoneRow {
    fn from(z: &EnhancedZone) -> Self {
        Self {
            kind: z.kind.to_string(),
            low: format!("{:.4}", z.low()),
            high: format!("{:.4}", z.high()),
            distance: format!("{:.2}", z.distance),
            strength: z.strength.to_string(),
            age: z.age.to_string(),
            tested: if z.tested { "yes" } else { "no" }.to_string(),
            confluence: if z.confluence { "*" } else { "" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Setup")]
    title: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Stop")]
    stop: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "R:R")]
    rr: String,
    #[tabled(rename = "Risk %")]
    risk: String,
    #[tabled(rename = "Strength")]
    strength: String,
}

impl From<&TradePlan> for PlanRow {
    fn from(p: &TradePlan) -> Self {
        Self {
            side: p.direction.to_string(),
            title: p.title.clone(),
            entry: format!("{:.4}", p.entry),
            stop: format!("{:.4}", p.stop),
            target: format!("{:.4}", p.target),
            rr: format!("{:.2}", p.risk_reward),
            risk: format!("{:.2}", p.risk_pct()),
            strength: p.strength.to_string(),
        }
    }
}

#[derive(Tabled)]
struct ConfluenceRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Strength")]
    strength: String,
    #[tabled(rename = "Zones")]
    zones: usize,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "TF")]
    timeframe: String,
    #[tabled(rename = "Bias")]
    bias: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Prob")]
    probability: String,
    #[tabled(rename = "Zones")]
    zones: usize,
    #[tabled(rename = "Buys")]
    buys: usize,
    #[tabled(rename = "Sells")]
    sells: usize,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One line describing the candle span an analysis was run over.
pub fn describe_data(candles: &[Candle]) -> String {
    match (candles.first(), candles.last()) {
        (Some(first), Some(last)) => format!(
            "{} candles from {} to {} ({})",
            candles.len(),
            epoch_ms_to_utc(first.timestamp_ms),
            epoch_ms_to_utc(last.timestamp_ms),
            format_duration(last.timestamp_ms - first.timestamp_ms)
        ),
        _ => "no candles".to_string(),
    }
}

pub fn render_analysis(analysis: &SmcAnalysis) -> String {
    let mut out = String::new();
    let s = &analysis.structure;

    let _ = writeln!(
        out,
        "== {} | {} profile | price {:.4} ==",
        analysis.timeframe, analysis.profile, analysis.current_price
    );
    let _ = writeln!(
        out,
        "Structure: {} {} (p={:.0}%, {}){}",
        s.bias,
        s.last_event.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string()),
        s.probability,
        s.strength,
        s.break_level
            .map(|b| format!(", break level {:.4}", b))
            .unwrap_or_default()
    );
    if let Some((low, high)) = s.major_range() {
        let _ = writeln!(
            out,
            "Major range: {:.4} (#{}) .. {:.4} (#{})",
            low.price, low.index, high.price, high.index
        );
    }

    let zones: Vec<ZoneRow> = analysis.all_zones().map(ZoneRow::from).collect();
    if zones.is_empty() {
        let _ = writeln!(out, "\nNo zones.");
    } else {
        let _ = writeln!(out, "\nZones\n{}", table(zones));
    }

    if !analysis.confluences.is_empty() {
        let rows: Vec<ConfluenceRow> = analysis
            .confluences
            .iter()
            .map(|c| ConfluenceRow {
                source: c.source.to_string(),
                level: format!("{:.4}", c.level),
                strength: c.strength.to_string(),
                zones: c.zones.len(),
            })
            .collect();
        let _ = writeln!(out, "\nConfluences\n{}", table(rows));
    }

    if let Some(w) = &analysis.wyckoff {
        match &w.phase {
            Some(phase) => {
                let _ = writeln!(
                    out,
                    "\nWyckoff: {} (confidence {:.2}, range {:.4}..{:.4})",
                    phase.description, phase.confidence, phase.range_low, phase.range_high
                );
                for ev in &phase.events {
                    let _ = writeln!(
                        out,
                        "  {:<8} #{:<5} {:.4} ({:.2})",
                        ev.event_type.to_string(),
                        ev.index,
                        ev.price,
                        ev.confidence
                    );
                }
            }
            None => {
                let _ = writeln!(out, "\nWyckoff: {}", w.status);
            }
        }
    }

    let plans: Vec<PlanRow> = analysis.all_plans().map(PlanRow::from).collect();
    if plans.is_empty() {
        let _ = writeln!(out, "\nNo trade plans.");
    } else {
        let _ = writeln!(out, "\nTrade plans\n{}", table(plans));
        for p in analysis.all_plans() {
            let _ = writeln!(out, "  {}: {}", p.title, p.explanation);
        }
    }

    if let Some(d) = &analysis.debug_info {
        let _ = writeln!(
            out,
            "\nDebug: {} zones found, {} discarded, search range {}, tested {}/{}, avg distance {:.2}%",
            d.total_zones_found,
            d.zones_discarded,
            d.search_range,
            d.tested_zones,
            d.tested_zones + d.untested_zones,
            d.avg_zone_distance
        );
    }

    out
}

/// Compact one-row-per-timeframe overview for batch runs.
pub fn render_summary(results: &[(Timeframe, Result<SmcAnalysis, AnalysisError>)]) -> String {
    let rows: Vec<SummaryRow> = results
        .iter()
        .map(|(tf, res)| match res {
            Ok(a) => SummaryRow {
                timeframe: tf.to_string(),
                bias: a.structure.bias.to_string(),
                event: a
                    .structure
                    .last_event
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                probability: format!("{:.0}", a.structure.probability),
                zones: a.all_zones().count(),
                buys: a.buy_plans.len(),
                sells: a.sell_plans.len(),
            },
            Err(e) => SummaryRow {
                timeframe: tf.to_string(),
                bias: "error".to_string(),
                event: e.to_string(),
                probability: "-".to_string(),
                zones: 0,
                buys: 0,
                sells: 0,
            },
        })
        .collect();
    table(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::analyze,
        config::{ProfileConfig, TradingProfile},
    };

    fn candles() -> Vec<Candle> {
        (0..120)
            .map(|i| {
                let x = i as f64;
                let mid = 100.0 + 0.15 * x + 2.0 * (x * std::f64::consts::PI / 7.0).sin();
                Candle::new(i as i64 * 3_600_000, mid - 0.1, mid + 0.4, mid - 0.4, mid + 0.1)
            })
            .collect()
    }

    #[test]
    fn report_mentions_every_section() {
        let candles = candles();
        let analysis = analyze(&candles, Timeframe::H1, &ProfileConfig::new(TradingProfile::Balanced, true)).unwrap();
        let text = render_analysis(&analysis);
        assert!(text.contains("== 1h | balanced profile"));
        assert!(text.contains("Structure: bullish"));
        assert!(text.contains("Debug:"));
    }

    #[test]
    fn summary_has_a_row_per_timeframe() {
        let candles = candles();
        let results = vec![
            (Timeframe::H1, analyze(&candles, Timeframe::H1, &ProfileConfig::default())),
            (Timeframe::D1, Err(AnalysisError::InsufficientSwings { found: 2, required: 4 })),
        ];
        let text = render_summary(&results);
        assert!(text.contains("1h"));
        assert!(text.contains("1d"));
        assert!(text.contains("error"));
    }

    #[test]
    fn data_span_line() {
        let c = vec![Candle::new(0, 1.0, 1.0, 1.0, 1.0), Candle::new(7_200_000, 1.0, 1.0, 1.0, 1.0)];
        assert_eq!(describe_data(&c), "2 candles from 1970-01-01 00:00 to 1970-01-01 02:00 (2h)");
        assert_eq!(describe_data(&[]), "no candles");
    }
}
