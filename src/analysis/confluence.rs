use itertools::Itertools;

use crate::{
    config::constants::confluence as k,
    models::{
        CandleSeries, Confluence, ConfluenceSource, EnhancedZone, MarketStructure, Strength,
        ZoneRef,
    },
    utils::{FIB_RATIOS, within_pct},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// A price that later candles kept returning to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HistoricalLevel {
    price: f64,
    touches: usize,
    resistance: bool,
}

fn zone_ref(z: &EnhancedZone) -> ZoneRef {
    ZoneRef {
        kind: z.kind,
        low: z.low(),
        high: z.high(),
    }
}

fn fibonacci_confluences(structure: &MarketStructure, zones: &[&EnhancedZone]) -> Vec<Confluence> {
    FIB_RATIOS
        .iter()
        .filter_map(|&ratio| {
            let level = structure.retracement(ratio)?;
            let matched: Vec<ZoneRef> = zones
                .iter()
                .filter(|z| within_pct(z.mid(), level, k::FIB_TOLERANCE))
                .map(|z| zone_ref(z))
                .collect();
            if matched.is_empty() {
                return None;
            }
            let strength = if matched.len() >= k::STRONG_ZONE_COUNT {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            Some(Confluence {
                source: ConfluenceSource::Fibonacci { ratio },
                level,
                strength,
                zones: matched,
            })
        })
        .collect()
}

/// Highs touched again by later highs become resistance, lows touched by later lows become
/// support. Near-identical levels of the same side collapse into the most-touched one.
fn historical_levels(series: &CandleSeries) -> Vec<HistoricalLevel> {
    let n = series.klines();
    let start = n.saturating_sub(k::HISTORY_WINDOW);

    let count_touches = |prices: &[f64], i: usize| {
        let level = prices[i];
        prices[(i + 1)..n]
            .iter()
            .filter(|&&p| within_pct(p, level, k::TOUCH_TOLERANCE))
            .count()
    };

    let mut raw = Vec::new();
    for i in start..n {
        let touches = count_touches(&series.high_prices, i);
        if touches >= k::MIN_TOUCHES {
            raw.push(HistoricalLevel {
                price: series.high_prices[i],
                touches,
                resistance: true,
            });
        }
        let touches = count_touches(&series.low_prices, i);
        if touches >= k::MIN_TOUCHES {
            raw.push(HistoricalLevel {
                price: series.low_prices[i],
                touches,
                resistance: false,
            });
        }
    }

    // Most touched first; stable sort keeps the earliest level on ties
    let mut kept: Vec<HistoricalLevel> = Vec::new();
    for lvl in raw.into_iter().sorted_by(|a, b| b.touches.cmp(&a.touches)) {
        let duplicate = kept.iter().any(|k2| {
            k2.resistance == lvl.resistance && within_pct(lvl.price, k2.price, k::DEDUP_TOLERANCE)
        });
        if !duplicate {
            kept.push(lvl);
        }
    }
    kept
}

fn touch_strength(touches: usize) -> Strength {
    if touches >= k::STRONG_TOUCHES {
        Strength::Strong
    } else if touches >= k::MODERATE_TOUCHES {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

/// Fibonacci levels and historical support/resistance that line up with detected zones.
/// Fibonacci entries come first; the list is capped.
pub fn detect_confluences(
    series: &CandleSeries,
    structure: &MarketStructure,
    zones: &[&EnhancedZone],
) -> Vec<Confluence> {
    if zones.is_empty() {
        return Vec::new();
    }

    let mut out = fibonacci_confluences(structure, zones);

    for lvl in historical_levels(series) {
        let matched: Vec<ZoneRef> = zones
            .iter()
            .filter(|z| z.zone.contains(lvl.price) || within_pct(z.mid(), lvl.price, k::ZONE_TOLERANCE))
            .map(|z| zone_ref(z))
            .collect();
        if matched.is_empty() {
            continue;
        }
        let source = if lvl.resistance {
            ConfluenceSource::Resistance { touches: lvl.touches }
        } else {
            ConfluenceSource::Support { touches: lvl.touches }
        };
        out.push(Confluence {
            source,
            level: lvl.price,
            strength: touch_strength(lvl.touches),
            zones: matched,
        });
    }

    #[cfg(debug_assertions)]
    if DF.log_confluence {
        let fib_count = out
            .iter()
            .filter(|c| matches!(c.source, ConfluenceSource::Fibonacci { .. }))
            .count();
        log::info!(
            "detect_confluences(): {} fibonacci + {} historical (cap {})",
            fib_count,
            out.len() - fib_count,
            k::MAX_ENTRIES
        );
    }

    out.truncate(k::MAX_ENTRIES);
    out
}
