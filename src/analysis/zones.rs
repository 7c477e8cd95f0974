use crate::{
    analysis::zone_scoring::{classify_age, compare_zones, is_tested, score_strength},
    config::{ProfileConfig, constants::zones as k},
    domain::{Candle, Timeframe},
    models::{CandleSeries, DebugInfo, EnhancedZone, MarketStructure, Zone, ZoneKind},
    utils::{FIB_RATIOS, mean_or_zero, within_pct},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Ranked, capped zones per category plus the bookkeeping behind the cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedZones {
    pub demand: Vec<EnhancedZone>,
    pub supply: Vec<EnhancedZone>,
    pub bullish_fvgs: Vec<EnhancedZone>,
    pub bearish_fvgs: Vec<EnhancedZone>,
    pub debug: DebugInfo,
}

impl DetectedZones {
    pub fn all(&self) -> impl Iterator<Item = &EnhancedZone> {
        self.demand
            .iter()
            .chain(&self.supply)
            .chain(&self.bullish_fvgs)
            .chain(&self.bearish_fvgs)
    }
}

/// A raw candidate before scoring.
struct Candidate {
    kind: ZoneKind,
    zone: Zone,
    index: usize,
    body_ratio: f64,
}

/// Any close in the next few candles beyond the candle's opposite extreme.
fn has_reaction(candles: &[Candle], idx: usize, bullish: bool) -> bool {
    let c = &candles[idx];
    candles
        .iter()
        .skip(idx + 1)
        .take(k::REACTION_LOOKAHEAD)
        .any(|next| {
            if bullish {
                next.close_price > c.high_price
            } else {
                next.close_price < c.low_price
            }
        })
}

fn find_candidates(
    series: &CandleSeries,
    structure: &MarketStructure,
    start: usize,
    config: &ProfileConfig,
) -> Vec<Candidate> {
    let mut found = Vec::new();
    let Some((low, high)) = structure.major_range() else {
        return found;
    };
    let params = config.zone_params();
    let size = high.price - low.price;
    let discount_ceiling = low.price + params.discount_band * size;
    let premium_floor = high.price - params.discount_band * size;

    let candles = series.candles();
    let n = candles.len();

    for i in start..n {
        let c = &candles[i];
        let body_ratio = c.body_ratio();

        if body_ratio > params.min_body_ratio {
            // Order blocks: the last opposing candle before the move away
            if c.is_bearish()
                && c.high_price < discount_ceiling
                && (!params.require_reaction || has_reaction(candles, i, true))
            {
                found.push(Candidate {
                    kind: ZoneKind::Demand,
                    zone: Zone::new(c.low_price, c.high_price),
                    index: i,
                    body_ratio,
                });
            }
            if c.is_bullish()
                && c.low_price > premium_floor
                && (!params.require_reaction || has_reaction(candles, i, false))
            {
                found.push(Candidate {
                    kind: ZoneKind::Supply,
                    zone: Zone::new(c.low_price, c.high_price),
                    index: i,
                    body_ratio,
                });
            }
        }

        // Gaps need a candle on both sides
        if i == 0 || i + 1 >= n {
            continue;
        }
        let (prev, next) = (&candles[i - 1], &candles[i + 1]);
        if prev.high_price < next.low_price {
            found.push(Candidate {
                kind: ZoneKind::BullishFvg,
                zone: Zone::new(prev.high_price, next.low_price),
                index: i,
                body_ratio,
            });
        }
        if prev.low_price > next.high_price {
            found.push(Candidate {
                kind: ZoneKind::BearishFvg,
                zone: Zone::new(next.high_price, prev.low_price),
                index: i,
                body_ratio,
            });
        }
    }

    found
}

/// Runs the zone search over the profile's window and keeps the best three per category.
/// Without an ordered major range there is nothing to measure against: all categories come
/// back empty.
pub fn detect_zones(
    series: &CandleSeries,
    structure: &MarketStructure,
    timeframe: Timeframe,
    config: &ProfileConfig,
) -> DetectedZones {
    let params = config.zone_params();
    let n = series.klines();
    let search_range = params.search_window(timeframe).min(n);
    let start = n - search_range;
    let current_price = series.current_price();

    let fib_levels: Vec<f64> = FIB_RATIOS
        .iter()
        .filter_map(|&r| structure.retracement(r))
        .collect();

    let candidates = find_candidates(series, structure, start, config);
    let total = candidates.len();

    let mut out = DetectedZones::default();
    for cand in candidates {
        let mid = cand.zone.mid();
        let enhanced = EnhancedZone {
            kind: cand.kind,
            strength: score_strength(&cand.zone, cand.body_ratio, current_price),
            age: classify_age(series.candles_since(cand.index)),
            distance: cand.zone.distance_pct(current_price),
            tested: is_tested(series, cand.kind, &cand.zone, cand.index, params),
            formation_index: cand.index,
            confluence: fib_levels
                .iter()
                .any(|&lvl| within_pct(mid, lvl, k::FIB_CONFLUENCE_TOLERANCE)),
            body_ratio: cand.body_ratio,
            zone: cand.zone,
        };
        match cand.kind {
            ZoneKind::Demand => out.demand.push(enhanced),
            ZoneKind::Supply => out.supply.push(enhanced),
            ZoneKind::BullishFvg => out.bullish_fvgs.push(enhanced),
            ZoneKind::BearishFvg => out.bearish_fvgs.push(enhanced),
        }
    }

    for list in [
        &mut out.demand,
        &mut out.supply,
        &mut out.bullish_fvgs,
        &mut out.bearish_fvgs,
    ] {
        list.sort_by(compare_zones);
        list.truncate(k::MAX_PER_CATEGORY);
    }

    let kept: Vec<&EnhancedZone> = out.all().collect();
    let tested = kept.iter().filter(|z| z.tested).count();
    let distances: Vec<f64> = kept.iter().map(|z| z.distance).collect();
    out.debug = DebugInfo {
        total_zones_found: total,
        zones_discarded: total - kept.len(),
        search_range,
        tested_zones: tested,
        untested_zones: kept.len() - tested,
        avg_zone_distance: mean_or_zero(&distances),
    };

    #[cfg(debug_assertions)]
    if DF.log_zones {
        log::info!(
            "detect_zones(): {} candidates in last {} candles -> demand {}, supply {}, fvg {}/{} ({} discarded)",
            total,
            search_range,
            out.demand.len(),
            out.supply.len(),
            out.bullish_fvgs.len(),
            out.bearish_fvgs.len(),
            out.debug.zones_discarded
        );
    }

    out
}
