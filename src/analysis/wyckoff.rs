//! Wyckoff schema reading for range-bound markets.
//!
//! The input has no volume column, so every "volume" test here uses the candle's range
//! relative to the preceding candles (`CandleSeries::relative_ranges`).

use crate::{
    analysis::zone_scoring::classify_age,
    config::{ProfileConfig, constants::wyckoff as k},
    models::{
        CandleSeries, MarketStructure, Phase, SchemaType, Strength, TradeDirection, TradePlan,
        WyckoffAnalysis, WyckoffEvent, WyckoffEventType, WyckoffPhase, WyckoffStatus,
    },
    utils::mean_or_zero,
};

#[cfg(debug_assertions)]
use crate::config::DF;

use crate::models::WyckoffEventType as E;

/// The three events that define a schema, in the order they are expected to print.
struct SchemaRoles {
    schema: SchemaType,
    climax: WyckoffEventType,
    reversal: WyckoffEventType,
    last_point: WyckoffEventType,
}

const ACCUMULATION: SchemaRoles = SchemaRoles {
    schema: SchemaType::Accumulation,
    climax: E::Sc,
    reversal: E::Spring,
    last_point: E::Lps,
};

const DISTRIBUTION: SchemaRoles = SchemaRoles {
    schema: SchemaType::Distribution,
    climax: E::Bc,
    reversal: E::UpThrust,
    last_point: E::Lpsy,
};

/// Range bounds when the major swings span enough time and enough price.
fn validate_range(series: &CandleSeries, structure: &MarketStructure) -> Option<(f64, f64)> {
    let (low, high) = structure.major_range()?;
    let duration = low.index.abs_diff(high.index);
    let price = series.current_price();
    if duration < k::MIN_RANGE_CANDLES || price <= f64::EPSILON {
        return None;
    }
    if (high.price - low.price) / price < k::MIN_RANGE_PCT {
        return None;
    }
    Some((low.price, high.price))
}

/// Base 0.5, plus up to 0.3 for range expansion over the trailing average, plus up to 0.15
/// for body dominance, plus 0.15 when the confirming close is in place.
pub(crate) fn event_confidence(relative_range: f64, body_ratio: f64, direction_confirmed: bool) -> f64 {
    let mut confidence = k::BASE_CONFIDENCE;
    if relative_range > 1.0 {
        confidence += (k::MAX_VOLUME_BONUS * (relative_range - 1.0)).min(k::MAX_VOLUME_BONUS);
    }
    confidence += k::MAX_BODY_BONUS * body_ratio.clamp(0.0, 1.0);
    if direction_confirmed {
        confidence += k::DIRECTION_BONUS;
    }
    confidence.min(1.0)
}

fn detect_events(series: &CandleSeries, range_low: f64, range_high: f64) -> Vec<WyckoffEvent> {
    let n = series.klines();
    let mut events = Vec::new();
    if n <= 2 * k::EDGE_EXCLUSION {
        return events;
    }

    let half = range_low + (range_high - range_low) / 2.0;
    let mut spring_seen = false;
    let mut upthrust_seen = false;

    for i in k::EDGE_EXCLUSION..(n - k::EDGE_EXCLUSION) {
        let c = series.get_candle(i);
        let prev = series.get_candle(i - 1);
        let next = series.get_candle(i + 1);
        let rvol = series.relative_ranges[i];
        let body = c.body_ratio();
        let climactic = rvol > k::CLIMAX_VOLUME_MULT;

        let mut push = |event_type, price, confirmed| {
            let confidence = event_confidence(rvol, body, confirmed);
            if confidence >= k::MIN_EVENT_CONFIDENCE {
                events.push(WyckoffEvent {
                    event_type,
                    price,
                    index: i,
                    confidence,
                });
                true
            } else {
                false
            }
        };

        // Climaxes: wide candles into the range edges
        if climactic && c.is_bearish() && c.low_price <= range_low * (1.0 + k::CLIMAX_PROXIMITY) {
            push(E::Sc, c.low_price, next.close_price > c.close_price);
        }
        if climactic && c.is_bullish() && c.high_price >= range_high * (1.0 - k::CLIMAX_PROXIMITY) {
            push(E::Bc, c.high_price, next.close_price < c.close_price);
        }

        // False breaks: pierce (or touch) the edge, close back inside, follow-through next
        if c.low_price <= range_low
            && c.close_price > range_low
            && next.close_price > c.close_price
            && push(E::Spring, c.low_price, c.is_bullish())
        {
            spring_seen = true;
        }
        if c.high_price >= range_high
            && c.close_price < range_high
            && next.close_price < c.close_price
            && push(E::UpThrust, c.high_price, c.is_bearish())
        {
            upthrust_seen = true;
        }

        // Last points: pivots that fail to revisit the edge after a false break
        let pivot_low = c.low_price < prev.low_price && c.low_price < next.low_price;
        if spring_seen
            && pivot_low
            && c.low_price > range_low
            && c.low_price < half
            && c.is_bullish()
        {
            push(E::Lps, c.low_price, next.close_price > c.close_price);
        }
        let pivot_high = c.high_price > prev.high_price && c.high_price > next.high_price;
        if upthrust_seen
            && pivot_high
            && c.high_price < range_high
            && c.high_price > half
            && c.is_bearish()
        {
            push(E::Lpsy, c.high_price, next.close_price < c.close_price);
        }
    }

    events
}

/// Within each type, events closer than the dedup window collapse into the most confident.
fn dedup_events(events: Vec<WyckoffEvent>) -> Vec<WyckoffEvent> {
    let mut kept: Vec<WyckoffEvent> = Vec::with_capacity(events.len());
    for ev in events {
        let clash = kept
            .iter()
            .rposition(|k2| k2.event_type == ev.event_type && ev.index.abs_diff(k2.index) <= k::DEDUP_WINDOW);
        match clash {
            Some(pos) if ev.confidence > kept[pos].confidence => kept[pos] = ev,
            Some(_) => {}
            None => kept.push(ev),
        }
    }
    kept.sort_by_key(|e| e.index);
    kept
}

fn latest(events: &[WyckoffEvent], event_type: WyckoffEventType) -> Option<&WyckoffEvent> {
    events.iter().filter(|e| e.event_type == event_type).max_by_key(|e| e.index)
}

fn qualifies(events: &[WyckoffEvent], roles: &SchemaRoles) -> bool {
    let has = |t| events.iter().any(|e| e.event_type == t);
    has(roles.reversal) || (has(roles.climax) && has(roles.last_point))
}

/// Index of the most recent reversal (falling back to last-point) event of a schema.
fn recency(events: &[WyckoffEvent], roles: &SchemaRoles) -> Option<usize> {
    latest(events, roles.reversal)
        .or_else(|| latest(events, roles.last_point))
        .map(|e| e.index)
}

fn describe(schema: SchemaType, phase: Phase) -> String {
    let text = match (schema, phase) {
        (SchemaType::Accumulation, Phase::A) => "selling climax printed, downtrend stopping",
        (SchemaType::Accumulation, Phase::B) => "building cause inside the range",
        (SchemaType::Accumulation, Phase::C) => "spring tested the lows and recovered",
        (SchemaType::Accumulation, Phase::D) => "higher low after the spring, markup likely",
        (SchemaType::Accumulation, Phase::E) => "price left the range to the upside",
        (SchemaType::Distribution, Phase::A) => "buying climax printed, uptrend stopping",
        (SchemaType::Distribution, Phase::B) => "building cause inside the range",
        (SchemaType::Distribution, Phase::C) => "upthrust tested the highs and failed",
        (SchemaType::Distribution, Phase::D) => "lower high after the upthrust, markdown likely",
        (SchemaType::Distribution, Phase::E) => "price left the range to the downside",
    };
    format!("{} phase {}: {}", schema, phase, text)
}

fn classify_phase(
    events: Vec<WyckoffEvent>,
    range_low: f64,
    range_high: f64,
    current_price: f64,
) -> Option<WyckoffPhase> {
    let accumulation = qualifies(&events, &ACCUMULATION);
    let distribution = qualifies(&events, &DISTRIBUTION);

    let roles = match (accumulation, distribution) {
        (false, false) => return None,
        (true, false) => &ACCUMULATION,
        (false, true) => &DISTRIBUTION,
        (true, true) => {
            if recency(&events, &DISTRIBUTION) > recency(&events, &ACCUMULATION) {
                &DISTRIBUTION
            } else {
                &ACCUMULATION
            }
        }
    };

    let has = |t| events.iter().any(|e| e.event_type == t);
    let (climax, reversal, last_point) = (has(roles.climax), has(roles.reversal), has(roles.last_point));

    let left_range = match roles.schema {
        SchemaType::Accumulation => current_price > range_high,
        SchemaType::Distribution => current_price < range_low,
    };
    let phase = if reversal && last_point && left_range {
        Phase::E
    } else if reversal && last_point {
        Phase::D
    } else if reversal {
        Phase::C
    } else if climax && !last_point {
        Phase::A
    } else {
        Phase::B
    };

    let confidences: Vec<f64> = events.iter().map(|e| e.confidence).collect();
    let mut confidence = k::PHASE_BASE_CONFIDENCE
        + (k::PHASE_EVENT_STEP * events.len() as f64).min(k::PHASE_EVENT_CAP)
        + k::PHASE_MEAN_WEIGHT * mean_or_zero(&confidences);
    if reversal {
        confidence += k::REVERSAL_BONUS;
    }
    if last_point {
        confidence += k::LAST_POINT_BONUS;
    }

    Some(WyckoffPhase {
        schema_type: roles.schema,
        phase,
        confidence: confidence.min(1.0),
        trading_opportunity: matches!(phase, Phase::C | Phase::D),
        range_high,
        range_low,
        description: describe(roles.schema, phase),
        events,
    })
}

fn plan_strength(confidence: f64) -> Strength {
    if confidence >= 0.8 {
        Strength::Strong
    } else if confidence >= 0.6 {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

/// Phase C trades the false break itself, phase D the confirming pivot.
fn build_plans(phase: &WyckoffPhase, series: &CandleSeries, config: &ProfileConfig) -> Vec<TradePlan> {
    let (low, high) = (phase.range_low, phase.range_high);
    let size = high - low;
    let strength = plan_strength(phase.confidence);

    let candidate = match (phase.schema_type, phase.phase) {
        (SchemaType::Accumulation, Phase::C) => latest(&phase.events, E::Spring).map(|ev| {
            let stop = ev.price.min(low) * (1.0 - k::STOP_OFFSET);
            (TradeDirection::Buy, "Wyckoff Spring", ev, ev.price * (1.0 + k::ENTRY_OFFSET), stop, high)
        }),
        (SchemaType::Accumulation, Phase::D) => latest(&phase.events, E::Lps).map(|ev| {
            let target = high + k::MARKUP_PROJECTION * size;
            (TradeDirection::Buy, "Wyckoff LPS", ev, ev.price, low, target)
        }),
        (SchemaType::Distribution, Phase::C) => latest(&phase.events, E::UpThrust).map(|ev| {
            let stop = ev.price.max(high) * (1.0 + k::STOP_OFFSET);
            (TradeDirection::Sell, "Wyckoff UpThrust", ev, ev.price * (1.0 - k::ENTRY_OFFSET), stop, low)
        }),
        (SchemaType::Distribution, Phase::D) => latest(&phase.events, E::Lpsy).map(|ev| {
            let target = low - k::MARKUP_PROJECTION * size;
            (TradeDirection::Sell, "Wyckoff LPSY", ev, ev.price, high, target)
        }),
        _ => None,
    };

    let params = config.plan_params();
    candidate
        .and_then(|(direction, title, ev, entry, stop, target)| {
            TradePlan::try_new(
                direction,
                title.to_string(),
                entry,
                stop,
                target,
                strength,
                classify_age(series.candles_since(ev.index)),
                format!("{} ({} at {:.4}, confidence {:.2})", phase.description, ev.event_type, ev.price, ev.confidence),
            )
        })
        .filter(|p| p.risk_reward >= k::MIN_PLAN_RR)
        .filter(|p| p.risk_reward >= params.min_rr && p.risk_reward <= params.max_rr)
        .into_iter()
        .take(params.max_plans)
        .collect()
}

/// Reads a Wyckoff schema off a sideways market. Callers run this only for sideways bias.
pub fn analyze_wyckoff(
    series: &CandleSeries,
    structure: &MarketStructure,
    config: &ProfileConfig,
) -> WyckoffAnalysis {
    let Some((range_low, range_high)) = validate_range(series, structure) else {
        return WyckoffAnalysis::without_pattern(WyckoffStatus::Developing);
    };

    let events = dedup_events(detect_events(series, range_low, range_high));

    #[cfg(debug_assertions)]
    if DF.log_wyckoff {
        log::info!(
            "analyze_wyckoff(): range {:.4}..{:.4}, events [{}]",
            range_low,
            range_high,
            events
                .iter()
                .map(|e| format!("{}@{}({:.2})", e.event_type, e.index, e.confidence))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let Some(phase) = classify_phase(events, range_low, range_high, series.current_price()) else {
        return WyckoffAnalysis::without_pattern(WyckoffStatus::NoSchema);
    };

    let plans = if phase.trading_opportunity {
        build_plans(&phase, series, config)
    } else {
        Vec::new()
    };

    #[cfg(debug_assertions)]
    if DF.log_wyckoff {
        log::info!(
            "analyze_wyckoff(): {} (confidence {:.2}), {} plan(s)",
            phase.description,
            phase.confidence,
            plans.len()
        );
    }

    WyckoffAnalysis {
        is_wyckoff_pattern: true,
        status: WyckoffStatus::Confirmed,
        phase: Some(phase),
        plans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{classify_structure, detect_swing_points},
        config::TradingProfile,
        domain::Candle,
        models::{Bias, MajorSwing},
    };

    /// Linear path through `(index, mid)` waypoints; candles follow the direction of travel.
    fn path(waypoints: &[(usize, f64)]) -> Vec<Candle> {
        let n = waypoints.last().map(|w| w.0 + 1).unwrap_or(0);
        let mids: Vec<f64> = (0..n)
            .map(|i| {
                let seg = waypoints.windows(2).find(|w| i >= w[0].0 && i <= w[1].0).unwrap();
                let (a, b) = (seg[0], seg[1]);
                a.1 + (b.1 - a.1) * (i - a.0) as f64 / (b.0 - a.0) as f64
            })
            .collect();
        (0..n)
            .map(|i| {
                let m = mids[i];
                let slope = if i + 1 < n { mids[i + 1] - m } else { m - mids[i - 1] };
                let dir = slope.signum();
                Candle::new(i as i64, m - 0.15 * dir, m + 0.3, m - 0.3, m + 0.15 * dir)
            })
            .collect()
    }

    /// Range top at 8, spring to 95.0 at 40, higher low (LPS) at 56, drift up to the end.
    fn accumulation() -> Vec<Candle> {
        let mut candles = path(&[
            (0, 100.0),
            (8, 104.7),
            (20, 97.0),
            (30, 102.0),
            (40, 96.5),
            (48, 101.5),
            (56, 98.8),
            (79, 101.0),
        ]);
        candles[40] = Candle::new(40, 96.2, 97.0, 95.0, 96.9);
        candles
    }

    fn structure_of(candles: &[Candle]) -> MarketStructure {
        let series = CandleSeries::new(candles);
        classify_structure(&detect_swing_points(&series, 5)).unwrap()
    }

    #[test]
    fn confidence_components() {
        assert!((event_confidence(1.0, 0.0, false) - 0.5).abs() < 1e-12);
        assert!((event_confidence(2.0, 0.0, false) - 0.8).abs() < 1e-12);
        assert!((event_confidence(1.5, 1.0, true) - 0.95).abs() < 1e-12);
        assert_eq!(event_confidence(5.0, 1.0, true), 1.0);
    }

    #[test]
    fn accumulation_reaches_phase_d_with_a_buy() {
        let candles = accumulation();
        let structure = structure_of(&candles);
        assert_eq!(structure.bias, Bias::Sideways);
        assert_eq!(structure.major_low.unwrap().index, 40);

        let series = CandleSeries::new(&candles);
        let config = ProfileConfig::new(TradingProfile::Balanced, false);
        let result = analyze_wyckoff(&series, &structure, &config);

        assert!(result.is_wyckoff_pattern);
        let phase = result.phase.as_ref().unwrap();
        assert_eq!(phase.schema_type, SchemaType::Accumulation);
        assert_eq!(phase.phase, Phase::D);
        assert!(phase.trading_opportunity);
        assert!(phase.events.iter().any(|e| e.event_type == E::Spring && e.index == 40));
        assert!(phase.events.iter().any(|e| e.event_type == E::Lps && e.index == 56));

        assert_eq!(result.plans.len(), 1);
        let plan = &result.plans[0];
        assert_eq!(plan.direction, TradeDirection::Buy);
        assert!((plan.entry - 98.5).abs() < 1e-9);
        assert!((plan.stop - 95.0).abs() < 1e-9);
        assert!((plan.target - 110.0).abs() < 1e-9);
        assert!(plan.risk_reward >= 1.0);
    }

    #[test]
    fn spring_without_follow_through_pivot_is_phase_c() {
        let mut candles = accumulation();
        // Flatten the post-spring dip so no LPS pivot forms
        let tail = path(&[(0, 96.9), (38, 101.0)]);
        for (offset, c) in tail.into_iter().enumerate() {
            let i = 41 + offset;
            candles[i] = Candle { timestamp_ms: i as i64, ..c };
        }
        let structure = MarketStructure {
            bias: Bias::Sideways,
            last_event: None,
            break_level: None,
            major_high: Some(MajorSwing { price: 105.0, index: 8 }),
            major_low: Some(MajorSwing { price: 95.0, index: 40 }),
            probability: 52.0,
            strength: Strength::Weak,
            swing_count: 5,
        };
        let series = CandleSeries::new(&candles);
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::new(TradingProfile::Scalp, false));
        let phase = result.phase.unwrap();
        assert_eq!(phase.phase, Phase::C);
        assert!(phase.trading_opportunity);
    }

    #[test]
    fn short_or_narrow_range_is_developing() {
        let candles = accumulation();
        let series = CandleSeries::new(&candles);
        let mut structure = structure_of(&candles);
        structure.major_high = Some(MajorSwing { price: 105.0, index: 30 });
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::default());
        assert_eq!(result.status, WyckoffStatus::Developing);
        assert!(!result.is_wyckoff_pattern);

        let mut structure = structure_of(&candles);
        structure.major_high = Some(MajorSwing { price: 96.0, index: 8 });
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::default());
        assert_eq!(result.status, WyckoffStatus::Developing);
    }

    #[test]
    fn quiet_range_has_no_schema() {
        let candles = path(&[(0, 100.0), (8, 104.7), (20, 97.0), (30, 102.0), (40, 96.5), (60, 100.0)]);
        let series = CandleSeries::new(&candles);
        // Range floor set below every wick: nothing can spring from it
        let structure = MarketStructure {
            bias: Bias::Sideways,
            last_event: None,
            break_level: None,
            major_high: Some(MajorSwing { price: 106.0, index: 8 }),
            major_low: Some(MajorSwing { price: 94.0, index: 40 }),
            probability: 52.0,
            strength: Strength::Weak,
            swing_count: 5,
        };
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::default());
        assert_eq!(result.status, WyckoffStatus::NoSchema);
        assert!(result.plans.is_empty());
    }

    /// Price reflected through 100: every low becomes a high and every event its mirror.
    fn reflected(candles: &[Candle]) -> Vec<Candle> {
        candles
            .iter()
            .map(|c| {
                Candle::new(
                    c.timestamp_ms,
                    200.0 - c.open_price,
                    200.0 - c.low_price,
                    200.0 - c.high_price,
                    200.0 - c.close_price,
                )
            })
            .collect()
    }

    #[test]
    fn distribution_reaches_phase_d_with_a_sell() {
        let candles = reflected(&accumulation());
        let series = CandleSeries::new(&candles);
        // Reflection of the accumulation range [95, 105]
        let structure = MarketStructure {
            bias: Bias::Sideways,
            last_event: None,
            break_level: None,
            major_high: Some(MajorSwing { price: 105.0, index: 40 }),
            major_low: Some(MajorSwing { price: 95.0, index: 8 }),
            probability: 52.0,
            strength: Strength::Weak,
            swing_count: 6,
        };
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::default());

        let phase = result.phase.as_ref().unwrap();
        assert_eq!(phase.schema_type, SchemaType::Distribution);
        assert_eq!(phase.phase, Phase::D);
        let events: Vec<(WyckoffEventType, usize)> =
            phase.events.iter().map(|e| (e.event_type, e.index)).collect();
        assert_eq!(events, vec![(E::UpThrust, 40), (E::Lpsy, 56)]);

        assert_eq!(result.plans.len(), 1);
        let plan = &result.plans[0];
        assert_eq!(plan.direction, TradeDirection::Sell);
        assert!((plan.entry - 101.5).abs() < 1e-9);
        assert!((plan.stop - 105.0).abs() < 1e-9);
        assert!((plan.target - 90.0).abs() < 1e-9);
        assert!((plan.risk_reward - 11.5 / 3.5).abs() < 1e-9);
    }

    #[test]
    fn wide_candles_at_the_edges_are_climaxes() {
        let mut candles: Vec<Candle> = (0..50)
            .map(|i| Candle::new(i, 100.1, 100.3, 99.7, 99.9))
            .collect();
        // Selling climax into the floor, then a higher close
        candles[20] = Candle::new(20, 99.8, 100.0, 96.5, 96.8);
        candles[21] = Candle::new(21, 96.8, 97.8, 96.7, 97.6);
        // Buying climax into the ceiling, then a lower close
        candles[30] = Candle::new(30, 100.2, 103.6, 100.0, 103.4);
        candles[31] = Candle::new(31, 103.4, 103.5, 102.2, 102.4);
        let series = CandleSeries::new(&candles);

        let events = detect_events(&series, 96.0, 104.0);
        let found: Vec<(WyckoffEventType, usize, f64)> =
            events.iter().map(|e| (e.event_type, e.index, e.price)).collect();
        assert_eq!(found, vec![(E::Sc, 20, 96.5), (E::Bc, 30, 103.6)]);
        // Wide range, big body and a confirming close saturate the score
        assert_eq!(events[0].confidence, 1.0);

        // Climaxes alone never make a schema
        assert!(classify_phase(events, 96.0, 104.0, 100.0).is_none());
    }

    #[test]
    fn breakout_above_the_range_is_phase_e() {
        let mut candles = accumulation();
        for (j, mid) in [102.0, 103.0, 104.0, 105.0, 106.0].into_iter().enumerate() {
            let i = 80 + j as i64;
            candles.push(Candle::new(i, mid - 0.4, mid + 0.5, mid - 0.5, mid + 0.4));
        }
        let structure = structure_of(&candles);
        assert_eq!(structure.bias, Bias::Sideways);

        let series = CandleSeries::new(&candles);
        let result = analyze_wyckoff(&series, &structure, &ProfileConfig::default());
        assert_eq!(result.status, WyckoffStatus::Confirmed);
        let phase = result.phase.as_ref().unwrap();
        assert_eq!(phase.schema_type, SchemaType::Accumulation);
        assert_eq!(phase.phase, Phase::E);
        assert!(!phase.trading_opportunity);
        assert!(result.plans.is_empty());
    }

    #[test]
    fn dedup_keeps_the_more_confident_neighbour() {
        let ev = |index, confidence| WyckoffEvent {
            event_type: E::Sc,
            price: 95.0,
            index,
            confidence,
        };
        let out = dedup_events(vec![ev(10, 0.7), ev(13, 0.9), ev(30, 0.65)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].index, 13);
        assert_eq!(out[1].index, 30);
    }
}
