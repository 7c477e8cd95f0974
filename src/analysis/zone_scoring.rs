use std::cmp::Ordering;

use crate::{
    config::{ZoneParams, constants::zones as k},
    models::{CandleSeries, EnhancedZone, Strength, Zone, ZoneAge, ZoneKind},
    utils::overlap,
};

/// Grades a zone from three additive components: how tight it is, how close price is,
/// and how dominant the forming candle's body was.
pub(crate) fn score_strength(zone: &Zone, body_ratio: f64, current_price: f64) -> Strength {
    let mut score = 0;

    let size_pct = if current_price > f64::EPSILON {
        zone.height() / current_price * 100.0
    } else {
        f64::INFINITY
    };
    if size_pct < k::SMALL_ZONE_PCT {
        score += 2;
    } else if size_pct < k::MEDIUM_ZONE_PCT {
        score += 1;
    }

    let distance = zone.distance_pct(current_price);
    if distance < k::NEAR_DISTANCE_PCT {
        score += 2;
    } else if distance < k::MID_DISTANCE_PCT {
        score += 1;
    }

    if body_ratio > k::DOMINANT_BODY {
        score += 2;
    } else if body_ratio > k::SOLID_BODY {
        score += 1;
    }

    if score >= k::STRONG_SCORE {
        Strength::Strong
    } else if score >= k::MODERATE_SCORE {
        Strength::Moderate
    } else {
        Strength::Weak
    }
}

pub(crate) fn classify_age(candles_since: usize) -> ZoneAge {
    if candles_since <= k::FRESH_AGE {
        ZoneAge::Fresh
    } else if candles_since <= k::RECENT_AGE {
        ZoneAge::Recent
    } else {
        ZoneAge::Old
    }
}

/// Fraction of the zone covered by a candle's range. A zero-height zone counts as fully
/// covered whenever the candle touches it.
fn coverage(zone: &Zone, low: f64, high: f64) -> f64 {
    let height = zone.height();
    if height <= f64::EPSILON {
        return if low <= zone.high && high >= zone.low { 1.0 } else { 0.0 };
    }
    overlap(zone.low, zone.high, low, high) / height
}

/// Scans forward from formation for a candle that penetrates the zone deeply enough.
/// Profiles with a reaction window also need a candle in the expected direction to close
/// beyond the zone midpoint shortly after the touch.
pub(crate) fn is_tested(
    series: &CandleSeries,
    kind: ZoneKind,
    zone: &Zone,
    formation_index: usize,
    params: &ZoneParams,
) -> bool {
    let n = series.klines();
    let mut required = params.penetration;
    if series.candles_since(formation_index) > k::STALE_AGE {
        required *= k::STALE_PENETRATION_MULT;
    }

    let mid = zone.mid();
    let reacts = |idx: usize| {
        let c = series.get_candle(idx);
        if kind.is_bullish() {
            c.is_bullish() && c.close_price > mid
        } else {
            c.is_bearish() && c.close_price < mid
        }
    };

    for j in (formation_index + k::TEST_SCAN_OFFSET)..n {
        let penetration = coverage(zone, series.low_prices[j], series.high_prices[j]);
        if penetration <= 0.0 || penetration < required {
            continue;
        }
        match params.reaction_window {
            None => return true,
            Some(window) => {
                let end = (j + window).min(n - 1);
                if ((j + 1)..=end).any(reacts) {
                    return true;
                }
            }
        }
    }
    false
}

/// Sort key used for the top-N cut: strength rank plus one for Fibonacci confluence.
#[inline]
pub(crate) fn sort_rank(zone: &EnhancedZone) -> u32 {
    zone.strength.rank() + u32::from(zone.confluence)
}

/// Best first: higher rank, then closer to price, then more recent formation.
pub(crate) fn compare_zones(a: &EnhancedZone, b: &EnhancedZone) -> Ordering {
    sort_rank(b)
        .cmp(&sort_rank(a))
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| b.formation_index.cmp(&a.formation_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TradingProfile, domain::Candle};

    fn enhanced(strength: Strength, confluence: bool, distance: f64, idx: usize) -> EnhancedZone {
        EnhancedZone {
            kind: ZoneKind::Demand,
            zone: Zone::new(99.0, 100.0),
            strength,
            age: ZoneAge::Fresh,
            distance,
            tested: false,
            formation_index: idx,
            confluence,
            body_ratio: 0.6,
        }
    }

    #[test]
    fn strength_components_add_up() {
        // 0.3% tall, inside price, 0.8 body: 2 + 2 + 2
        let tight = Zone::new(99.8, 100.1);
        assert_eq!(score_strength(&tight, 0.8, 100.0), Strength::Strong);
        // 0.8% tall (+1), 3% away (+1), 0.6 body (+1)
        let mid = Zone::new(96.2, 97.0);
        assert_eq!(score_strength(&mid, 0.6, 100.0), Strength::Weak);
        // 0.8% tall (+1), 1% away (+2), 0.6 body (+1)
        let near = Zone::new(98.2, 99.0);
        assert_eq!(score_strength(&near, 0.6, 100.0), Strength::Moderate);
    }

    #[test]
    fn age_bands() {
        assert_eq!(classify_age(0), ZoneAge::Fresh);
        assert_eq!(classify_age(10), ZoneAge::Fresh);
        assert_eq!(classify_age(11), ZoneAge::Recent);
        assert_eq!(classify_age(25), ZoneAge::Recent);
        assert_eq!(classify_age(26), ZoneAge::Old);
    }

    #[test]
    fn ranking_prefers_strength_then_confluence_then_distance() {
        let mut zones = vec![
            enhanced(Strength::Moderate, false, 1.0, 1),
            enhanced(Strength::Strong, false, 4.0, 2),
            enhanced(Strength::Moderate, true, 3.0, 3),
            enhanced(Strength::Moderate, false, 0.5, 4),
        ];
        zones.sort_by(compare_zones);
        let order: Vec<usize> = zones.iter().map(|z| z.formation_index).collect();
        // Strong (3) ties Moderate + confluence (3); the closer one wins
        assert_eq!(order, vec![3, 2, 4, 1]);
    }

    #[test]
    fn deep_touch_with_reaction_marks_tested() {
        let zone = Zone::new(99.0, 100.0);
        let mut candles: Vec<Candle> = (0..12)
            .map(|i| Candle::new(i, 104.0, 105.0, 103.0, 104.5))
            .collect();
        // Dips through half the zone at 6, bullish close above mid at 7
        candles[6] = Candle::new(6, 101.0, 101.5, 99.5, 100.8);
        candles[7] = Candle::new(7, 100.0, 102.0, 99.9, 101.5);
        let series = CandleSeries::new(&candles);

        let balanced = TradingProfile::Balanced.zone_params();
        assert!(is_tested(&series, ZoneKind::Demand, &zone, 2, balanced));
        // The touch sits before the scan offset when formation is at 4
        assert!(!is_tested(&series, ZoneKind::Demand, &zone, 4, balanced));
    }

    #[test]
    fn shallow_touch_only_counts_for_scalp() {
        let zone = Zone::new(99.0, 100.0);
        let mut candles: Vec<Candle> = (0..10)
            .map(|i| Candle::new(i, 104.0, 105.0, 103.0, 104.5))
            .collect();
        // 15% of the zone covered, no reacting candle afterwards
        candles[5] = Candle::new(5, 101.0, 101.5, 99.85, 101.2);
        let series = CandleSeries::new(&candles);

        assert!(is_tested(&series, ZoneKind::Demand, &zone, 1, TradingProfile::Scalp.zone_params()));
        assert!(!is_tested(&series, ZoneKind::Demand, &zone, 1, TradingProfile::Swing.zone_params()));
    }
}
