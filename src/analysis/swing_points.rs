use crate::{
    config::constants::MIN_SWING_POINTS,
    domain::Timeframe,
    models::{AnalysisError, CandleSeries, SwingKind, SwingPoint},
    utils::{unique_argmax, unique_argmin},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Finds every candle that is the unique highest high or unique lowest low of the symmetric
/// window `[i - lookback, i + lookback]`. A candle may be both. Output is ordered by index.
pub fn detect_swing_points(series: &CandleSeries, lookback: usize) -> Vec<SwingPoint> {
    let n = series.klines();
    let mut swings = Vec::new();
    if lookback == 0 || n < 2 * lookback + 1 {
        return swings;
    }

    for i in lookback..(n - lookback) {
        let window = (i - lookback)..=(i + lookback);

        if unique_argmax(&series.high_prices[window.clone()]) == Some(lookback) {
            swings.push(SwingPoint {
                kind: SwingKind::High,
                price: series.high_prices[i],
                index: i,
            });
        }
        if unique_argmin(&series.low_prices[window]) == Some(lookback) {
            swings.push(SwingPoint {
                kind: SwingKind::Low,
                price: series.low_prices[i],
                index: i,
            });
        }
    }

    swings
}

/// Swing detection with the input guards: enough candles for the timeframe's lookback,
/// and enough swings to classify afterwards.
pub fn find_swing_points(
    series: &CandleSeries,
    timeframe: Timeframe,
) -> Result<Vec<SwingPoint>, AnalysisError> {
    let required = timeframe.min_candles();
    if series.klines() < required {
        return Err(AnalysisError::InsufficientData {
            candles: series.klines(),
            required,
        });
    }

    let swings = detect_swing_points(series, timeframe.swing_lookback());

    #[cfg(debug_assertions)]
    if DF.log_swings {
        log::info!(
            "find_swing_points(): {} swings over {} candles (lookback {})",
            swings.len(),
            series.klines(),
            timeframe.swing_lookback()
        );
    }

    if swings.len() < MIN_SWING_POINTS {
        return Err(AnalysisError::InsufficientSwings {
            found: swings.len(),
            required: MIN_SWING_POINTS,
        });
    }

    Ok(swings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;

    fn from_highs_lows(points: &[(f64, f64)]) -> Vec<Candle> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(h, l))| Candle::new(i as i64, (h + l) / 2.0, h, l, (h + l) / 2.0))
            .collect()
    }

    #[test]
    fn finds_isolated_peak_and_trough() {
        let candles = from_highs_lows(&[
            (10.0, 9.0),
            (11.0, 10.0),
            (14.0, 12.0),
            (11.0, 10.0),
            (10.0, 8.0),
            (9.0, 6.0),
            (10.0, 8.0),
            (11.0, 9.0),
        ]);
        let series = CandleSeries::new(&candles);
        let swings = detect_swing_points(&series, 2);
        assert_eq!(
            swings,
            vec![
                SwingPoint { kind: SwingKind::High, price: 14.0, index: 2 },
                SwingPoint { kind: SwingKind::Low, price: 6.0, index: 5 },
            ]
        );
    }

    #[test]
    fn equal_highs_are_not_swings() {
        let candles = from_highs_lows(&[
            (10.0, 9.0),
            (12.0, 9.5),
            (12.0, 9.6),
            (10.0, 9.7),
            (10.0, 9.8),
        ]);
        let series = CandleSeries::new(&candles);
        assert!(detect_swing_points(&series, 1)
            .iter()
            .all(|s| s.kind != SwingKind::High));
    }

    #[test]
    fn swing_high_dominates_its_window() {
        let candles: Vec<Candle> = (0..80)
            .map(|i| {
                let x = i as f64;
                let mid = 100.0 + (x * 0.7).sin() * 5.0 + (x * 0.13).cos() * 3.0;
                Candle::new(i, mid, mid + 1.0, mid - 1.0, mid)
            })
            .collect();
        let series = CandleSeries::new(&candles);
        let lookback = 4;
        for sp in detect_swing_points(&series, lookback) {
            let window = &candles[sp.index - lookback..=sp.index + lookback];
            match sp.kind {
                SwingKind::High => assert!(window.iter().all(|c| c.high_price <= sp.price)),
                SwingKind::Low => assert!(window.iter().all(|c| c.low_price >= sp.price)),
            }
        }
    }

    #[test]
    fn flat_series_reports_insufficient_swings() {
        let candles: Vec<Candle> = (0..40).map(|i| Candle::new(i, 5.0, 5.0, 5.0, 5.0)).collect();
        let series = CandleSeries::new(&candles);
        assert_eq!(
            find_swing_points(&series, Timeframe::H1),
            Err(AnalysisError::InsufficientSwings { found: 0, required: 4 })
        );
    }

    #[test]
    fn short_series_reports_insufficient_data() {
        let candles: Vec<Candle> = (0..19).map(|i| Candle::new(i, 5.0, 6.0, 4.0, 5.0)).collect();
        let series = CandleSeries::new(&candles);
        assert_eq!(
            find_swing_points(&series, Timeframe::H1),
            Err(AnalysisError::InsufficientData { candles: 19, required: 20 })
        );
    }
}
