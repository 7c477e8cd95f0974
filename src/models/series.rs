use crate::{config::constants::wyckoff::VOLUME_WINDOW, domain::Candle, models::AnalysisError};

/// Column view over a borrowed candle slice. Built once per analysis call so every stage
/// can run slice maths (argmax, means) without re-walking the candles.
#[derive(Debug, Clone)]
pub struct CandleSeries<'a> {
    candles: &'a [Candle],
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    /// Candle range divided by the mean range of the preceding `VOLUME_WINDOW` candles.
    /// Stands in for relative volume: the input carries no volume column.
    pub relative_ranges: Vec<f64>,
}

impl<'a> CandleSeries<'a> {
    pub fn new(candles: &'a [Candle]) -> Self {
        let len = candles.len();
        let mut high_vec = Vec::with_capacity(len);
        let mut low_vec = Vec::with_capacity(len);
        let mut rel_vec = Vec::with_capacity(len);

        let mut rolling_sum = 0.0;
        for (i, c) in candles.iter().enumerate() {
            high_vec.push(c.high_price);
            low_vec.push(c.low_price);

            // Window holds the candles strictly before i
            let count = i.min(VOLUME_WINDOW);
            let ratio = if count == 0 {
                1.0
            } else {
                let avg = rolling_sum / count as f64;
                if avg > f64::EPSILON { c.range() / avg } else { 1.0 }
            };
            rel_vec.push(ratio);

            rolling_sum += c.range();
            if i >= VOLUME_WINDOW {
                rolling_sum -= candles[i - VOLUME_WINDOW].range();
            }
        }

        Self {
            candles,
            high_prices: high_vec,
            low_prices: low_vec,
            relative_ranges: rel_vec,
        }
    }

    /// Rejects data the pipeline cannot reason about. Ordering is checked, not repaired.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (i, c) in self.candles.iter().enumerate() {
            let prices = [c.open_price, c.high_price, c.low_price, c.close_price];
            if prices.iter().any(|p| !p.is_finite()) {
                return Err(AnalysisError::InvalidCandles {
                    reason: format!("non-finite price at index {}", i),
                });
            }
            if c.high_price < c.low_price {
                return Err(AnalysisError::InvalidCandles {
                    reason: format!("high below low at index {}", i),
                });
            }
            if i > 0 && c.timestamp_ms < self.candles[i - 1].timestamp_ms {
                return Err(AnalysisError::InvalidCandles {
                    reason: format!("timestamps out of order at index {}", i),
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn candles(&self) -> &'a [Candle] {
        self.candles
    }

    #[inline]
    pub fn get_candle(&self, idx: usize) -> &'a Candle {
        &self.candles[idx]
    }

    #[inline]
    pub fn klines(&self) -> usize {
        self.candles.len()
    }

    /// Close of the final candle, 0.0 for an empty series.
    pub fn current_price(&self) -> f64 {
        self.candles.last().map(|c| c.close_price).unwrap_or(0.0)
    }

    /// Number of candles between `idx` and the last candle.
    #[inline]
    pub fn candles_since(&self, idx: usize) -> usize {
        self.klines().saturating_sub(1).saturating_sub(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize, range: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64, 100.0, 100.0 + range, 100.0, 100.0))
            .collect()
    }

    #[test]
    fn relative_range_flags_expansion() {
        let mut candles = flat(50, 1.0);
        candles[25].high_price = 103.0;
        let series = CandleSeries::new(&candles);
        assert_eq!(series.relative_ranges[0], 1.0);
        assert!((series.relative_ranges[24] - 1.0).abs() < 1e-12);
        assert!((series.relative_ranges[25] - 3.0).abs() < 1e-12);
        // The spike is now inside the trailing window of its successor
        assert!(series.relative_ranges[26] < 1.0);
        // ...and leaves it after exactly VOLUME_WINDOW candles
        assert!(series.relative_ranges[25 + VOLUME_WINDOW] < 1.0);
        assert!((series.relative_ranges[26 + VOLUME_WINDOW] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validation_catches_bad_rows() {
        let mut candles = flat(5, 1.0);
        assert!(CandleSeries::new(&candles).validate().is_ok());

        candles[2].low_price = 200.0;
        assert!(matches!(
            CandleSeries::new(&candles).validate(),
            Err(AnalysisError::InvalidCandles { .. })
        ));

        let mut candles = flat(5, 1.0);
        candles[3].timestamp_ms = -1;
        assert!(CandleSeries::new(&candles).validate().is_err());

        let mut candles = flat(5, 1.0);
        candles[1].close_price = f64::NAN;
        assert!(CandleSeries::new(&candles).validate().is_err());
    }

    #[test]
    fn candles_since_counts_to_last() {
        let candles = flat(10, 1.0);
        let series = CandleSeries::new(&candles);
        assert_eq!(series.candles_since(9), 0);
        assert_eq!(series.candles_since(0), 9);
        assert_eq!(series.current_price(), 100.0);
    }
}
