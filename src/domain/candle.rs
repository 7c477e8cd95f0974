use serde::{Deserialize, Serialize};

/// One OHLC bar. Ordered ascending by `timestamp_ms` when handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "t", alias = "timestamp", alias = "timestamp_ms")]
    pub timestamp_ms: i64,
    #[serde(rename = "o", alias = "open")]
    pub open_price: f64,
    #[serde(rename = "h", alias = "high")]
    pub high_price: f64,
    #[serde(rename = "l", alias = "low")]
    pub low_price: f64,
    #[serde(rename = "c", alias = "close")]
    pub close_price: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Candle {
            timestamp_ms,
            open_price: open,
            high_price: high,
            low_price: low,
            close_price: close,
        }
    }

    /// Strictly bullish: a doji is neither bullish nor bearish here.
    pub fn is_bullish(&self) -> bool {
        self.close_price > self.open_price
    }

    pub fn is_bearish(&self) -> bool {
        self.close_price < self.open_price
    }

    pub fn body_size(&self) -> f64 {
        (self.close_price - self.open_price).abs()
    }

    /// High minus low. Doubles as the volume proxy in the Wyckoff pass.
    pub fn range(&self) -> f64 {
        self.high_price - self.low_price
    }

    /// Body as a fraction of the full range. 0.0 for a zero-range candle.
    pub fn body_ratio(&self) -> f64 {
        let range = self.range();
        if range > f64::EPSILON {
            self.body_size() / range
        } else {
            0.0
        }
    }
}
