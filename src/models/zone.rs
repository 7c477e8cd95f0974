use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::models::Strength;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[strum(to_string = "Demand")]
    Demand,
    #[strum(to_string = "Supply")]
    Supply,
    #[strum(to_string = "Bullish FVG")]
    BullishFvg,
    #[strum(to_string = "Bearish FVG")]
    BearishFvg,
}

impl ZoneKind {
    /// Demand-side zones expect price to bounce up from them.
    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::Demand | Self::BullishFvg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ZoneAge {
    Fresh,
    Recent,
    Old,
}

impl ZoneAge {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Fresh => 20.0,
            Self::Recent => 15.0,
            Self::Old => 5.0,
        }
    }
}

/// A bare price band. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub low: f64,
    pub high: f64,
}

impl Zone {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    /// Distance from `price` to the nearest edge as a percentage of price. 0.0 inside.
    pub fn distance_pct(&self, price: f64) -> f64 {
        if price <= f64::EPSILON || self.contains(price) {
            return 0.0;
        }
        let edge = if price > self.high { self.high } else { self.low };
        (price - edge).abs() / price * 100.0
    }
}

/// A scored zone as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedZone {
    pub kind: ZoneKind,
    #[serde(flatten)]
    pub zone: Zone,
    pub strength: Strength,
    pub age: ZoneAge,
    /// Percent from current price to the nearest edge.
    pub distance: f64,
    pub tested: bool,
    pub formation_index: usize,
    /// Midpoint sits on a Fibonacci level of the major range.
    #[serde(default)]
    pub confluence: bool,
    /// Body / range of the candle that formed the zone. Feeds scoring only.
    #[serde(skip)]
    pub body_ratio: f64,
}

impl EnhancedZone {
    #[inline]
    pub fn low(&self) -> f64 {
        self.zone.low
    }

    #[inline]
    pub fn high(&self) -> f64 {
        self.zone.high
    }

    #[inline]
    pub fn mid(&self) -> f64 {
        self.zone.mid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_orders_bounds() {
        let z = Zone::new(10.0, 8.0);
        assert_eq!((z.low, z.high), (8.0, 10.0));
        assert_eq!(z.mid(), 9.0);
    }

    #[test]
    fn distance_is_to_nearest_edge() {
        let z = Zone::new(90.0, 95.0);
        assert!((z.distance_pct(100.0) - 5.0).abs() < 1e-9);
        assert_eq!(z.distance_pct(92.0), 0.0);
        let above = Zone::new(110.0, 120.0);
        assert!((above.distance_pct(100.0) - 10.0).abs() < 1e-9);
    }
}
