use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Strength, ZoneAge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "BUY"),
            TradeDirection::Sell => write!(f, "SELL"),
        }
    }
}

/// |target - entry| / |entry - stop|. `None` when the risk leg is degenerate.
pub fn risk_reward(entry: f64, stop: f64, target: f64) -> Option<f64> {
    let risk = (entry - stop).abs();
    if risk <= f64::EPSILON {
        return None;
    }
    let rr = (target - entry).abs() / risk;
    (rr > 0.0 && rr.is_finite()).then_some(rr)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub direction: TradeDirection,
    pub title: String,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    pub risk_reward: f64,
    pub strength: Strength,
    pub age: ZoneAge,
    pub explanation: String,
}

impl TradePlan {
    /// Price levels must be ordered for the direction: stop < entry < target for a buy,
    /// the mirror for a sell. Returns `None` otherwise, so no invalid plan is ever built.
    pub fn levels_are_valid(direction: TradeDirection, entry: f64, stop: f64, target: f64) -> bool {
        match direction {
            TradeDirection::Buy => stop < entry && entry < target,
            TradeDirection::Sell => target < entry && entry < stop,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        direction: TradeDirection,
        title: String,
        entry: f64,
        stop: f64,
        target: f64,
        strength: Strength,
        age: ZoneAge,
        explanation: String,
    ) -> Option<Self> {
        if !Self::levels_are_valid(direction, entry, stop, target) {
            return None;
        }
        let rr = risk_reward(entry, stop, target)?;
        Some(Self {
            direction,
            title,
            entry,
            stop,
            target,
            risk_reward: rr,
            strength,
            age,
            explanation,
        })
    }

    pub fn risk_pct(&self) -> f64 {
        (self.entry - self.stop).abs() / self.entry * 100.0
    }
}

impl fmt::Display for TradePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:.4} (SL {:.4}, TP {:.4}, R:R {:.2})",
            self.direction, self.title, self.entry, self.stop, self.target, self.risk_reward
        )
    }
}
