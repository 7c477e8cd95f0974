use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

/// A local extreme: the unique highest high (or lowest low) of its lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub kind: SwingKind,
    pub price: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum StructureEvent {
    /// Break of Structure: trend continuation.
    #[serde(rename = "BOS")]
    #[strum(to_string = "BOS")]
    Bos,
    /// Change of Character: first break against the prevailing trend.
    #[serde(rename = "CHoCH")]
    #[strum(to_string = "CHoCH")]
    Choch,
}

/// Qualitative grade shared by structure, zones, confluences and plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Strong = 3, Moderate = 2, Weak = 1.
    pub fn rank(&self) -> u32 {
        match self {
            Self::Strong => 3,
            Self::Moderate => 2,
            Self::Weak => 1,
        }
    }
}

/// Price and candle index of a structural extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MajorSwing {
    pub price: f64,
    pub index: usize,
}

impl From<&SwingPoint> for MajorSwing {
    fn from(sp: &SwingPoint) -> Self {
        Self {
            price: sp.price,
            index: sp.index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStructure {
    pub bias: Bias,
    pub last_event: Option<StructureEvent>,
    pub break_level: Option<f64>,
    pub major_high: Option<MajorSwing>,
    pub major_low: Option<MajorSwing>,
    /// 0 to 100.
    pub probability: f64,
    pub strength: Strength,
    pub swing_count: usize,
}

impl MarketStructure {
    /// The major range as `(low, high)`, when both extremes exist and are ordered.
    pub fn major_range(&self) -> Option<(MajorSwing, MajorSwing)> {
        match (self.major_low, self.major_high) {
            (Some(low), Some(high)) if high.price > low.price => Some((low, high)),
            _ => None,
        }
    }

    /// Price at `ratio` retracement of the major range. Bearish structure measures up
    /// from the low; everything else measures down from the high.
    pub fn retracement(&self, ratio: f64) -> Option<f64> {
        let (low, high) = self.major_range()?;
        let size = high.price - low.price;
        Some(match self.bias {
            Bias::Bearish => low.price + ratio * size,
            Bias::Bullish | Bias::Sideways => high.price - ratio * size,
        })
    }

    pub fn equilibrium(&self) -> Option<f64> {
        self.retracement(0.5)
    }
}
