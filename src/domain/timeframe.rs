use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::utils::TimeUtils;

/// Candle resolutions the engine knows how to analyze.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, Default,
)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    #[strum(serialize = "15m")]
    M15,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    M30,
    #[default]
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    H1,
    #[serde(rename = "4h")]
    #[strum(serialize = "4h", serialize = "4H")]
    H4,
    #[serde(rename = "1d")]
    #[strum(serialize = "1d", serialize = "1D")]
    D1,
}

impl Timeframe {
    /// Half-width of the swing detection window, in candles.
    pub fn swing_lookback(&self) -> usize {
        match self {
            Self::M15 => 3,
            Self::M30 => 4,
            Self::H1 => 5,
            Self::H4 => 6,
            Self::D1 => 8,
        }
    }

    /// Fewest candles that can produce a meaningful analysis at this resolution.
    pub fn min_candles(&self) -> usize {
        2 * self.swing_lookback() + 10
    }

    pub fn interval_ms(&self) -> i64 {
        match self {
            Self::M15 => TimeUtils::MS_IN_15_MIN,
            Self::M30 => TimeUtils::MS_IN_30_MIN,
            Self::H1 => TimeUtils::MS_IN_H,
            Self::H4 => TimeUtils::MS_IN_4_H,
            Self::D1 => TimeUtils::MS_IN_D,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", TimeUtils::interval_to_string(self.interval_ms()))
    }
}
