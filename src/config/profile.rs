//! Trading profile configuration (the only tunable input besides the candles)

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::Timeframe;

/// How aggressively the engine hunts for setups.
/// Scalp is the aggressive profile, Swing the conservative one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TradingProfile {
    Scalp,
    #[default]
    Balanced,
    Swing,
}

/// Explicit replacement for the settings store: everything profile-dependent flows from here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    pub profile: TradingProfile,
    /// Attach `DebugInfo` to the analysis result.
    #[serde(default)]
    pub debug_mode: bool,
}

impl ProfileConfig {
    pub fn new(profile: TradingProfile, debug_mode: bool) -> Self {
        Self {
            profile,
            debug_mode,
        }
    }

    #[inline]
    pub fn plan_params(&self) -> &'static PlanParams {
        self.profile.plan_params()
    }

    #[inline]
    pub fn zone_params(&self) -> &'static ZoneParams {
        self.profile.zone_params()
    }
}

/// Parameters for trade plan selection and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanParams {
    pub min_rr: f64,
    pub max_rr: f64,
    pub max_plans: usize,
    /// Rank purely by proximity instead of the composite score.
    pub prefer_close: bool,
    /// Maximum zone distance from price, in percent.
    pub max_distance_pct: f64,
    /// Score multiplier applied to tested zones (0.0 to 1.0).
    pub tested_weight: f64,
}

/// Parameters for zone detection and the tested-zone scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneParams {
    /// Minimum body / range ratio for an order-block candle.
    pub min_body_ratio: f64,
    /// Whether a reaction within the next two candles is mandatory.
    pub require_reaction: bool,
    /// Fraction of the range (from the extreme) that counts as discount / premium.
    pub discount_band: f64,
    /// Fraction of the zone height a later candle must overlap to test it.
    pub penetration: f64,
    /// Candles allowed for the reacting candle after a touch. `None` = no reaction needed.
    pub reaction_window: Option<usize>,
    /// Search window length per timeframe: 15m, 30m, 1h, 4h, 1d.
    pub search_windows: [usize; 5],
}

impl ZoneParams {
    pub fn search_window(&self, timeframe: Timeframe) -> usize {
        let slot = match timeframe {
            Timeframe::M15 => 0,
            Timeframe::M30 => 1,
            Timeframe::H1 => 2,
            Timeframe::H4 => 3,
            Timeframe::D1 => 4,
        };
        self.search_windows[slot]
    }
}

mod scalp {
    use super::*;
    pub const PLANS: PlanParams = PlanParams {
        min_rr: 1.0,
        max_rr: 3.0,
        max_plans: 2,
        prefer_close: true,
        max_distance_pct: 3.0,
        tested_weight: 0.7,
    };
    pub const ZONES: ZoneParams = ZoneParams {
        min_body_ratio: 0.4,
        require_reaction: false,
        discount_band: 0.618, // Expanded band: scalps take entries up to the 61.8% level
        penetration: 0.12,
        reaction_window: None,
        search_windows: [50, 60, 80, 100, 150],
    };
}

mod balanced {
    use super::*;
    pub const PLANS: PlanParams = PlanParams {
        min_rr: 1.5,
        max_rr: 5.0,
        max_plans: 3,
        prefer_close: false,
        max_distance_pct: 6.0,
        tested_weight: 0.5,
    };
    pub const ZONES: ZoneParams = ZoneParams {
        min_body_ratio: 0.5,
        require_reaction: true,
        discount_band: 0.5,
        penetration: 0.20,
        reaction_window: Some(3),
        search_windows: [100, 120, 150, 200, 300],
    };
}

mod swing {
    use super::*;
    pub const PLANS: PlanParams = PlanParams {
        min_rr: 2.0,
        max_rr: 10.0,
        max_plans: 3,
        prefer_close: false,
        max_distance_pct: 12.0,
        tested_weight: 0.15, // Below the tested floor: swing never trades a tested zone
    };
    pub const ZONES: ZoneParams = ZoneParams {
        min_body_ratio: 0.6,
        require_reaction: true,
        discount_band: 0.5,
        penetration: 0.25,
        reaction_window: Some(2),
        search_windows: [150, 200, 250, 400, 600],
    };
}

impl TradingProfile {
    pub fn plan_params(&self) -> &'static PlanParams {
        match self {
            Self::Scalp => &scalp::PLANS,
            Self::Balanced => &balanced::PLANS,
            Self::Swing => &swing::PLANS,
        }
    }

    pub fn zone_params(&self) -> &'static ZoneParams {
        match self {
            Self::Scalp => &scalp::ZONES,
            Self::Balanced => &balanced::ZONES,
            Self::Swing => &swing::ZONES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn profiles_parse_from_lowercase() {
        assert_eq!(TradingProfile::from_str("swing").unwrap(), TradingProfile::Swing);
        assert_eq!(TradingProfile::Scalp.to_string(), "scalp");
    }

    #[test]
    fn search_window_table_matches_corners() {
        assert_eq!(TradingProfile::Scalp.zone_params().search_window(Timeframe::M15), 50);
        assert_eq!(TradingProfile::Swing.zone_params().search_window(Timeframe::D1), 600);
    }

    #[test]
    fn conservative_profiles_demand_more() {
        let scalp = TradingProfile::Scalp.zone_params();
        let swing = TradingProfile::Swing.zone_params();
        assert!(scalp.min_body_ratio < swing.min_body_ratio);
        assert!(scalp.penetration < swing.penetration);
        assert!(!scalp.require_reaction && swing.require_reaction);

        for profile in [TradingProfile::Scalp, TradingProfile::Balanced, TradingProfile::Swing] {
            let p = profile.plan_params();
            assert!(p.min_rr > 0.0 && p.min_rr < p.max_rr);
            assert!(p.max_plans > 0);
        }
    }
}
