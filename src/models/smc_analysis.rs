use serde::{Deserialize, Serialize};

use crate::{
    config::TradingProfile,
    domain::Timeframe,
    models::{Confluence, EnhancedZone, MarketStructure, TradePlan, WyckoffAnalysis},
};

/// Zone bookkeeping, attached only when the profile config asks for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub total_zones_found: usize,
    pub zones_discarded: usize,
    /// Number of candles the zone search scanned.
    pub search_range: usize,
    pub tested_zones: usize,
    pub untested_zones: usize,
    pub avg_zone_distance: f64,
}

/// Complete output of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmcAnalysis {
    pub structure: MarketStructure,
    pub timeframe: Timeframe,
    pub profile: TradingProfile,
    pub current_price: f64,
    pub demand_zones: Vec<EnhancedZone>,
    pub supply_zones: Vec<EnhancedZone>,
    pub bullish_fvgs: Vec<EnhancedZone>,
    pub bearish_fvgs: Vec<EnhancedZone>,
    pub confluences: Vec<Confluence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wyckoff: Option<WyckoffAnalysis>,
    pub buy_plans: Vec<TradePlan>,
    pub sell_plans: Vec<TradePlan>,
}

impl SmcAnalysis {
    pub fn all_zones(&self) -> impl Iterator<Item = &EnhancedZone> {
        self.demand_zones
            .iter()
            .chain(&self.supply_zones)
            .chain(&self.bullish_fvgs)
            .chain(&self.bearish_fvgs)
    }

    pub fn all_plans(&self) -> impl Iterator<Item = &TradePlan> {
        self.buy_plans.iter().chain(&self.sell_plans)
    }
}
