// Pipeline stages, leaves first
mod confluence;
mod market_structure;
mod smc_analysis;
mod swing_points;
mod trade_plans;
mod wyckoff;
pub(crate) mod zone_scoring;
mod zones;

pub use confluence::detect_confluences;
pub use market_structure::classify_structure;
pub use smc_analysis::{analyze, analyze_timeframes};
pub use swing_points::{detect_swing_points, find_swing_points};
pub use trade_plans::generate_trade_plans;
pub use wyckoff::analyze_wyckoff;
pub use zones::{DetectedZones, detect_zones};
