//! Configuration module for the SMC analysis engine.

mod debug;
mod profile;

// Public
pub mod constants;

// Re-export commonly used items
pub use debug::{DF, LOG_PERFORMANCE, LogFlags};
pub use profile::{PlanParams, ProfileConfig, TradingProfile, ZoneParams};
