#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate
pub use analysis::{analyze, analyze_timeframes};
pub use config::{ProfileConfig, TradingProfile};
pub use domain::{Candle, Timeframe};
pub use models::{AnalysisError, ErrorReport, SmcAnalysis};

use std::path::PathBuf;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Smart-money-concepts analysis of an OHLC candle file", long_about = None)]
pub struct Cli {
    /// Candle file: JSON array of {t,o,h,l,c} or CSV with a timestamp,open,high,low,close header
    pub input: PathBuf,

    /// Candle resolution: 15m, 30m, 1h, 4h or 1d
    #[arg(short, long, default_value = "1h")]
    pub timeframe: Timeframe,

    /// Trading profile: scalp, balanced or swing
    #[arg(short, long, default_value = "balanced")]
    pub profile: TradingProfile,

    /// Attach zone search diagnostics to the output
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Print JSON instead of the text report
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Analyze the candles under every timeframe's lookback
    #[arg(long, default_value_t = false)]
    pub all_timeframes: bool,
}

impl Cli {
    pub fn profile_config(&self) -> ProfileConfig {
        ProfileConfig::new(self.profile, self.debug)
    }
}
