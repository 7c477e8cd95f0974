mod confluence;
mod error;
mod series;
mod smc_analysis;
mod structure;
mod trade_plan;
mod wyckoff;
mod zone;

pub use {
    confluence::{Confluence, ConfluenceSource, ZoneRef},
    error::{AnalysisError, ErrorReport},
    series::CandleSeries,
    smc_analysis::{DebugInfo, SmcAnalysis},
    structure::{
        Bias, MajorSwing, MarketStructure, Strength, StructureEvent, SwingKind, SwingPoint,
    },
    trade_plan::{TradeDirection, TradePlan, risk_reward},
    wyckoff::{
        Phase, SchemaType, WyckoffAnalysis, WyckoffEvent, WyckoffEventType, WyckoffPhase,
        WyckoffStatus,
    },
    zone::{EnhancedZone, Zone, ZoneAge, ZoneKind},
};
