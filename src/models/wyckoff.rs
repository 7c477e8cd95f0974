use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::TradePlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum WyckoffEventType {
    /// Preliminary support.
    #[serde(rename = "PS")]
    #[strum(to_string = "PS")]
    Ps,
    /// Selling climax.
    #[serde(rename = "SC")]
    #[strum(to_string = "SC")]
    Sc,
    /// Secondary test.
    #[serde(rename = "ST")]
    #[strum(to_string = "ST")]
    St,
    /// Buying climax.
    #[serde(rename = "BC")]
    #[strum(to_string = "BC")]
    Bc,
    Spring,
    UpThrust,
    /// Last point of support.
    #[serde(rename = "LPS")]
    #[strum(to_string = "LPS")]
    Lps,
    /// Last point of supply.
    #[serde(rename = "LPSY")]
    #[strum(to_string = "LPSY")]
    Lpsy,
    /// Preliminary supply.
    #[serde(rename = "PSY")]
    #[strum(to_string = "PSY")]
    Psy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WyckoffEvent {
    #[serde(rename = "type")]
    pub event_type: WyckoffEventType,
    pub price: f64,
    pub index: usize,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
    Accumulation,
    Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Phase {
    A,
    B,
    C,
    D,
    E,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WyckoffPhase {
    pub schema_type: SchemaType,
    pub phase: Phase,
    pub events: Vec<WyckoffEvent>,
    pub confidence: f64,
    pub trading_opportunity: bool,
    pub range_high: f64,
    pub range_low: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum WyckoffStatus {
    /// The range is too short or too narrow to read yet.
    #[strum(to_string = "developing")]
    Developing,
    /// A valid range with no qualifying schema.
    #[strum(to_string = "no schema")]
    NoSchema,
    #[strum(to_string = "confirmed")]
    Confirmed,
}

/// Outcome of the Wyckoff pass. Present only for sideways structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WyckoffAnalysis {
    pub is_wyckoff_pattern: bool,
    pub status: WyckoffStatus,
    pub phase: Option<WyckoffPhase>,
    pub plans: Vec<TradePlan>,
}

impl WyckoffAnalysis {
    pub fn without_pattern(status: WyckoffStatus) -> Self {
        Self {
            is_wyckoff_pattern: false,
            status,
            phase: None,
            plans: Vec::new(),
        }
    }

    pub fn is_tradeable(&self) -> bool {
        self.phase
            .as_ref()
            .map(|p| p.trading_opportunity)
            .unwrap_or(false)
    }
}
