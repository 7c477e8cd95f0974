use serde::{Deserialize, Serialize};

use crate::models::{Strength, ZoneKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfluenceSource {
    Fibonacci { ratio: f64 },
    Support { touches: usize },
    Resistance { touches: usize },
}

impl std::fmt::Display for ConfluenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fibonacci { ratio } => write!(f, "Fib {:.1}%", ratio * 100.0),
            Self::Support { touches } => write!(f, "Support ({} touches)", touches),
            Self::Resistance { touches } => write!(f, "Resistance ({} touches)", touches),
        }
    }
}

/// Reference to a detected zone that coincides with a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRef {
    pub kind: ZoneKind,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confluence {
    pub source: ConfluenceSource,
    pub level: f64,
    pub strength: Strength,
    pub zones: Vec<ZoneRef>,
}
