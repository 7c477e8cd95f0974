//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Swing points found per call.
    pub log_swings: bool,

    /// Structure decision path (which rule matched).
    pub log_structure: bool,

    /// Zone candidates, scores and the top-3 cut.
    pub log_zones: bool,

    pub log_confluence: bool,

    /// Wyckoff events, schema and phase decisions.
    pub log_wyckoff: bool,

    pub log_plans: bool,
}

pub const DF: LogFlags = LogFlags {
    log_swings: false,
    log_structure: true,
    log_zones: false,
    log_confluence: false,
    log_wyckoff: true,
    log_plans: false,
};

/// Activate trace_time macro (for cool scope-level timing)
pub const LOG_PERFORMANCE: bool = false;
