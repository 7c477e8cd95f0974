//! Heuristic constants. None of these are fitted; they are kept fixed for behavioural parity
//! and are the knobs to revisit when calibrating against recorded outcomes.

/// Minimum swings (highs + lows) before structure classification is attempted.
pub const MIN_SWING_POINTS: usize = 4;

pub mod structure {
    pub const PROB_BOS: f64 = 87.0;
    pub const PROB_BOS_SIDEWAYS: f64 = 60.0;
    pub const PROB_CHOCH: f64 = 74.0;
    pub const PROB_SIDEWAYS: f64 = 52.0;

    /// Probability tiers (inclusive lower bounds) feeding the strength score.
    pub const HIGH_PROB_TIER: f64 = 80.0;
    pub const MID_PROB_TIER: f64 = 70.0;

    pub const MANY_SWINGS: usize = 8;
    pub const SOME_SWINGS: usize = 6;

    pub const STRONG_SCORE: f64 = 5.0;
    pub const MODERATE_SCORE: f64 = 3.0;
}

pub mod zones {
    /// Zones kept per category after ranking.
    pub const MAX_PER_CATEGORY: usize = 3;

    pub const SMALL_ZONE_PCT: f64 = 0.5;
    pub const MEDIUM_ZONE_PCT: f64 = 1.0;
    pub const NEAR_DISTANCE_PCT: f64 = 2.0;
    pub const MID_DISTANCE_PCT: f64 = 5.0;
    pub const DOMINANT_BODY: f64 = 0.7;
    pub const SOLID_BODY: f64 = 0.5;

    pub const STRONG_SCORE: u32 = 6;
    pub const MODERATE_SCORE: u32 = 4;

    pub const FRESH_AGE: usize = 10;
    pub const RECENT_AGE: usize = 25;
    /// Zones older than this need a deeper overlap to count as tested.
    pub const STALE_AGE: usize = 50;
    pub const STALE_PENETRATION_MULT: f64 = 1.5;

    /// Candles after formation the reaction check looks at.
    pub const REACTION_LOOKAHEAD: usize = 2;
    /// Tested scan starts this many candles after formation (skips the reaction candles).
    pub const TEST_SCAN_OFFSET: usize = 3;

    /// A zone sits on a Fibonacci level if its midpoint is within this fraction.
    pub const FIB_CONFLUENCE_TOLERANCE: f64 = 0.01;
}

pub mod confluence {
    pub const FIB_TOLERANCE: f64 = 0.02;
    pub const HISTORY_WINDOW: usize = 200;
    pub const TOUCH_TOLERANCE: f64 = 0.01;
    pub const MIN_TOUCHES: usize = 2;
    pub const STRONG_TOUCHES: usize = 4;
    pub const MODERATE_TOUCHES: usize = 3;
    pub const DEDUP_TOLERANCE: f64 = 0.005;
    pub const ZONE_TOLERANCE: f64 = 0.015;
    pub const MAX_ENTRIES: usize = 5;
    /// Fibonacci entries with at least this many zones are strong.
    pub const STRONG_ZONE_COUNT: usize = 2;
}

pub mod wyckoff {
    pub const MIN_RANGE_CANDLES: usize = 20;
    pub const MIN_RANGE_PCT: f64 = 0.02;
    /// Candles skipped at both ends of the series when scanning for events.
    pub const EDGE_EXCLUSION: usize = 10;
    pub const VOLUME_WINDOW: usize = 20;
    pub const CLIMAX_VOLUME_MULT: f64 = 1.5;
    pub const CLIMAX_PROXIMITY: f64 = 0.02;

    pub const BASE_CONFIDENCE: f64 = 0.5;
    pub const MAX_VOLUME_BONUS: f64 = 0.3;
    pub const MAX_BODY_BONUS: f64 = 0.15;
    pub const DIRECTION_BONUS: f64 = 0.15;
    pub const MIN_EVENT_CONFIDENCE: f64 = 0.6;
    pub const DEDUP_WINDOW: usize = 5;

    pub const PHASE_BASE_CONFIDENCE: f64 = 0.4;
    pub const PHASE_EVENT_STEP: f64 = 0.1;
    pub const PHASE_EVENT_CAP: f64 = 0.3;
    pub const PHASE_MEAN_WEIGHT: f64 = 0.3;
    pub const REVERSAL_BONUS: f64 = 0.1;
    pub const LAST_POINT_BONUS: f64 = 0.05;

    pub const ENTRY_OFFSET: f64 = 0.002;
    pub const STOP_OFFSET: f64 = 0.005;
    pub const MARKUP_PROJECTION: f64 = 0.5;
    pub const MIN_PLAN_RR: f64 = 1.0;
}

pub mod plans {
    /// Tested zones are only admitted when the profile's tested weight exceeds this.
    pub const TESTED_FLOOR: f64 = 0.2;
    pub const DISTANCE_RELAX_MULT: f64 = 1.5;
    /// Sideways targets project this fraction of the major range from entry.
    pub const SIDEWAYS_PROJECTION: f64 = 0.6;
    pub const MAX_DISTANCE_BONUS: f64 = 20.0;
    /// Distance (%) at which the proximity bonus reaches zero.
    pub const DISTANCE_BONUS_HORIZON: f64 = 10.0;
}
