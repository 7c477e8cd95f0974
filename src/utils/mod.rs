pub mod maths_utils;
mod perf;
pub mod time_utils;

pub use time_utils::{AppInstant, TimeUtils, epoch_ms_to_utc, format_duration};

pub(crate) use maths_utils::{
    FIB_RATIOS, mean_or_zero, overlap, remap, unique_argmax, unique_argmin, within_pct,
};
