use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// Standard Fibonacci retracement ratios, shallowest first.
pub const FIB_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Absolute distance between `a` and `b` as a percentage of `b`.
#[inline]
pub fn percent_diff(a: f64, b: f64) -> f64 {
    if b.abs() <= f64::EPSILON {
        return 0.0;
    }
    ((a - b) / b).abs() * 100.0
}

/// True when `a` lies within `tolerance` (fractional, e.g. 0.01 = 1%) of `b`.
#[inline]
pub fn within_pct(a: f64, b: f64, tolerance: f64) -> bool {
    percent_diff(a, b) <= tolerance * 100.0
}

/// Mean of a slice, 0.0 when empty (statrs returns NaN).
pub fn mean_or_zero(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().mean()
}

/// Index of the unique maximum, if the maximum occurs exactly once.
pub fn unique_argmax(data: &[f64]) -> Option<usize> {
    if data.is_empty() {
        return None;
    }
    let idx: usize = data.argmax();
    let max = data[idx];
    let ties = data.iter().filter(|&&v| v == max).count();
    (ties == 1).then_some(idx)
}

/// Index of the unique minimum, if the minimum occurs exactly once.
pub fn unique_argmin(data: &[f64]) -> Option<usize> {
    if data.is_empty() {
        return None;
    }
    let idx: usize = data.argmin();
    let min = data[idx];
    let ties = data.iter().filter(|&&v| v == min).count();
    (ties == 1).then_some(idx)
}

/// Height of the overlap between two price bands, 0.0 when disjoint.
#[inline]
pub fn overlap(a_low: f64, a_high: f64, b_low: f64, b_high: f64) -> f64 {
    (a_high.min(b_high) - a_low.max(b_low)).max(0.0)
}

/// Linearly maps a value from one range to another while preserving its relative proportion.
pub fn remap(val: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let t = (val - in_min) / (in_max - in_min);
    out_min + t * (out_max - out_min)
}
