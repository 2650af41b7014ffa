//! Score truncation for display.

/// Decimals used for badge scores unless configured otherwise
pub const DEFAULT_DECIMALS: u32 = 0;

/// Truncate `score` to `decimals` places, rounding toward negative infinity.
///
/// `0.99` with zero decimals gives `0`, never `1`. `None` stays `None` and
/// NaN comes back as NaN.
pub fn normalize(score: Option<f64>, decimals: u32) -> Option<f64> {
    let score = score?;
    let factor = 10f64.powi(decimals as i32);
    Some((score * factor).floor() / factor)
}
