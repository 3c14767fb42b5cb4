//! Seek and progress math shared by the engine and the front ends.

/// Remaining seconds after seeking to `proportion` of a `total_secs` task.
///
/// The proportion is clamped into `[0, 1]` (NaN counts as 0) and the
/// elapsed part is floored, so the result is always in `[0, total_secs]`.
pub fn seek_remaining(total_secs: u64, proportion: f64) -> u64 {
    let proportion = if proportion.is_nan() {
        0.0
    } else {
        proportion.clamp(0.0, 1.0)
    };
    let elapsed = (total_secs as f64 * proportion).floor() as u64;
    total_secs.saturating_sub(elapsed.min(total_secs))
}

/// 0.0 .. 1.0 elapsed fraction of the current task.
pub fn progress_fraction(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    elapsed as f64 / total_secs as f64
}

/// Format seconds as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
