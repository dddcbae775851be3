//! Nibble distance between hex digests.

/// Sum of absolute differences between corresponding hex digits.
///
/// This is not the bitwise Hamming distance: `0` vs `f` counts 15, not 4.
/// Thresholds are calibrated against this metric.
///
/// Returns 0 when either side is empty or the lengths differ, so such a
/// pair can never trigger a cut. Non-hex characters count as 0.
pub fn nibble_distance(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0;
    }

    a.chars()
        .zip(b.chars())
        .map(|(x, y)| {
            let x = x.to_digit(16).unwrap_or(0);
            let y = y.to_digit(16).unwrap_or(0);
            x.abs_diff(y)
        })
        .sum()
}
