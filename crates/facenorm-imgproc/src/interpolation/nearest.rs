use super::interpolate::Taps;

/// Taps for nearest neighbor interpolation at column `u` and row `v`.
pub(crate) fn nearest_taps(u: f64, v: f64) -> Taps {
    let mut taps = Taps::default();
    taps.push(v.round() as isize, u.round() as isize, 1.0);
    taps
}
