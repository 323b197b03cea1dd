use super::interpolate::Taps;

/// Taps for bilinear interpolation at column `u` and row `v`.
///
/// Neighbours with a zero weight are skipped, so sampling exactly on the
/// last row or column never touches a pixel outside the image.
pub(crate) fn bilinear_taps(u: f64, v: f64) -> Taps {
    let iu = u.floor();
    let iv = v.floor();

    let frac_u = u - iu;
    let frac_v = v - iv;

    let (iu, iv) = (iu as isize, iv as isize);

    let mut taps = Taps::default();
    for (dy, wy) in [(0, 1.0 - frac_v), (1, frac_v)] {
        if wy == 0.0 {
            continue;
        }
        for (dx, wx) in [(0, 1.0 - frac_u), (1, frac_u)] {
            if wx == 0.0 {
                continue;
            }
            taps.push(iv + dy, iu + dx, wy * wx);
        }
    }

    taps
}
