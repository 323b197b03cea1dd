use crate::geometry::Point2;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f64; 6]) -> [f64; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // follow OpenCV: check for determinant == 0
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns the 2x3 matrix that rotates and scales around `center` and then
/// moves `center` onto `offset`.
///
/// The matrix acts on (x, y) column vectors and is defined as:
///
/// | alpha -beta  tx |
/// | beta  alpha  ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = offset.x - alpha * center.x + beta * center.y
/// ty = offset.y - beta * center.x - alpha * center.y
///
/// # Arguments
///
/// * `center` - The center point of the rotation, in the source image.
/// * `angle` - The angle of rotation in radians.
/// * `scale` - The scale factor.
/// * `offset` - Where `center` lands in the destination image.
pub fn get_rotation_matrix2d(center: Point2, angle: f64, scale: f64, offset: Point2) -> [f64; 6] {
    let (sin, cos) = angle.sin_cos();
    let alpha = scale * cos;
    let beta = scale * sin;

    let tx = offset.x - alpha * center.x + beta * center.y;
    let ty = offset.y - beta * center.x - alpha * center.y;

    [alpha, -beta, tx, beta, alpha, ty]
}

/// Applies an affine transformation to a point given as (x, y).
#[inline]
pub fn transform_point(x: f64, y: f64, m: &[f64; 6]) -> (f64, f64) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}
