use facenorm_image::{Image, ImageError, ImageSize};

/// Computes the summed-area table of an image.
///
/// The result has one extra row and column of zeros at the top and left, so
/// that `ii[y][x]` is the sum of all the pixels strictly above and left of
/// `(y, x)`.
///
/// # Example
///
/// ```
/// use facenorm_image::{Image, ImageSize};
/// use facenorm_imgproc::integral::{integral_image, window_sum};
///
/// let src = Image::new(ImageSize { width: 2, height: 2 }, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let ii = integral_image(&src).unwrap();
///
/// assert_eq!(window_sum(&ii, (0, 0), (2, 2)), 10.0);
/// assert_eq!(window_sum(&ii, (1, 0), (1, 2)), 7.0);
/// ```
pub fn integral_image(src: &Image<f64>) -> Result<Image<f64>, ImageError> {
    let cols = src.cols() + 1;
    let size = ImageSize {
        width: cols,
        height: src.rows() + 1,
    };
    let mut ii = Image::from_size_val(size, 0.0)?;
    let data = ii.as_slice_mut();

    for (y, src_row) in src.as_slice().chunks_exact(src.cols()).enumerate() {
        let mut row_sum = 0.0;
        for (x, &v) in src_row.iter().enumerate() {
            row_sum += v;
            data[(y + 1) * cols + x + 1] = data[y * cols + x + 1] + row_sum;
        }
    }

    Ok(ii)
}

/// Sum of the `size = (height, width)` window whose top-left corner is at `top_left = (y, x)`.
///
/// PRECONDITION: the window lies inside the image the table was computed from.
#[inline]
pub fn window_sum(ii: &Image<f64>, top_left: (usize, usize), size: (usize, usize)) -> f64 {
    let cols = ii.cols();
    let data = ii.as_slice();
    let (y0, x0) = top_left;
    let (y1, x1) = (y0 + size.0, x0 + size.1);

    data[y1 * cols + x1] - data[y0 * cols + x1] - data[y1 * cols + x0] + data[y0 * cols + x0]
}
