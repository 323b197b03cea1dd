use facenorm_image::{Image, ImageError, ImageSize};

/// Policy used to synthesize pixel values outside of the image bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderType {
    /// Reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...c b a | a b c d...
    #[default]
    Mirror,

    /// Fills the border with zeros.
    ///
    /// Example: ...0 0 0 | a b c d...
    Zero,

    /// Repeats the outermost row or column of pixels.
    ///
    /// Example: ...a a a | a b c d...
    NearestNeighbour,

    /// Wraps the content from the opposite side.
    ///
    /// Example: ...x y z | a b c d...
    Circular,
}

impl BorderType {
    #[inline]
    fn mirror(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        // the mirrored sequence repeats every 2 * len samples
        let period = 2 * len;
        let i = i.rem_euclid(period);
        if i < len {
            i as usize
        } else {
            (period - i - 1) as usize
        }
    }

    #[inline]
    fn circular(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the border type.
    ///
    /// Returns `None` when the sample has no source pixel, which only happens
    /// for [`BorderType::Zero`] with an out of range index.
    ///
    /// PRECONDITION: `len > 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use facenorm_imgproc::padding::BorderType;
    ///
    /// assert_eq!(BorderType::Mirror.map_index(-1, 4), Some(0));
    /// assert_eq!(BorderType::Mirror.map_index(5, 4), Some(2));
    /// assert_eq!(BorderType::Circular.map_index(-1, 4), Some(3));
    /// assert_eq!(BorderType::NearestNeighbour.map_index(9, 4), Some(3));
    /// assert_eq!(BorderType::Zero.map_index(-1, 4), None);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderType::Mirror => Some(Self::mirror(i, len)),
            BorderType::Zero => None,
            BorderType::NearestNeighbour => Some(i.clamp(0, len as isize - 1) as usize),
            BorderType::Circular => Some(Self::circular(i, len)),
        }
    }

    /// Sample `src` at a possibly out of range position.
    #[inline]
    pub fn sample<T: Copy + Default>(&self, src: &Image<T>, y: isize, x: isize) -> T {
        match (self.map_index(y, src.rows()), self.map_index(x, src.cols())) {
            (Some(y), Some(x)) => src.as_slice()[y * src.cols() + x],
            _ => T::default(),
        }
    }
}

/// Builds the image extended by `pad_y` rows above and below and `pad_x`
/// columns left and right, filling the border according to `border`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `pad` - The padding as (pad_y, pad_x).
/// * `border` - The border extrapolation policy.
///
/// # Example
///
/// ```
/// use facenorm_image::{Image, ImageSize};
/// use facenorm_imgproc::padding::{extrapolate, BorderType};
///
/// let src = Image::new(ImageSize { width: 2, height: 1 }, vec![1.0, 2.0]).unwrap();
/// let dst = extrapolate(&src, (0, 2), BorderType::Mirror).unwrap();
///
/// assert_eq!(dst.as_slice(), &[2.0, 1.0, 1.0, 2.0, 2.0, 1.0]);
/// ```
pub fn extrapolate<T: Copy + Default>(
    src: &Image<T>,
    pad: (usize, usize),
    border: BorderType,
) -> Result<Image<T>, ImageError> {
    let size = ImageSize {
        width: src.width() + 2 * pad.1,
        height: src.height() + 2 * pad.0,
    };
    let mut dst = Image::from_size_val(size, T::default())?;
    extrapolate_into(src, &mut dst, pad, border)?;
    Ok(dst)
}

/// Same as [`extrapolate`] but writes into a pre-allocated image.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the padded size of `src`.
pub fn extrapolate_into<T: Copy + Default>(
    src: &Image<T>,
    dst: &mut Image<T>,
    pad: (usize, usize),
    border: BorderType,
) -> Result<(), ImageError> {
    let (pad_y, pad_x) = pad;
    let (expected_w, expected_h) = (src.width() + 2 * pad_x, src.height() + 2 * pad_y);
    if dst.width() != expected_w || dst.height() != expected_h {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected_w,
            expected_h,
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let new_cols = dst.cols();
    let data = src.as_slice();

    for (y, dst_row) in dst.as_slice_mut().chunks_exact_mut(new_cols).enumerate() {
        let Some(sy) = border.map_index(y as isize - pad_y as isize, rows) else {
            dst_row.fill(T::default());
            continue;
        };
        let src_row = &data[sy * cols..(sy + 1) * cols];

        // center part is a plain copy
        dst_row[pad_x..pad_x + cols].copy_from_slice(src_row);

        for x in (0..pad_x).chain(pad_x + cols..new_cols) {
            dst_row[x] = match border.map_index(x as isize - pad_x as isize, cols) {
                Some(sx) => src_row[sx],
                None => T::default(),
            };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facenorm_image::{Image, ImageError, ImageSize};

    // 2x2 source: 1 2 / 3 4
    fn make_src_2x2() -> Result<Image<u8>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 2, 3, 4],
        )
    }

    #[test]
    fn test_extrapolate_zero() -> Result<(), ImageError> {
        let dst = extrapolate(&make_src_2x2()?, (1, 1), BorderType::Zero)?;

        #[rustfmt::skip]
        let expected = [
            0, 0, 0, 0,
            0, 1, 2, 0,
            0, 3, 4, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_extrapolate_mirror() -> Result<(), ImageError> {
        let dst = extrapolate(&make_src_2x2()?, (1, 1), BorderType::Mirror)?;

        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_extrapolate_nearest() -> Result<(), ImageError> {
        let dst = extrapolate(&make_src_2x2()?, (0, 2), BorderType::NearestNeighbour)?;

        #[rustfmt::skip]
        let expected = [
            1, 1, 1, 2, 2, 2,
            3, 3, 3, 4, 4, 4,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_extrapolate_circular() -> Result<(), ImageError> {
        let dst = extrapolate(&make_src_2x2()?, (1, 1), BorderType::Circular)?;

        #[rustfmt::skip]
        let expected = [
            4, 3, 4, 3,
            2, 1, 2, 1,
            4, 3, 4, 3,
            2, 1, 2, 1,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn test_mirror_larger_than_image() {
        // 0 1 2 | 2 1 0 | 0 1 2 | 2 1 0
        let mapped: Vec<_> = (-6..6)
            .map(|i| BorderType::Mirror.map_index(i, 3))
            .collect::<Option<_>>()
            .unwrap_or_default();
        assert_eq!(mapped, vec![0, 1, 2, 2, 1, 0, 0, 1, 2, 2, 1, 0]);

        assert_eq!(BorderType::Mirror.map_index(-5, 1), Some(0));
    }

    #[test]
    fn test_extrapolate_dst_size_mismatch() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let mut dst = Image::from_size_val(
            ImageSize {
                width: 3,
                height: 4,
            },
            0u8,
        )?;

        let res = extrapolate_into(&src, &mut dst, (1, 1), BorderType::Mirror);
        assert_eq!(res, Err(ImageError::InvalidImageSize(3, 4, 4, 4)));

        Ok(())
    }
}
