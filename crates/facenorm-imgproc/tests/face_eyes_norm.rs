use approx::assert_abs_diff_eq;
use facenorm_image::{DynImage, Image, ImageSize, Mask};
use facenorm_imgproc::face::{FaceEyesNorm, FaceEyesNormConfig};
use facenorm_imgproc::geometry::Point2;
use facenorm_imgproc::ImgprocError;

const CROP: ImageSize = ImageSize {
    width: 64,
    height: 64,
};

fn make_norm() -> Result<FaceEyesNorm, ImgprocError> {
    FaceEyesNorm::new(FaceEyesNormConfig::from_eyes_distance(
        CROP,
        16.0,
        Point2::new(16.0, 32.0),
    ))
}

#[test]
fn test_constructors_are_equivalent() -> Result<(), ImgprocError> {
    let from_landmarks = FaceEyesNorm::new(FaceEyesNormConfig::from_landmarks(
        CROP,
        Point2::new(16.0, 24.0),
        Point2::new(16.0, 40.0),
    ))?;
    assert_eq!(from_landmarks, make_norm()?);

    Ok(())
}

#[test]
fn test_identity_alignment() -> Result<(), ImgprocError> {
    let mut norm = make_norm()?;
    let src = Image::from_fn(CROP, |y, x| ((y * 64 + x) % 251) as u8)?;

    let (dst, mask) = norm.align_masked(
        &DynImage::from(src.clone()),
        &Mask::all_valid(CROP)?,
        Point2::new(16.0, 24.0),
        Point2::new(16.0, 40.0),
    )?;

    assert_abs_diff_eq!(norm.last_angle(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(norm.last_scale(), 1.0, epsilon = 1e-12);
    assert_eq!(norm.last_offset(), Point2::new(16.0, 32.0));
    assert_eq!(dst, src.to_f64());
    assert_eq!(mask.count_valid(), CROP.area());

    Ok(())
}

#[test]
fn test_landmarks_on_linear_ramp() -> Result<(), ImgprocError> {
    let mut norm = make_norm()?;
    let src = Image::from_fn(
        ImageSize {
            width: 160,
            height: 120,
        },
        |y, x| (2 * y + 3 * x) as f64,
    )?;
    let (right, left) = (Point2::new(60.0, 50.0), Point2::new(40.0, 90.0));

    let dst = norm.align(&DynImage::from(src), right, left)?;

    // the landmarks are sampled at their target positions
    assert_abs_diff_eq!(dst.row(16)[24], 270.0, epsilon = 1e-6);
    assert_abs_diff_eq!(dst.row(16)[40], 350.0, epsilon = 1e-6);

    let geom_norm = norm.geom_norm().ok_or(ImgprocError::InvalidConfiguration(
        "no alignment recorded".to_string(),
    ))?;
    let center = norm.last_offset();
    for (landmark, target) in [
        (right, norm.config().right_target()),
        (left, norm.config().left_target()),
    ] {
        let p = geom_norm.transform_point(center, landmark);
        assert_abs_diff_eq!(p.y, target.y, epsilon = 1e-9);
        assert_abs_diff_eq!(p.x, target.x, epsilon = 1e-9);
    }

    Ok(())
}

#[test]
fn test_tilted_targets() -> Result<(), ImgprocError> {
    let config = FaceEyesNormConfig::from_landmarks(CROP, Point2::new(20.0, 20.0), Point2::new(30.0, 44.0));
    let mut norm = FaceEyesNorm::new(config)?;
    let src = Image::from_size_val(
        ImageSize {
            width: 100,
            height: 100,
        },
        7u16,
    )?;
    let (right, left) = (Point2::new(50.0, 30.0), Point2::new(50.0, 70.0));

    norm.align(&DynImage::from(src), right, left)?;

    let params = *norm.last_parameters();
    assert_abs_diff_eq!(params.scale, 26.0 / 40.0, epsilon = 1e-12);
    assert_abs_diff_eq!(params.angle, config.eyes_angle, epsilon = 1e-12);

    let geom_norm = norm.geom_norm().ok_or(ImgprocError::InvalidConfiguration(
        "no alignment recorded".to_string(),
    ))?;
    let p = geom_norm.transform_point(params.center, right);
    assert_abs_diff_eq!(p.y, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(p.x, 20.0, epsilon = 1e-9);

    Ok(())
}

#[test]
fn test_mask_propagation() -> Result<(), ImgprocError> {
    let mut norm = make_norm()?;
    let src = Image::from_size_val(CROP, 0.5f64)?;
    let src_mask = Mask::from_fn(CROP, |y, x| !((30..40).contains(&y) && (30..40).contains(&x)))?;

    let (dst, mask) = norm.align_masked(
        &DynImage::from(src),
        &src_mask,
        Point2::new(16.0, 24.0),
        Point2::new(16.0, 40.0),
    )?;

    for y in 30..40 {
        for x in 30..40 {
            assert_eq!(mask.get(y, x), Some(&false));
            // the values are still resampled
            assert_eq!(dst.get(y, x), Some(&0.5));
        }
    }
    assert_eq!(mask.count_valid(), CROP.area() - 100);

    Ok(())
}

#[test]
fn test_out_of_image_is_invalid() -> Result<(), ImgprocError> {
    let mut norm = make_norm()?;
    let size = ImageSize {
        width: 40,
        height: 40,
    };
    let src = Image::from_size_val(size, 1u8)?;

    // the eyes sit close to the top edge, so the upper part of the crop falls outside
    let (right, left) = (Point2::new(2.0, 12.0), Point2::new(2.0, 28.0));
    let (dst, mask) = norm.align_masked(&DynImage::from(src), &Mask::all_valid(size)?, right, left)?;

    assert_eq!(mask.get(0, 32), Some(&false));
    assert_eq!(dst.get(0, 32), Some(&0.0));
    assert_eq!(mask.get(16, 32), Some(&true));
    assert_eq!(dst.get(16, 32), Some(&1.0));

    Ok(())
}

#[test]
fn test_masked_shape_mismatch() -> Result<(), ImgprocError> {
    let mut norm = make_norm()?;
    let src = DynImage::from(Image::from_size_val(CROP, 1u8)?);
    let small = ImageSize {
        width: 8,
        height: 8,
    };
    let (right, left) = (Point2::new(16.0, 24.0), Point2::new(16.0, 40.0));

    let res = norm.align_masked(&src, &Mask::all_valid(small)?, right, left);
    assert!(matches!(
        res,
        Err(ImgprocError::ShapeMismatch {
            what: "input mask",
            ..
        })
    ));

    let mut dst = Image::from_size_val(CROP, 0.0)?;
    let mut dst_mask = Mask::from_size_val(small, true)?;
    let res = norm.align_masked_into(
        &src,
        &Mask::all_valid(CROP)?,
        &mut dst,
        &mut dst_mask,
        right,
        left,
    );
    assert!(matches!(
        res,
        Err(ImgprocError::ShapeMismatch {
            what: "output mask",
            ..
        })
    ));
    assert!(dst_mask.as_slice().iter().all(|&v| v));
    assert!(norm.geom_norm().is_none());

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_config_serde() -> Result<(), Box<dyn std::error::Error>> {
    let config = FaceEyesNormConfig::from_eyes_distance(CROP, 16.0, Point2::new(16.0, 32.0));
    let json = serde_json::to_string(&config)?;
    let decoded: FaceEyesNormConfig = serde_json::from_str(&json)?;
    assert_eq!(decoded, config);

    Ok(())
}
