use argh::FromArgs;

use facenorm::image::{DynImage, Image, ImageSize, Mask};
use facenorm::imgproc::face::{FaceEyesNorm, FaceEyesNormConfig};
use facenorm::imgproc::filter::{KernelWeighting, WeightedGaussian, WeightedGaussianConfig};
use facenorm::imgproc::geometry::Point2;
use facenorm::imgproc::parallel::ExecutionStrategy;

#[derive(FromArgs)]
/// Align a synthetic face on its eyes and smooth it with the weighted gaussian filter
struct Args {
    /// the width of the synthetic input image
    #[argh(option, default = "320")]
    width: usize,

    /// the height of the synthetic input image
    #[argh(option, default = "240")]
    height: usize,

    /// the tilt of the face, in degrees
    #[argh(option, default = "12.0")]
    tilt: f64,

    /// the size of the square output crop
    #[argh(option, default = "64")]
    crop: usize,

    /// the radius of the weighted gaussian kernel
    #[argh(option, default = "2")]
    radius: usize,

    /// the sigma of the weighted gaussian kernel
    #[argh(option, default = "std::f64::consts::SQRT_2")]
    sigma: f64,

    /// use a bilateral style intensity weighting with this sigma
    #[argh(option)]
    intensity_sigma: Option<f64>,

    /// process the rows in parallel
    #[argh(switch)]
    parallel: bool,
}

/// Draw a bright elliptical face with two dark eyes; returns the image and the eyes.
fn synthetic_face(size: ImageSize, tilt: f64) -> Result<(Image<u8>, Point2, Point2), Box<dyn std::error::Error>> {
    let center = Point2::new(size.height as f64 / 2.0, size.width as f64 / 2.0);
    let half_eyes = size.width as f64 / 8.0;

    // the right eye is on the left side of the image
    let right = center + Point2::new(-half_eyes / 2.0, -half_eyes).rotate(tilt);
    let left = center + Point2::new(-half_eyes / 2.0, half_eyes).rotate(tilt);
    let eye_radius = half_eyes / 4.0;

    let image = Image::from_fn(size, |y, x| {
        let p = Point2::new(y as f64, x as f64);
        let d = p - center;
        let in_face = (d.y / (1.3 * half_eyes * 2.0)).powi(2) + (d.x / (half_eyes * 2.0)).powi(2) <= 1.0;
        if p.distance(&right) < eye_radius || p.distance(&left) < eye_radius {
            20
        } else if in_face {
            180 + ((x + y) % 7) as u8
        } else {
            60
        }
    })?;

    Ok((image, right, left))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let strategy = if args.parallel {
        ExecutionStrategy::ParallelRows
    } else {
        ExecutionStrategy::Serial
    };

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let (image, right, left) = synthetic_face(size, args.tilt.to_radians())?;
    log::info!("synthetic face {size}, eyes at {right:?} and {left:?}");

    // level eyes a quarter of the crop apart, on the upper third
    let crop = args.crop as f64;
    let crop_size = ImageSize {
        width: args.crop,
        height: args.crop,
    };
    let mut norm = FaceEyesNorm::new(FaceEyesNormConfig::from_eyes_distance(
        crop_size,
        crop / 4.0,
        Point2::new(crop / 3.0, crop / 2.0),
    ))?;

    let (aligned, mask) = norm.align_masked(&DynImage::from(image), &Mask::all_valid(size)?, right, left)?;
    let params = norm.last_parameters();
    log::info!(
        "aligned: angle {:.2} deg, scale {:.4}, {} / {} valid pixels",
        params.angle.to_degrees(),
        params.scale,
        mask.count_valid(),
        crop_size.area()
    );

    let weighting = match args.intensity_sigma {
        Some(sigma) => KernelWeighting::IntensityGaussian { sigma },
        None => KernelWeighting::MeanThreshold,
    };
    let filter = WeightedGaussian::new(WeightedGaussianConfig {
        radius_y: args.radius,
        radius_x: args.radius,
        sigma_y: args.sigma,
        sigma_x: args.sigma,
        weighting,
        strategy,
        ..Default::default()
    })?;
    let smooth = filter.filter(&aligned)?;

    let (min, max) = smooth
        .as_slice()
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let mean = smooth.as_slice().iter().sum::<f64>() / smooth.as_slice().len() as f64;
    log::info!("smoothed: min {min:.2}, max {max:.2}, mean {mean:.2}");

    println!(
        "angle={:.4} scale={:.4} valid={} mean={:.2}",
        params.angle,
        params.scale,
        mask.count_valid(),
        mean
    );

    Ok(())
}
