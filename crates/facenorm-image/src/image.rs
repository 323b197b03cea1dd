use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use facenorm_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if both dimensions are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

/// The element types an image buffer can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit signed integer
    I32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ElementType::U8 => "uint8",
            ElementType::U16 => "uint16",
            ElementType::I32 => "int32",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        };
        f.write_str(name)
    }
}

/// Trait for numeric image data types.
///
/// All the geometric and filtering math is done in `f64`, so every pixel
/// type must be losslessly convertible to it.
pub trait ImageDtype: Copy + Default + Send + Sync + num_traits::NumCast + 'static {
    /// The element type tag of the pixel type.
    const ELEMENT_TYPE: ElementType;

    /// Convert the value to `f64`.
    fn into_f64(self) -> f64;
}

macro_rules! impl_image_dtype {
    ($t:ty, $tag:expr) => {
        impl ImageDtype for $t {
            const ELEMENT_TYPE: ElementType = $tag;

            #[inline]
            fn into_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_image_dtype!(u8, ElementType::U8);
impl_image_dtype!(u16, ElementType::U16);
impl_image_dtype!(i32, ElementType::I32);
impl_image_dtype!(f32, ElementType::F32);
impl_image_dtype!(f64, ElementType::F64);

/// Represents a single plane image with pixel data.
///
/// The pixels are stored row-major, so the pixel at row `y` and column `x`
/// lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    size: ImageSize,
    data: Vec<T>,
}

/// A boolean mask of valid pixels; `true` marks a valid pixel.
pub type Mask = Image<bool>;

impl<T> Image<T> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the size has a zero dimension or the length of the pixel data does
    /// not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use facenorm_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.width(), 10);
    /// assert_eq!(image.height(), 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if !size.is_valid() {
            return Err(ImageError::ZeroSizedImage(size.width, size.height));
        }

        if data.len() != size.area() {
            return Err(ImageError::InvalidChannelShape(data.len(), size.area()));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and pixel value.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Image::new(size, vec![val; size.area()])
    }

    /// Create a new image by evaluating `f(row, col)` for every pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use facenorm_image::{Image, ImageSize};
    ///
    /// let ramp = Image::from_fn(ImageSize { width: 3, height: 2 }, |y, x| (y * 3 + x) as f64)
    ///     .unwrap();
    ///
    /// assert_eq!(ramp.get(1, 2), Some(&5.0));
    /// ```
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(y, x));
            }
        }
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the pixel data as a row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable row-major slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a reference to the pixel at row `y` and column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<&T> {
        if y >= self.height() || x >= self.width() {
            return None;
        }
        self.data.get(y * self.width() + x)
    }

    /// Get a mutable reference to the pixel at row `y` and column `x`.
    pub fn get_mut(&mut self, y: usize, x: usize) -> Option<&mut T> {
        if y >= self.height() || x >= self.width() {
            return None;
        }
        let cols = self.width();
        self.data.get_mut(y * cols + x)
    }

    /// Get the pixels of row `y`.
    ///
    /// PRECONDITION: `y < height`.
    pub fn row(&self, y: usize) -> &[T] {
        let cols = self.width();
        &self.data[y * cols..(y + 1) * cols]
    }

    /// Apply `f` to every pixel, producing a new image of the same size.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Image<U> {
        Image {
            size: self.size,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Fill every pixel with `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }
}

impl<T: ImageDtype> Image<T> {
    /// The element type of the pixels.
    pub fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    /// Convert the pixels to `f64` for processing.
    pub fn to_f64(&self) -> Image<f64> {
        self.map(|&v| v.into_f64())
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If one of the values is not representable in `U`, an error is returned.
    pub fn cast<U>(&self) -> Result<Image<U>, ImageError>
    where
        U: num_traits::NumCast,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }
}

impl Image<bool> {
    /// Create a mask where every pixel is valid.
    pub fn all_valid(size: ImageSize) -> Result<Self, ImageError> {
        Image::from_size_val(size, true)
    }

    /// Number of pixels flagged as valid.
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
