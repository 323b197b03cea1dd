use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// A stack of equally sized image planes.
///
/// The data is laid out plane after plane, each plane row-major, i.e. the
/// outer axis is the plane index.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStack<T> {
    num_planes: usize,
    plane_size: ImageSize,
    data: Vec<T>,
}

impl<T> ImageStack<T> {
    /// Create a new stack from its raw data.
    ///
    /// # Errors
    ///
    /// If there are no planes, a plane dimension is zero, or the data length
    /// does not match `num_planes * height * width`, an error is returned.
    pub fn new(num_planes: usize, plane_size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if num_planes == 0 || !plane_size.is_valid() {
            return Err(ImageError::ZeroSizedImage(plane_size.width, plane_size.height));
        }

        let expected = num_planes * plane_size.area();
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            num_planes,
            plane_size,
            data,
        })
    }

    /// Create a stack with every pixel set to `val`.
    pub fn from_size_val(num_planes: usize, plane_size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Self::new(num_planes, plane_size, vec![val; num_planes * plane_size.area()])
    }

    /// Stack a list of images, which must all have the same size.
    pub fn from_planes(planes: Vec<Image<T>>) -> Result<Self, ImageError> {
        let Some(first) = planes.first() else {
            return Err(ImageError::ZeroSizedImage(0, 0));
        };
        let plane_size = first.size();
        let num_planes = planes.len();

        let mut data = Vec::with_capacity(num_planes * plane_size.area());
        for plane in planes {
            if plane.size() != plane_size {
                return Err(ImageError::InvalidImageSize(
                    plane.width(),
                    plane.height(),
                    plane_size.width,
                    plane_size.height,
                ));
            }
            data.extend(plane.into_vec());
        }

        Self::new(num_planes, plane_size, data)
    }

    /// Number of planes in the stack.
    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    /// Size of every plane.
    pub fn plane_size(&self) -> ImageSize {
        self.plane_size
    }

    /// The whole stack as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Pixels of plane `p` as a row-major slice.
    pub fn plane_slice(&self, p: usize) -> Result<&[T], ImageError> {
        if p >= self.num_planes {
            return Err(ImageError::PlaneIndexOutOfBounds(p, self.num_planes));
        }
        let len = self.plane_size.area();
        Ok(&self.data[p * len..(p + 1) * len])
    }

    /// Mutable pixels of plane `p` as a row-major slice.
    pub fn plane_slice_mut(&mut self, p: usize) -> Result<&mut [T], ImageError> {
        if p >= self.num_planes {
            return Err(ImageError::PlaneIndexOutOfBounds(p, self.num_planes));
        }
        let len = self.plane_size.area();
        Ok(&mut self.data[p * len..(p + 1) * len])
    }

    /// Copy plane `p` out as an image.
    pub fn plane(&self, p: usize) -> Result<Image<T>, ImageError>
    where
        T: Clone,
    {
        Image::new(self.plane_size, self.plane_slice(p)?.to_vec())
    }

    /// Iterate over the planes as mutable slices.
    pub fn planes_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let len = self.plane_size.area();
        self.data.chunks_exact_mut(len)
    }
}
