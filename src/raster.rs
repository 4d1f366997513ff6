//! In-memory decoded raster.
//!
//! Pixels are held as an `(height, width, 4)` RGBA u8 array in standard
//! (row-major) layout, the same shape the filters consume.

use image::RgbaImage;
use ndarray::{Array3, ArrayView3};

use crate::error::{EnhanceError, EnhanceResult};

/// Number of interleaved samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Number of color channels the filters touch. Alpha is never modified.
pub const COLOR_CHANNELS: usize = 3;

/// A decoded RGBA image with exclusive ownership of its samples.
///
/// The sample count always equals `width * height * 4`; every constructor
/// checks this, so stages can index neighbours without bounds surprises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    pixels: Array3<u8>,
}

impl RasterBuffer {
    /// Build a raster from interleaved RGBA bytes.
    ///
    /// # Errors
    /// `InvalidDimensions` for a zero-sized raster, `BufferUnavailable` when
    /// `data.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> EnhanceResult<Self> {
        if width == 0 || height == 0 {
            return Err(EnhanceError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(EnhanceError::BufferUnavailable(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        let pixels = Array3::from_shape_vec((height as usize, width as usize, CHANNELS), data)
            .map_err(|err| EnhanceError::BufferUnavailable(err.to_string()))?;
        Ok(RasterBuffer { pixels })
    }

    /// Build a raster where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> EnhanceResult<Self> {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::from_rgba(width, height, data)
    }

    /// Wrap an `(height, width, 4)` array produced by a filter.
    pub fn from_array(pixels: Array3<u8>) -> EnhanceResult<Self> {
        let (height, width, channels) = pixels.dim();
        if channels != CHANNELS {
            return Err(EnhanceError::BufferUnavailable(format!(
                "expected {} channels, got {}",
                CHANNELS, channels
            )));
        }
        if width == 0 || height == 0 {
            return Err(EnhanceError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }

        let pixels = if pixels.is_standard_layout() {
            pixels
        } else {
            pixels.as_standard_layout().into_owned()
        };
        Ok(RasterBuffer { pixels })
    }

    /// Take ownership of an `image` crate RGBA buffer.
    pub fn from_rgba_image(image: RgbaImage) -> EnhanceResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Read-only `(height, width, 4)` view for the filters.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// RGBA value at column `x`, row `y`.
    ///
    /// # Panics
    /// If `x >= width` or `y >= height`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let (x, y) = (x as usize, y as usize);
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
            self.pixels[[y, x, 3]],
        ]
    }

    /// The owned `(height, width, 4)` array, in standard layout.
    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }

    /// Interleaved RGBA bytes, row-major.
    pub fn into_raw(self) -> Vec<u8> {
        self.into_array().into_raw_vec_and_offset().0
    }

    /// Convert into an `image` crate buffer for resampling or encoding.
    pub fn into_rgba_image(self) -> EnhanceResult<RgbaImage> {
        let (width, height) = self.dimensions();
        RgbaImage::from_raw(width, height, self.into_raw()).ok_or_else(|| {
            EnhanceError::BufferUnavailable(format!(
                "sample count does not match {}x{} RGBA",
                width, height
            ))
        })
    }
}
