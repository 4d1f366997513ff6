//! Bounding resize: scale a raster down so its larger side fits a limit.
//!
//! Rasters already within the limit are returned as-is without resampling.

use image::imageops::{self, FilterType};

use crate::error::EnhanceResult;
use crate::raster::RasterBuffer;

/// Default bound on the larger image dimension.
pub const MAX_DIMENSION: u32 = 1024;

/// Output dimensions for a `width` x `height` raster bounded by `max_dim`.
///
/// The larger side becomes `max_dim`; the other is scaled by the same ratio,
/// rounded to nearest and kept at least 1. Rasters within the bound keep
/// their size.
pub fn target_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    if width <= max_dim && height <= max_dim {
        return (width, height);
    }

    let scale = |side: u32, long: u32| -> u32 {
        let scaled = (side as f64 * max_dim as f64 / long as f64).round() as u32;
        scaled.max(1)
    };

    if width > height {
        (max_dim, scale(height, width))
    } else {
        (scale(width, height), max_dim)
    }
}

/// Resize `raster` to fit within `max_dim` using bilinear interpolation.
///
/// # Returns
/// The same buffer untouched when no side exceeds `max_dim`, otherwise a
/// newly allocated buffer of [`target_dimensions`].
pub fn resize_to_fit(raster: RasterBuffer, max_dim: u32) -> EnhanceResult<RasterBuffer> {
    let (width, height) = raster.dimensions();
    let (new_width, new_height) = target_dimensions(width, height, max_dim);
    if (new_width, new_height) == (width, height) {
        return Ok(raster);
    }

    let source = raster.into_rgba_image()?;
    let resized = imageops::resize(&source, new_width, new_height, FilterType::Triangle);
    RasterBuffer::from_rgba_image(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_dimensions_within_bound() {
        assert_eq!(target_dimensions(1024, 1024, 1024), (1024, 1024));
        assert_eq!(target_dimensions(640, 480, 1024), (640, 480));
        assert_eq!(target_dimensions(1, 1024, 1024), (1, 1024));
    }

    #[test]
    fn test_target_dimensions_landscape() {
        assert_eq!(target_dimensions(2000, 1000, 1024), (1024, 512));
        // 1100 * 1024 / 1500 = 750.93
        assert_eq!(target_dimensions(1500, 1100, 1024), (1024, 751));
    }

    #[test]
    fn test_target_dimensions_portrait_and_square() {
        assert_eq!(target_dimensions(1000, 3000, 1024), (341, 1024));
        assert_eq!(target_dimensions(2048, 2048, 1024), (1024, 1024));
    }

    #[test]
    fn test_target_dimensions_never_zero() {
        assert_eq!(target_dimensions(5000, 1, 1024), (1024, 1));
    }

    #[test]
    fn test_aspect_ratio_within_rounding() {
        for &(w, h) in &[(1500u32, 1100u32), (1200, 1300), (3001, 1999), (1025, 900)] {
            let (nw, nh) = target_dimensions(w, h, MAX_DIMENSION);
            assert_eq!(nw.max(nh), MAX_DIMENSION);

            let in_ratio = w as f64 / h as f64;
            let out_ratio = nw as f64 / nh as f64;
            assert!(
                (out_ratio - in_ratio).abs() < 1.0 / w.max(h) as f64,
                "{w}x{h} -> {nw}x{nh}"
            );
        }
    }

    #[test]
    fn test_resize_small_is_identity() {
        let mut data = Vec::new();
        for i in 0..(7 * 5) {
            data.extend_from_slice(&[(i * 7) as u8, (i * 3) as u8, 255 - i as u8, 200]);
        }
        let raster = RasterBuffer::from_rgba(7, 5, data).unwrap();

        let result = resize_to_fit(raster.clone(), MAX_DIMENSION).unwrap();

        assert_eq!(result, raster);
    }

    #[test]
    fn test_resize_large_uniform() {
        let raster = RasterBuffer::filled(1300, 40, [90, 120, 150, 255]).unwrap();

        let result = resize_to_fit(raster, MAX_DIMENSION).unwrap();

        // 40 * 1024 / 1300 = 31.5
        assert_eq!(result.dimensions(), (1024, 32));
        assert_eq!(result.pixel(500, 10), [90, 120, 150, 255]);
    }
}
