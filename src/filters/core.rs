//! Core utilities for the enhancement filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Spatial Gaussian weight tables
//! - Intensity-difference weight lookup tables
//! - Rounding into the u8 sample range
//! - Color channel selection (alpha is never filtered)
//! - A row-parallel driver for neighbourhood filters with a fixed border

use ndarray::{Array2, Array3, ArrayView3, Axis};
use rayon::prelude::*;

use crate::raster::{CHANNELS, COLOR_CHANNELS};

/// Generate an unnormalized 2D spatial Gaussian weight table.
///
/// Entry `[dy, dx]` holds `exp(-(ox² + oy²) / (2σ²))` where `ox = dx - radius`
/// and `oy = dy - radius`. The table is `(2 * radius + 1)` square.
///
/// # Arguments
/// * `radius` - Half-width of the neighbourhood
/// * `sigma` - Spatial standard deviation
pub fn spatial_weights(radius: usize, sigma: f32) -> Array2<f32> {
    let size = radius * 2 + 1;
    let denom = 2.0 * sigma * sigma;

    Array2::from_shape_fn((size, size), |(dy, dx)| {
        let oy = dy as f32 - radius as f32;
        let ox = dx as f32 - radius as f32;
        (-(ox * ox + oy * oy) / denom).exp()
    })
}

/// Lookup table of `exp(-d² / (2σ²))` for every absolute u8 difference `d`.
pub fn intensity_weights(sigma: f32) -> [f32; 256] {
    let denom = 2.0 * sigma * sigma;
    let mut table = [0.0f32; 256];
    for (d, w) in table.iter_mut().enumerate() {
        let d = d as f32;
        *w = (-(d * d) / denom).exp();
    }
    table
}

/// Round to nearest and clamp into 0-255.
#[inline]
pub fn round_to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Number of leading channels a filter may modify.
///
/// Four-channel input keeps its last channel as untouched alpha; inputs
/// with any other channel count have every channel filtered.
#[inline]
pub fn color_channels(channels: usize) -> usize {
    if channels == CHANNELS {
        COLOR_CHANNELS
    } else {
        channels
    }
}

/// True for finite values above zero.
#[inline]
pub(crate) fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Apply a per-sample function to every interior pixel, in parallel by row.
///
/// The output starts as a copy of `input`, so pixels within `margin` of any
/// edge and the alpha channel are carried through untouched. `sample` is
/// called as `sample(y, x, channel)` for color channels only and must read
/// from `input` (the snapshot), never from the output being written.
pub fn map_interior<F>(input: ArrayView3<u8>, margin: usize, sample: F) -> Array3<u8>
where
    F: Fn(usize, usize, usize) -> u8 + Sync,
{
    let (height, width, channels) = input.dim();
    let color_channels = color_channels(channels);
    let mut output = input.to_owned();

    if height <= margin * 2 || width <= margin * 2 {
        return output;
    }

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .filter(|(y, _)| *y >= margin && *y < height - margin)
        .for_each(|(y, mut row)| {
            for x in margin..width - margin {
                for c in 0..color_channels {
                    row[[x, c]] = sample(y, x, c);
                }
            }
        });

    output
}
