//! Luma computation for histogram-based filters.
//!
//! Uses ITU-R BT.601 coefficients, the classic weighting for perceived
//! brightness of 8-bit RGB.

use ndarray::{ArrayView3, Axis};

/// ITU-R BT.601 luma coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Luma of one RGB sample, rounded to the nearest integer.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let l = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    l.round().clamp(0.0, 255.0) as u8
}

/// Build a 256-bin histogram of per-pixel luma.
///
/// Pixels with fewer than three channels use their first channel as luma.
///
/// # Arguments
/// * `input` - Image (height, width, channels); alpha is ignored
pub fn luma_histogram(input: ArrayView3<u8>) -> [u32; 256] {
    let mut hist = [0u32; 256];

    for px in input.lanes(Axis(2)) {
        let luma = match px.len() {
            0 => continue,
            1 | 2 => px[0],
            _ => luma_u8(px[0], px[1], px[2]),
        };
        hist[luma as usize] += 1;
    }
    hist
}
