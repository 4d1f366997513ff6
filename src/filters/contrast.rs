//! Adaptive contrast: luma histogram equalization blended with the original.
//!
//! A single histogram is built from the luma of the unmodified image. Its
//! normalized cumulative distribution becomes a 256-entry tone curve that is
//! applied to R, G and B alike, then mixed back with the source values so
//! the result stays close to the original tonality.
//!
//! ## Supported Formats
//!
//! - **RGBA**: (height, width, 4) - remaps RGB, preserves alpha

use ndarray::{Array3, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use super::core::{color_channels, positive, round_to_u8};
use super::grayscale::luma_histogram;
use crate::error::{EnhanceError, EnhanceResult};

/// Histogram equalization strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastParams {
    /// Gain applied to the equalized value
    pub factor: f32,
    /// Share of the equalized value in the output (0.0-1.0); the remainder
    /// comes from the original sample
    pub equalized_weight: f32,
}

impl Default for ContrastParams {
    fn default() -> Self {
        ContrastParams {
            factor: 1.6,
            equalized_weight: 0.7,
        }
    }
}

impl ContrastParams {
    /// Reject a non-positive or non-finite gain and a weight outside 0.0-1.0.
    pub fn validate(&self) -> EnhanceResult<()> {
        if !positive(self.factor) {
            return Err(EnhanceError::InvalidConfig(format!(
                "contrast.factor must be a positive number, got {}",
                self.factor
            )));
        }
        if !(0.0..=1.0).contains(&self.equalized_weight) {
            return Err(EnhanceError::InvalidConfig(format!(
                "contrast.equalized_weight must be in 0.0..=1.0, got {}",
                self.equalized_weight
            )));
        }
        Ok(())
    }
}

/// Normalized cumulative distribution of a histogram, scaled to 0-255.
pub fn normalized_cdf(hist: &[u32; 256]) -> [f32; 256] {
    let total: u64 = hist.iter().map(|&n| n as u64).sum();
    let mut cdf = [0.0f32; 256];
    if total == 0 {
        return cdf;
    }

    let mut running = 0u64;
    for (v, &count) in hist.iter().enumerate() {
        running += count as u64;
        cdf[v] = running as f32 / total as f32 * 255.0;
    }
    cdf
}

/// Build the per-value tone curve for the given distribution.
fn tone_curve(cdf: &[f32; 256], params: ContrastParams) -> [u8; 256] {
    let eq_weight = params.equalized_weight;
    let orig_weight = 1.0 - eq_weight;

    let mut curve = [0u8; 256];
    for (v, out) in curve.iter_mut().enumerate() {
        *out = round_to_u8(cdf[v] * params.factor * eq_weight + v as f32 * orig_weight);
    }
    curve
}

/// Apply luma histogram equalization - u8 version.
///
/// # Arguments
/// * `input` - RGBA image (height, width, 4)
/// * `params` - Gain and blend weight
///
/// # Returns
/// Contrast-enhanced image with the same shape; alpha untouched
pub fn equalize_contrast_u8(input: ArrayView3<u8>, params: ContrastParams) -> Array3<u8> {
    // Curve is derived from the original samples before anything is rewritten
    let cdf = normalized_cdf(&luma_histogram(input));
    let curve = tone_curve(&cdf, params);

    let color_channels = color_channels(input.dim().2);
    let mut output = input.to_owned();
    for mut px in output.lanes_mut(Axis(2)) {
        for c in 0..color_channels {
            let v = px[c] as usize;
            px[c] = curve[v];
        }
    }
    output
}
