//! Sharpen filter: 3x3 unsharp mask blended with the original.
//!
//! ## Supported Formats
//!
//! - **RGBA**: (height, width, 4) - sharpens RGB, preserves alpha
//!
//! ## Border Policy
//!
//! The outermost row and column on every side are copied unchanged; only
//! pixels with a full 3x3 neighbourhood are convolved.

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use super::core::{map_interior, round_to_u8};
use crate::error::{EnhanceError, EnhanceResult};

/// Unsharp mask kernel. Weights sum to 1, so flat regions are unchanged.
///
/// ```text
/// -0.5 -1   -0.5
/// -1    7   -1
/// -0.5 -1   -0.5
/// ```
pub const UNSHARP_KERNEL: [[f32; 3]; 3] = [
    [-0.5, -1.0, -0.5],
    [-1.0, 7.0, -1.0],
    [-0.5, -1.0, -0.5],
];

/// Unsharp mask parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenParams {
    /// Share of the sharpened value in the output (0.0-1.0)
    pub blend: f32,
}

impl Default for SharpenParams {
    fn default() -> Self {
        SharpenParams { blend: 0.7 }
    }
}

impl SharpenParams {
    pub fn validate(&self) -> EnhanceResult<()> {
        if !(0.0..=1.0).contains(&self.blend) {
            return Err(EnhanceError::InvalidConfig(format!(
                "sharpen.blend must be in 0.0..=1.0, got {}",
                self.blend
            )));
        }
        Ok(())
    }
}

/// Apply unsharp mask - u8 version.
///
/// The convolution is clamped to 0-255 before blending:
/// `out = original * (1 - blend) + clamped * blend`.
///
/// # Arguments
/// * `input` - Image (height, width, channels); with 4 channels the last is alpha
/// * `params` - Blend weight, assumed validated
///
/// # Returns
/// Sharpened image with the same shape; 1-pixel border and alpha untouched
pub fn unsharp_mask_u8(input: ArrayView3<u8>, params: SharpenParams) -> Array3<u8> {
    let blend = params.blend;

    map_interior(input, 1, |y, x, c| {
        let mut sum = 0.0f32;
        for (ky, kernel_row) in UNSHARP_KERNEL.iter().enumerate() {
            for (kx, &k) in kernel_row.iter().enumerate() {
                sum += input[[y + ky - 1, x + kx - 1, c]] as f32 * k;
            }
        }

        let original = input[[y, x, c]] as f32;
        let sharpened = sum.clamp(0.0, 255.0);
        round_to_u8(original * (1.0 - blend) + sharpened * blend)
    })
}
