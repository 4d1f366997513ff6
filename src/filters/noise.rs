//! Noise reduction: edge-preserving bilateral filter.
//!
//! Each color channel is smoothed independently. A neighbour contributes
//! according to both its spatial distance from the center and how close its
//! intensity is to the center's, so flat regions are averaged while edges
//! keep their contrast.
//!
//! ## Border Policy
//!
//! Pixels within `radius` of any edge are copied from the input unchanged.
//! Only pixels with a complete neighbourhood are filtered.

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use super::core::{intensity_weights, map_interior, positive, round_to_u8, spatial_weights};
use crate::error::{EnhanceError, EnhanceResult};

/// Largest supported radius (11x11 window).
pub const MAX_RADIUS: usize = 10;

/// Bilateral filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilateralParams {
    /// Neighbourhood half-width (2 gives a 5x5 window)
    pub radius: usize,
    /// Spatial standard deviation in pixels
    pub sigma_spatial: f32,
    /// Intensity standard deviation in 0-255 units
    pub sigma_intensity: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        BilateralParams {
            radius: 2,
            sigma_spatial: 2.0,
            sigma_intensity: 50.0,
        }
    }
}

impl BilateralParams {
    /// Reject a radius outside `1..=MAX_RADIUS` and non-positive sigmas.
    ///
    /// A zero sigma makes the center weight `exp(-0 / 0)`, which is NaN.
    pub fn validate(&self) -> EnhanceResult<()> {
        if self.radius == 0 || self.radius > MAX_RADIUS {
            return Err(EnhanceError::InvalidConfig(format!(
                "denoise.radius must be in 1..={}, got {}",
                MAX_RADIUS, self.radius
            )));
        }
        if !positive(self.sigma_spatial) || !positive(self.sigma_intensity) {
            return Err(EnhanceError::InvalidConfig(format!(
                "denoise sigmas must be positive, got {} and {}",
                self.sigma_spatial, self.sigma_intensity
            )));
        }
        Ok(())
    }
}

/// Apply bilateral filter - u8 version.
///
/// # Arguments
/// * `input` - Image (height, width, channels); with 4 channels the last is alpha
/// * `params` - Window radius and the two sigmas, assumed validated
///
/// # Returns
/// Denoised image with the same shape; border and alpha untouched
pub fn bilateral_u8(input: ArrayView3<u8>, params: BilateralParams) -> Array3<u8> {
    let radius = params.radius;
    let spatial = spatial_weights(radius, params.sigma_spatial);
    let similarity = intensity_weights(params.sigma_intensity);

    map_interior(input, radius, |y, x, c| {
        let center = input[[y, x, c]];
        let mut sum = 0.0f32;
        let mut weight_sum = 0.0f32;

        for dy in 0..=(radius * 2) {
            let sy = y + dy - radius;
            for dx in 0..=(radius * 2) {
                let sx = x + dx - radius;
                let v = input[[sy, sx, c]];

                let weight = spatial[[dy, dx]] * similarity[v.abs_diff(center) as usize];
                sum += v as f32 * weight;
                weight_sum += weight;
            }
        }

        // The center always contributes weight 1, so weight_sum >= 1
        round_to_u8(sum / weight_sum)
    })
}
