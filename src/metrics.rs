//! Quality pseudo-metrics.
//!
//! The scores reported with an enhanced image are estimates, not measurements
//! against ground truth. They are produced by a [`MetricsEstimator`] so the
//! pipeline itself stays deterministic and tests can inject fixed values.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::RasterBuffer;

/// Upper bound (exclusive) for every percentage score.
const SCORE_CEILING: f64 = 100.0;

/// Scores attached to one enhancement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityEstimate {
    /// Overall quality, percent in [0, 100)
    pub quality_score: f64,
    /// Interpretability, percent in [0, 100)
    pub interpretability_score: f64,
    /// Whole-percent sub-scores reported as insights
    pub noise_reduction: u8,
    pub contrast_enhancement: u8,
    pub edge_sharpening: u8,
}

impl QualityEstimate {
    /// Force every score into its documented range.
    pub fn clamped(self) -> Self {
        let pct = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, SCORE_CEILING - f64::EPSILON * SCORE_CEILING)
            }
        };
        QualityEstimate {
            quality_score: pct(self.quality_score),
            interpretability_score: pct(self.interpretability_score),
            noise_reduction: self.noise_reduction.min(99),
            contrast_enhancement: self.contrast_enhancement.min(99),
            edge_sharpening: self.edge_sharpening.min(99),
        }
    }

    /// Human-readable insights: one per sub-score, then the overall summary.
    pub fn insights(&self) -> Vec<String> {
        vec![
            format!("Noise reduction: {}%", self.noise_reduction),
            format!("Contrast enhancement: {}%", self.contrast_enhancement),
            format!("Edge sharpening: {}%", self.edge_sharpening),
            format!(
                "Overall quality improvement: {}%",
                self.quality_score.floor() as u32
            ),
        ]
    }
}

/// Produces quality scores for an enhanced raster.
pub trait MetricsEstimator: Send + Sync {
    fn estimate(&self, enhanced: &RasterBuffer) -> QualityEstimate;
}

/// Bounded random scores in the stock ranges.
///
/// | Score | Range |
/// |-------|-------|
/// | quality | 85.0-95.0 |
/// | interpretability | 80.0-95.0 |
/// | noise reduction | 75-94 |
/// | contrast enhancement | 80-94 |
/// | edge sharpening | 70-94 |
#[derive(Debug)]
pub struct RandomEstimator {
    rng: Mutex<StdRng>,
}

impl RandomEstimator {
    pub fn new() -> Self {
        RandomEstimator {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of scores.
    pub fn seeded(seed: u64) -> Self {
        RandomEstimator {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEstimator for RandomEstimator {
    fn estimate(&self, _enhanced: &RasterBuffer) -> QualityEstimate {
        // A poisoned lock only means another estimate panicked mid-draw
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        QualityEstimate {
            quality_score: rng.gen_range(85.0..95.0),
            interpretability_score: rng.gen_range(80.0..95.0),
            noise_reduction: rng.gen_range(75..95),
            contrast_enhancement: rng.gen_range(80..95),
            edge_sharpening: rng.gen_range(70..95),
        }
    }
}

/// Always returns the same estimate.
#[derive(Debug, Clone, Copy)]
pub struct FixedEstimator(pub QualityEstimate);

impl MetricsEstimator for FixedEstimator {
    fn estimate(&self, _enhanced: &RasterBuffer) -> QualityEstimate {
        self.0
    }
}
