//! Enhancement pipeline: resize, denoise, contrast, sharpen, encode.
//!
//! Stages always run in that order and each one consumes the complete output
//! of the previous. Progress is reported at fixed milestones, including for
//! stages that turn out to be no-ops.
//!
//! ```text
//! enhance_bytes:  10 -> decode -> 20 -> enhance
//! enhance:        resize -> 30 -> denoise -> 50 -> contrast -> 70
//!                 -> sharpen -> 90 -> metrics + PNG -> 100
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::codec::{encode_png, ImageDecoder, RasterDecoder, SourceFormat};
use crate::config::EnhanceConfig;
use crate::error::{EnhanceError, EnhanceResult};
use crate::filters::contrast::{equalize_contrast_u8, ContrastParams};
use crate::filters::noise::{bilateral_u8, BilateralParams};
use crate::filters::resize::resize_to_fit;
use crate::filters::sharpen::{unsharp_mask_u8, SharpenParams};
use crate::metrics::{MetricsEstimator, RandomEstimator};
use crate::raster::RasterBuffer;

/// Progress reported on entry to [`EnhancementPipeline::enhance_bytes`].
pub const PROGRESS_LOADING: u8 = 10;
/// Progress reported once input bytes are decoded.
pub const PROGRESS_DECODED: u8 = 20;
pub const PROGRESS_DONE: u8 = 100;

/// Most images accepted by one [`EnhancementPipeline::enhance_batch`] call.
pub const MAX_BATCH_FILES: usize = 10;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resize,
    Denoise,
    Contrast,
    Sharpen,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Resize, Stage::Denoise, Stage::Contrast, Stage::Sharpen];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Resize => "resize",
            Stage::Denoise => "denoise",
            Stage::Contrast => "contrast",
            Stage::Sharpen => "sharpen",
        }
    }

    /// Percentage reported once this stage completes.
    pub fn completion_percent(self) -> u8 {
        match self {
            Stage::Resize => 30,
            Stage::Denoise => 50,
            Stage::Contrast => 70,
            Stage::Sharpen => 90,
        }
    }
}

/// Cooperative cancellation flag, checked only between stages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Output of one successful run.
#[derive(Debug, Clone)]
pub struct EnhancementResult {
    /// PNG-encoded enhanced image
    pub enhanced_image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Wall-clock time from entry to just before the final progress report
    pub processing_time: Duration,
    pub quality_score: f64,
    pub interpretability_score: f64,
    pub insights: Vec<String>,
}

impl EnhancementResult {
    pub fn processing_time_ms(&self) -> u128 {
        self.processing_time.as_millis()
    }
}

/// Forwards milestones to the caller's sink, never letting them go backwards.
struct Progress<'a> {
    sink: Option<&'a mut dyn FnMut(u8)>,
    last: u8,
}

impl<'a> Progress<'a> {
    fn new(sink: Option<&'a mut dyn FnMut(u8)>) -> Self {
        Progress { sink, last: 0 }
    }

    fn report(&mut self, percent: u8) {
        self.last = self.last.max(percent.min(PROGRESS_DONE));
        if let Some(sink) = self.sink.as_mut() {
            sink(self.last);
        }
    }
}

/// Runs the fixed enhancement sequence.
///
/// The pipeline holds no per-image state, so one instance can serve any
/// number of concurrent `enhance` calls.
pub struct EnhancementPipeline {
    config: EnhanceConfig,
    decoder: Box<dyn RasterDecoder>,
    estimator: Box<dyn MetricsEstimator>,
    cancel: Option<CancellationToken>,
}

impl Default for EnhancementPipeline {
    fn default() -> Self {
        EnhancementPipeline {
            config: EnhanceConfig::default(),
            decoder: Box::new(ImageDecoder),
            estimator: Box::new(RandomEstimator::new()),
            cancel: None,
        }
    }
}

impl EnhancementPipeline {
    /// Pipeline with a validated configuration and the default decoder and
    /// random estimator.
    pub fn new(config: EnhanceConfig) -> EnhanceResult<Self> {
        config.validate()?;
        Ok(EnhancementPipeline {
            config,
            ..Self::default()
        })
    }

    pub fn with_decoder(mut self, decoder: impl RasterDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_estimator(mut self, estimator: impl MetricsEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    /// Enhance an already decoded raster.
    ///
    /// # Errors
    /// Any stage failure or an observed cancellation ends the run; no image
    /// is returned in that case.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn enhance(
        &self,
        image: RasterBuffer,
        on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> EnhanceResult<EnhancementResult> {
        let mut progress = Progress::new(on_progress);
        self.run(image, &mut progress, Instant::now())
    }

    /// Decode raw bytes with the configured decoder, then enhance.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn enhance_bytes(
        &self,
        bytes: &[u8],
        on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> EnhanceResult<EnhancementResult> {
        let start = Instant::now();
        let mut progress = Progress::new(on_progress);

        progress.report(PROGRESS_LOADING);
        self.checkpoint()?;
        let image = self.decoder.decode(bytes)?;
        progress.report(PROGRESS_DECODED);

        self.run(image, &mut progress, start)
    }

    /// Like [`enhance_bytes`](Self::enhance_bytes), rejecting file names
    /// outside the accepted extensions first.
    pub fn enhance_file(
        &self,
        file_name: &str,
        bytes: &[u8],
        on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> EnhanceResult<EnhancementResult> {
        SourceFormat::check_file_name(file_name)?;
        self.enhance_bytes(bytes, on_progress)
    }

    /// Enhance independent images in parallel.
    ///
    /// Results keep input order; one image failing does not affect the rest.
    pub fn enhance_batch(
        &self,
        images: Vec<RasterBuffer>,
    ) -> EnhanceResult<Vec<EnhanceResult<EnhancementResult>>> {
        if images.len() > MAX_BATCH_FILES {
            return Err(EnhanceError::BatchTooLarge {
                count: images.len(),
                max: MAX_BATCH_FILES,
            });
        }
        info!(count = images.len(), "enhancing batch");

        Ok(images
            .into_par_iter()
            .map(|image| self.enhance(image, None))
            .collect())
    }

    fn run(
        &self,
        mut raster: RasterBuffer,
        progress: &mut Progress<'_>,
        start: Instant,
    ) -> EnhanceResult<EnhancementResult> {
        for stage in Stage::ALL {
            self.checkpoint()?;
            let stage_start = Instant::now();
            raster = self.apply(stage, raster)?;
            debug!(
                stage = stage.name(),
                width = raster.width(),
                height = raster.height(),
                elapsed_ms = stage_start.elapsed().as_millis() as u64,
                "stage complete"
            );
            progress.report(stage.completion_percent());
        }
        self.checkpoint()?;

        let estimate = self.estimator.estimate(&raster).clamped();
        let (width, height) = raster.dimensions();
        let enhanced_image = encode_png(raster)?;

        let processing_time = start.elapsed();
        info!(
            width,
            height,
            png_bytes = enhanced_image.len(),
            elapsed_ms = processing_time.as_millis() as u64,
            "enhancement complete"
        );
        progress.report(PROGRESS_DONE);

        Ok(EnhancementResult {
            enhanced_image,
            width,
            height,
            processing_time,
            quality_score: estimate.quality_score,
            interpretability_score: estimate.interpretability_score,
            insights: estimate.insights(),
        })
    }

    fn apply(&self, stage: Stage, raster: RasterBuffer) -> EnhanceResult<RasterBuffer> {
        let config = &self.config;
        match stage {
            Stage::Resize => {
                let before = raster.dimensions();
                let resized = resize_to_fit(raster, config.max_dimension)?;
                if resized.dimensions() != before {
                    info!(
                        from = ?before,
                        to = ?resized.dimensions(),
                        "resized to fit {}",
                        config.max_dimension
                    );
                }
                Ok(resized)
            }
            Stage::Denoise => denoise(&raster, config.denoise),
            Stage::Contrast => enhance_contrast(&raster, config.contrast),
            Stage::Sharpen => sharpen(&raster, config.sharpen),
        }
    }

    fn checkpoint(&self) -> EnhanceResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                info!("enhancement cancelled at stage boundary");
                Err(EnhanceError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

/// Bilateral denoise stage on its own, with parameter checks.
pub fn denoise(raster: &RasterBuffer, params: BilateralParams) -> EnhanceResult<RasterBuffer> {
    params.validate()?;
    filter(raster, |v| bilateral_u8(v, params))
}

/// Contrast stage on its own, with parameter checks.
pub fn enhance_contrast(
    raster: &RasterBuffer,
    params: ContrastParams,
) -> EnhanceResult<RasterBuffer> {
    params.validate()?;
    filter(raster, |v| equalize_contrast_u8(v, params))
}

/// Sharpen stage on its own, with parameter checks.
pub fn sharpen(raster: &RasterBuffer, params: SharpenParams) -> EnhanceResult<RasterBuffer> {
    params.validate()?;
    filter(raster, |v| unsharp_mask_u8(v, params))
}

/// Run a same-shape filter over a snapshot of `raster`.
fn filter<F>(raster: &RasterBuffer, f: F) -> EnhanceResult<RasterBuffer>
where
    F: FnOnce(ArrayView3<u8>) -> Array3<u8>,
{
    let output = f(raster.view());
    RasterBuffer::from_array(output)
}
