//! ImageStag Enhance
//!
//! Medical image enhancement pipeline implemented in Rust, with optional
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Pipeline
//! A decoded image runs through a fixed sequence of pixel transforms:
//! 1. **Resize** - bound the larger side to 1024 px (bilinear)
//! 2. **Denoise** - 5x5 bilateral filter
//! 3. **Contrast** - luma histogram equalization blended with the original
//! 4. **Sharpen** - 3x3 unsharp mask blended with the original
//!
//! The result is PNG-encoded and returned with quality scores from a
//! pluggable [`MetricsEstimator`].
//!
//! ## Image Format
//! Filters operate on RGBA u8 arrays of shape (height, width, 4). Alpha is
//! never modified, and neighbourhood filters leave border pixels that lack a
//! full window untouched.
//!
//! ```no_run
//! use imagestag_enhance::{EnhancementPipeline, EnhanceResult};
//!
//! fn run(bytes: &[u8]) -> EnhanceResult<Vec<u8>> {
//!     let pipeline = EnhancementPipeline::default();
//!     let mut report = |percent: u8| println!("{percent}%");
//!     let result = pipeline.enhance_bytes(bytes, Some(&mut report))?;
//!     Ok(result.enhanced_image)
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod pipeline;
pub mod raster;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use codec::{encode_png, enhanced_file_name, ImageDecoder, RasterDecoder, SourceFormat};
pub use config::EnhanceConfig;
pub use error::{EnhanceError, EnhanceResult};
pub use metrics::{FixedEstimator, MetricsEstimator, QualityEstimate, RandomEstimator};
pub use pipeline::{
    denoise, enhance_contrast, sharpen, CancellationToken, EnhancementPipeline, EnhancementResult,
    Stage,
};
pub use raster::RasterBuffer;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};

    use crate::filters::contrast::ContrastParams;
    use crate::filters::noise::BilateralParams;
    use crate::filters::resize;
    use crate::filters::sharpen::SharpenParams;
    use crate::pipeline;
    use crate::{EnhanceConfig, EnhanceError, EnhancementPipeline, RasterBuffer};

    fn to_py_err(err: EnhanceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Full Pipeline
    // ========================================================================

    /// Enhance encoded image bytes (PNG/JPEG).
    ///
    /// # Arguments
    /// * `data` - Encoded image bytes
    /// * `config_json` - Optional JSON overrides for the enhancement parameters
    ///
    /// # Returns
    /// Tuple of (PNG bytes, metrics dict)
    #[pyfunction]
    #[pyo3(signature = (data, config_json=None))]
    pub fn enhance_image<'py>(
        py: Python<'py>,
        data: &[u8],
        config_json: Option<&str>,
    ) -> PyResult<(Bound<'py, PyBytes>, Bound<'py, PyDict>)> {
        let config = match config_json {
            Some(json) => EnhanceConfig::from_json(json).map_err(to_py_err)?,
            None => EnhanceConfig::default(),
        };
        let pipeline = EnhancementPipeline::new(config).map_err(to_py_err)?;

        let result = py
            .allow_threads(|| pipeline.enhance_bytes(data, None))
            .map_err(to_py_err)?;

        let metrics = PyDict::new(py);
        metrics.set_item("width", result.width)?;
        metrics.set_item("height", result.height)?;
        metrics.set_item("processing_time_ms", result.processing_time_ms() as u64)?;
        metrics.set_item("quality_score", result.quality_score)?;
        metrics.set_item("interpretability_score", result.interpretability_score)?;
        metrics.set_item("insights", result.insights)?;

        Ok((PyBytes::new(py, &result.enhanced_image), metrics))
    }

    // ========================================================================
    // Individual Stages
    // ========================================================================

    /// Checked `(H, W, 4)` raster from a numpy array.
    fn raster_from(image: PyReadonlyArray3<'_, u8>) -> PyResult<RasterBuffer> {
        RasterBuffer::from_array(image.as_array().to_owned()).map_err(to_py_err)
    }

    /// Bound the larger side of an RGBA u8 image (bilinear).
    #[pyfunction]
    #[pyo3(signature = (image, max_dimension=1024))]
    pub fn resize_to_fit<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        max_dimension: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        if max_dimension == 0 {
            return Err(PyValueError::new_err("max_dimension must be positive"));
        }
        let raster = raster_from(image)?;
        let resized = resize::resize_to_fit(raster, max_dimension).map_err(to_py_err)?;
        Ok(resized.into_array().into_pyarray(py))
    }

    /// Edge-preserving bilateral denoise of an RGBA u8 image.
    #[pyfunction]
    #[pyo3(signature = (image, radius=2, sigma_spatial=2.0, sigma_intensity=50.0))]
    pub fn bilateral_denoise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        sigma_spatial: f32,
        sigma_intensity: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = BilateralParams {
            radius,
            sigma_spatial,
            sigma_intensity,
        };
        let raster = raster_from(image)?;
        let result = pipeline::denoise(&raster, params).map_err(to_py_err)?;
        Ok(result.into_array().into_pyarray(py))
    }

    /// Luma histogram equalization of an RGBA u8 image.
    #[pyfunction]
    #[pyo3(signature = (image, factor=1.6, equalized_weight=0.7))]
    pub fn equalize_contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        factor: f32,
        equalized_weight: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = ContrastParams {
            factor,
            equalized_weight,
        };
        let raster = raster_from(image)?;
        let result = pipeline::enhance_contrast(&raster, params).map_err(to_py_err)?;
        Ok(result.into_array().into_pyarray(py))
    }

    /// 3x3 unsharp mask of an RGBA u8 image.
    #[pyfunction]
    #[pyo3(signature = (image, blend=0.7))]
    pub fn unsharp_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blend: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let raster = raster_from(image)?;
        let result = pipeline::sharpen(&raster, SharpenParams { blend }).map_err(to_py_err)?;
        Ok(result.into_array().into_pyarray(py))
    }

    /// ImageStag enhancement extension module
    #[pymodule]
    pub fn imagestag_enhance(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Full pipeline
        m.add_function(wrap_pyfunction!(enhance_image, m)?)?;

        // Individual stages
        m.add_function(wrap_pyfunction!(resize_to_fit, m)?)?;
        m.add_function(wrap_pyfunction!(bilateral_denoise, m)?)?;
        m.add_function(wrap_pyfunction!(equalize_contrast, m)?)?;
        m.add_function(wrap_pyfunction!(unsharp_mask, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagestag_enhance;
