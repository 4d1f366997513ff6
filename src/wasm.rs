//! WebAssembly exports for the enhancement pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGBA byte arrays (length = width * height * 4), the
//! layout of a canvas `ImageData` buffer.

use wasm_bindgen::prelude::*;

use crate::filters::contrast::ContrastParams;
use crate::filters::noise::BilateralParams;
use crate::filters::sharpen::SharpenParams;
use crate::pipeline::{denoise, enhance_contrast, sharpen};
use crate::{EnhanceError, EnhancementPipeline, RasterBuffer};

fn to_js_err(err: EnhanceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn raster(data: &[u8], width: u32, height: u32) -> Result<RasterBuffer, JsValue> {
    RasterBuffer::from_rgba(width, height, data.to_vec()).map_err(to_js_err)
}

// ============================================================================
// Full Pipeline
// ============================================================================

/// Run the full enhancement pipeline.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// PNG-encoded enhanced image
#[wasm_bindgen]
pub fn enhance_rgba_wasm(
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, JsValue> {
    let image = raster(data, width, height)?;
    let result = EnhancementPipeline::default()
        .enhance(image, None)
        .map_err(to_js_err)?;
    Ok(result.enhanced_image)
}

// ============================================================================
// Individual Stages
// ============================================================================

/// Bilateral denoise; returns flat RGBA bytes of the same size.
#[wasm_bindgen]
pub fn bilateral_denoise_wasm(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let input = raster(data, width, height)?;
    let result = denoise(&input, BilateralParams::default()).map_err(to_js_err)?;
    Ok(result.into_raw())
}

/// Luma histogram equalization; returns flat RGBA bytes of the same size.
#[wasm_bindgen]
pub fn equalize_contrast_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    factor: f32,
) -> Result<Vec<u8>, JsValue> {
    let input = raster(data, width, height)?;
    let params = ContrastParams {
        factor,
        ..ContrastParams::default()
    };
    let result = enhance_contrast(&input, params).map_err(to_js_err)?;
    Ok(result.into_raw())
}

/// Unsharp mask; returns flat RGBA bytes of the same size.
#[wasm_bindgen]
pub fn unsharp_mask_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    blend: f32,
) -> Result<Vec<u8>, JsValue> {
    let input = raster(data, width, height)?;
    let result = sharpen(&input, SharpenParams { blend }).map_err(to_js_err)?;
    Ok(result.into_raw())
}
