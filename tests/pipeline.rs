//! End-to-end scenarios through the public API.

use imagestag_enhance::filters::contrast::ContrastParams;
use imagestag_enhance::filters::noise::{bilateral_u8, BilateralParams};
use imagestag_enhance::filters::sharpen::{unsharp_mask_u8, SharpenParams};
use imagestag_enhance::{
    denoise, encode_png, enhance_contrast, sharpen, EnhanceConfig, EnhanceError, EnhanceResult,
    EnhancementPipeline, FixedEstimator, ImageDecoder, QualityEstimate, RasterBuffer,
    RasterDecoder,
};
use ndarray::Array3;

fn estimator() -> FixedEstimator {
    FixedEstimator(QualityEstimate {
        quality_score: 88.0,
        interpretability_score: 84.0,
        noise_reduction: 81,
        contrast_enhancement: 90,
        edge_sharpening: 72,
    })
}

fn pipeline() -> EnhancementPipeline {
    EnhancementPipeline::default().with_estimator(estimator())
}

/// Deterministic textured image with varying alpha.
fn textured(width: u32, height: u32) -> RasterBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(((x * 37 + y * 11) % 256) as u8);
            data.push(((x * 5 + y * 53) % 256) as u8);
            data.push(((x * y + 17) % 256) as u8);
            data.push((255 - (x + y) % 64) as u8);
        }
    }
    RasterBuffer::from_rgba(width, height, data).unwrap()
}

fn decode(png: &[u8]) -> RasterBuffer {
    ImageDecoder.decode(png).unwrap()
}

#[test]
fn tiny_gray_image_untouched_by_spatial_stages() {
    let gray = RasterBuffer::filled(3, 3, [128, 128, 128, 255]).unwrap();

    let denoised = bilateral_u8(gray.view(), BilateralParams::default());
    let sharpened = unsharp_mask_u8(denoised.view(), SharpenParams::default());

    assert_eq!(sharpened, gray.view());
}

#[test]
fn tiny_gray_image_full_pipeline() {
    let gray = RasterBuffer::filled(3, 3, [128, 128, 128, 255]).unwrap();

    // With the equalized share at zero, contrast is an identity and the whole
    // pipeline must hand back the input unchanged
    let mut config = EnhanceConfig::default();
    config.contrast.equalized_weight = 0.0;
    let identity = EnhancementPipeline::new(config)
        .unwrap()
        .with_estimator(estimator());
    let result = identity.enhance(gray.clone(), None).unwrap();
    assert_eq!(decode(&result.enhanced_image), gray);

    // Stock parameters: cdf[128] = 255, so 255 * 1.6 * 0.7 + 128 * 0.3 clamps to 255
    let result = pipeline().enhance(gray, None).unwrap();
    let out = decode(&result.enhanced_image);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
        }
    }
}

#[test]
fn large_image_is_bounded() {
    let image = RasterBuffer::filled(2000, 1000, [70, 80, 90, 255]).unwrap();

    let result = pipeline().enhance(image, None).unwrap();

    assert_eq!((result.width, result.height), (1024, 512));
    assert_eq!(decode(&result.enhanced_image).dimensions(), (1024, 512));
}

#[test]
fn progress_from_bytes_is_monotonic_and_complete() {
    let png = encode_png(textured(12, 9)).unwrap();

    let mut seen = Vec::new();
    let mut sink = |p: u8| seen.push(p);
    pipeline().enhance_bytes(&png, Some(&mut sink)).unwrap();

    assert_eq!(seen, vec![10, 20, 30, 50, 70, 90, 100]);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn alpha_survives_full_pipeline() {
    let input = textured(20, 14);

    let result = pipeline().enhance(input.clone(), None).unwrap();
    let out = decode(&result.enhanced_image);

    for y in 0..14 {
        for x in 0..20 {
            assert_eq!(out.pixel(x, y)[3], input.pixel(x, y)[3], "({x},{y})");
        }
    }
}

#[test]
fn denoise_keeps_two_pixel_border() {
    let input = textured(16, 12);

    let out = bilateral_u8(input.view(), BilateralParams::default());

    for y in 0..12usize {
        for x in 0..16usize {
            if y < 2 || y >= 10 || x < 2 || x >= 14 {
                for c in 0..4 {
                    assert_eq!(out[[y, x, c]], input.view()[[y, x, c]]);
                }
            }
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let input = textured(33, 21);

    let a = pipeline().enhance(input.clone(), None).unwrap();
    let b = pipeline().enhance(input, None).unwrap();

    assert_eq!(a.enhanced_image, b.enhanced_image);
    assert_eq!(a.insights, b.insights);
}

#[test]
fn result_reports_estimator_scores() {
    let result = pipeline().enhance(textured(8, 8), None).unwrap();

    assert_eq!(result.quality_score, 88.0);
    assert_eq!(result.interpretability_score, 84.0);
    assert_eq!(
        result.insights,
        vec![
            "Noise reduction: 81%",
            "Contrast enhancement: 90%",
            "Edge sharpening: 72%",
            "Overall quality improvement: 88%",
        ]
    );
}

#[test]
fn batch_keeps_order() {
    let images = vec![textured(5, 5), textured(1500, 10), textured(7, 3)];

    let results = pipeline().enhance_batch(images).unwrap();

    let dims: Vec<_> = results
        .into_iter()
        .map(|r| {
            let r = r.unwrap();
            (r.width, r.height)
        })
        .collect();
    assert_eq!(dims, vec![(5, 5), (1024, 7), (7, 3)]);
}

/// Stand-in for a format-specific decoder.
struct ConstantDecoder;

impl RasterDecoder for ConstantDecoder {
    fn decode(&self, bytes: &[u8]) -> EnhanceResult<RasterBuffer> {
        let level = bytes.first().copied().unwrap_or(0);
        RasterBuffer::filled(4, 4, [level, level, level, 255])
    }
}

#[test]
fn custom_decoder_is_used() {
    let pipeline = pipeline().with_decoder(ConstantDecoder);

    let result = pipeline.enhance_file("series.dcm", &[42, 0, 0], None).unwrap();

    assert_eq!((result.width, result.height), (4, 4));
}

#[test]
fn unsupported_file_name_is_rejected() {
    let png = encode_png(textured(4, 4)).unwrap();

    let result = pipeline().enhance_file("scan.gif", &png, None);

    assert!(matches!(result, Err(EnhanceError::Decode(_))));
}

#[test]
fn stage_functions_need_rgba_arrays() {
    // Gray and gray+alpha arrays are refused before any filter runs
    for channels in [1, 2] {
        let array = Array3::<u8>::from_elem((6, 6, channels), 100);
        assert!(matches!(
            RasterBuffer::from_array(array),
            Err(EnhanceError::BufferUnavailable(_))
        ));
    }

    let rgba = RasterBuffer::from_array(Array3::<u8>::from_elem((6, 6, 4), 100)).unwrap();
    let out = denoise(&rgba, BilateralParams::default()).unwrap();
    assert_eq!(out.pixel(2, 2), [100, 100, 100, 100]);
}

#[test]
fn stage_functions_refuse_degenerate_params() {
    let flat = RasterBuffer::filled(6, 6, [100, 100, 100, 255]).unwrap();

    let zero_sigma = BilateralParams {
        radius: 2,
        sigma_spatial: 0.0,
        sigma_intensity: 50.0,
    };
    assert!(matches!(
        denoise(&flat, zero_sigma),
        Err(EnhanceError::InvalidConfig(_))
    ));

    let bad_weight = ContrastParams {
        factor: 1.6,
        equalized_weight: 2.0,
    };
    assert!(matches!(
        enhance_contrast(&flat, bad_weight),
        Err(EnhanceError::InvalidConfig(_))
    ));

    assert!(matches!(
        sharpen(&flat, SharpenParams { blend: -1.0 }),
        Err(EnhanceError::InvalidConfig(_))
    ));
}
