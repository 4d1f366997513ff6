//! Decode and encode boundary.
//!
//! Decoding sits behind [`RasterDecoder`] so a format-specific decoder (for
//! example a real DICOM reader with windowing) can replace the default
//! `image`-backed one without touching the filters. Encoding always produces
//! lossless PNG.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, warn};

use crate::error::{EnhanceError, EnhanceResult};
use crate::raster::RasterBuffer;

/// Turns raw input bytes into an RGBA raster.
pub trait RasterDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> EnhanceResult<RasterBuffer>;
}

/// Decoder for browser-style raster formats (PNG, JPEG) via the `image` crate.
///
/// The container format is sniffed from the bytes, not from a file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl RasterDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> EnhanceResult<RasterBuffer> {
        if bytes.is_empty() {
            return Err(EnhanceError::Decode("input is empty".to_string()));
        }

        let image = image::load_from_memory(bytes)
            .map_err(|err| EnhanceError::Decode(err.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "decoded raster"
        );
        RasterBuffer::from_rgba_image(image.into_rgba8())
    }
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: RasterBuffer) -> EnhanceResult<Vec<u8>> {
    let image = raster.into_rgba_image()?;
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| EnhanceError::Encode(err.to_string()))?;
    Ok(buffer.into_inner())
}

/// Source formats accepted by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    /// Accepted by extension only. The bytes go through the same raster
    /// decoder; no DICOM pixel semantics are applied.
    Dicom,
}

impl SourceFormat {
    /// Lowercase extensions accepted for upload.
    pub const ACCEPTED_EXTENSIONS: [&'static str; 5] = ["jpeg", "jpg", "png", "dicom", "dcm"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(SourceFormat::Jpeg),
            "png" => Some(SourceFormat::Png),
            "dicom" | "dcm" => Some(SourceFormat::Dicom),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Check the file name is acceptable and warn about DICOM handling.
    pub fn check_file_name(name: &str) -> EnhanceResult<Self> {
        let format = Self::from_path(name).ok_or_else(|| {
            EnhanceError::Decode(format!(
                "unsupported file type for {:?}; expected one of {:?}",
                name,
                Self::ACCEPTED_EXTENSIONS
            ))
        })?;
        if format == SourceFormat::Dicom {
            warn!(file = name, "DICOM file decoded as a plain raster image");
        }
        Ok(format)
    }
}

/// Output file name for an enhanced upload.
pub fn enhanced_file_name(original: &str) -> String {
    format!("enhanced_{}", original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_encode_decode_preserves_pixels() {
        let mut data = Vec::new();
        for i in 0..12u8 {
            data.extend_from_slice(&[i * 20, 255 - i, i, 100 + i]);
        }
        let raster = RasterBuffer::from_rgba(4, 3, data).unwrap();

        let png = encode_png(raster.clone()).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = ImageDecoder.decode(&png).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImageDecoder.decode(b"definitely not an image");
        assert!(matches!(result, Err(EnhanceError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(matches!(ImageDecoder.decode(&[]), Err(EnhanceError::Decode(_))));
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(SourceFormat::from_path("scan.JPG"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_path("dir/xray.png"), Some(SourceFormat::Png));
        assert_eq!(SourceFormat::from_path("ct.dcm"), Some(SourceFormat::Dicom));
        assert_eq!(SourceFormat::from_path("mri.dicom"), Some(SourceFormat::Dicom));
        assert_eq!(SourceFormat::from_path("notes.txt"), None);
        assert_eq!(SourceFormat::from_path("no_extension"), None);
    }

    #[test]
    fn test_check_file_name_rejects_unknown() {
        assert!(SourceFormat::check_file_name("scan.gif").is_err());
        assert_eq!(SourceFormat::check_file_name("ct.dcm").unwrap(), SourceFormat::Dicom);
    }

    #[test]
    fn test_enhanced_file_name() {
        assert_eq!(enhanced_file_name("chest.png"), "enhanced_chest.png");
    }
}
