//! Error type shared by every stage of the enhancement pipeline.
//!
//! Errors are terminal: no stage retries, and a failed invocation never
//! hands back a partially enhanced image.

/// Convenience alias used throughout the crate.
pub type EnhanceResult<T> = Result<T, EnhanceError>;

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// Input bytes could not be decoded into a raster.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The pixel backing store could not be acquired or has an inconsistent shape.
    #[error("pixel buffer unavailable: {0}")]
    BufferUnavailable(String),

    /// The enhanced raster could not be serialized to output bytes.
    #[error("failed to encode enhanced image: {0}")]
    Encode(String),

    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid enhancement configuration: {0}")]
    InvalidConfig(String),

    /// Cancellation was requested and observed at a stage boundary.
    #[error("enhancement cancelled")]
    Cancelled,

    #[error("batch of {count} images exceeds the limit of {max}")]
    BatchTooLarge { count: usize, max: usize },
}

impl From<serde_json::Error> for EnhanceError {
    fn from(err: serde_json::Error) -> Self {
        EnhanceError::InvalidConfig(err.to_string())
    }
}
