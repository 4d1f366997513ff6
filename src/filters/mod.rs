//! Filter modules for the enhancement pipeline.
//!
//! ## Supported Format
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Snapshot reads** - Every output sample is computed from the unmodified input
//! - **Alpha preservation** - Alpha channel is never modified
//! - **Fixed border** - Neighbourhood filters leave pixels without a full window untouched
//! - **Deterministic** - Same input and parameters give bit-identical output
//! - **Thread-safe** - Neighbourhood filters run rows in parallel with rayon
//!
//! ## Filters
//!
//! - **resize**: bound the larger side (bilinear)
//! - **noise**: bilateral denoise
//! - **contrast**: luma histogram equalization
//! - **sharpen**: unsharp mask

pub mod core;
pub mod grayscale;
pub mod resize;
pub mod noise;
pub mod contrast;
pub mod sharpen;
