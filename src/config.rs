//! Enhancement configuration.
//!
//! Defaults reproduce the stock pipeline: 1024 px bound, 5x5 bilateral with
//! σs = 2 and σi = 50, contrast gain 1.6 with a 0.7 equalized share, and a
//! 0.7 unsharp blend. Any field can be overridden from JSON; missing fields
//! keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{EnhanceError, EnhanceResult};
use crate::filters::contrast::ContrastParams;
use crate::filters::noise::BilateralParams;
use crate::filters::resize::MAX_DIMENSION;
use crate::filters::sharpen::SharpenParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Bound on the larger side before filtering
    pub max_dimension: u32,
    pub denoise: BilateralParams,
    pub contrast: ContrastParams,
    pub sharpen: SharpenParams,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        EnhanceConfig {
            max_dimension: MAX_DIMENSION,
            denoise: BilateralParams::default(),
            contrast: ContrastParams::default(),
            sharpen: SharpenParams::default(),
        }
    }
}

impl EnhanceConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> EnhanceResult<Self> {
        let config: EnhanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> EnhanceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter is in a usable range.
    pub fn validate(&self) -> EnhanceResult<()> {
        if self.max_dimension == 0 {
            return Err(EnhanceError::InvalidConfig(
                "max_dimension must be positive".to_string(),
            ));
        }
        self.denoise.validate()?;
        self.contrast.validate()?;
        self.sharpen.validate()
    }
}
