//! `[image]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [image]
//! jpeg_quality = 80   # JPEG re-encode quality (1-100)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { jpeg_quality: 80 }
    }
}

impl ImageConfig {
    const JPEG_QUALITY: FieldPath = FieldPath::new("image.jpeg_quality");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.jpeg_quality) {
            diag.error(
                Self::JPEG_QUALITY,
                format!("quality must be within 1..=100, got {}", self.jpeg_quality),
            );
        }
    }
}
