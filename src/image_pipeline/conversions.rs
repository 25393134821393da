//! Pipeline conversions module
//!
//! Orchestrates a full hot pixel correction run: detection, geometric
//! registration of both cameras, sampling and patching.

mod hot_pixel_correction;
pub mod types;


pub use hot_pixel_correction::{flat_name, HotPixelCorrectionPipeline};
pub use types::{
    CorrectionConfig, CorrectionConfigBuilder, CorrectionOutcome, CorrectionRequest, OutOfFramePolicy,
};
