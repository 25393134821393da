//! Hot pixel correction pipeline module
//!
//! This module provides a structured approach to dual-camera hot pixel
//! correction, with separate modules for configuration, geometric
//! registration, pixel access, TIFF input/output and run orchestration.

pub mod common;
pub mod config;
pub mod conversions;
pub mod geometry;
pub mod hot_pixels;
pub mod pixels;
pub mod raster;
pub mod tiff;

pub use common::{
    CorrectionError,
    PixelCoord,
    Result,
};

pub use config::{
    Calibration,
    CameraRole,
    ConfigStore,
};

pub use raster::{
    BitDepth,
    GrayImage,
};

pub use tiff::{
    ImageReader,
    ImageWriter,
    StandardTiffWriter,
    TiffCompression,
    TiffImageReader,
};

pub use conversions::{
    CorrectionConfig,
    CorrectionConfigBuilder,
    CorrectionOutcome,
    CorrectionRequest,
    HotPixelCorrectionPipeline,
    OutOfFramePolicy,
};
