//! Correction run configuration and results

use std::path::PathBuf;

use crate::image_pipeline::common::timing::PipelineTimings;
use crate::image_pipeline::hot_pixels::{FlatHotPixel, Replacement};
use crate::image_pipeline::raster::GrayImage;
use crate::image_pipeline::tiff::{TiffCompression, TiffOutputConfig};

/// What to do with a hot pixel whose flat-frame position falls outside the
/// secondary image or at infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfFramePolicy {
    /// Abort the run with `HotPixelOutOfBounds` or `ProjectionUndefined`.
    #[default]
    Reject,
    /// Leave the pixel unpatched and report it in the outcome.
    Skip,
}

/// Run-time options of a correction run
#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    /// Encoding of every TIFF the run writes
    pub output: TiffOutputConfig,
    /// Reject empty input images before any work is done
    pub validate_dimensions: bool,
    pub out_of_frame: OutOfFramePolicy,
    /// Also write both flat-frame images next to the corrected output
    pub write_flat_images: bool,
    /// File name of the corrected primary image, relative to the working directory
    pub output_name: String,
    /// Warp the two camera images concurrently
    pub parallel_roles: bool,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            output: TiffOutputConfig::default(),
            validate_dimensions: true,
            out_of_frame: OutOfFramePolicy::Reject,
            write_flat_images: false,
            output_name: "MasterCorrected.tif".to_string(),
            parallel_roles: true,
        }
    }
}

impl CorrectionConfig {
    pub fn builder() -> CorrectionConfigBuilder {
        CorrectionConfigBuilder::default()
    }
}

/// Builder for CorrectionConfig
#[derive(Default)]
pub struct CorrectionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    out_of_frame: Option<OutOfFramePolicy>,
    write_flat_images: Option<bool>,
    output_name: Option<String>,
    parallel_roles: Option<bool>,
}

impl CorrectionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn out_of_frame(mut self, policy: OutOfFramePolicy) -> Self {
        self.out_of_frame = Some(policy);
        self
    }

    pub fn write_flat_images(mut self, enable: bool) -> Self {
        self.write_flat_images = Some(enable);
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn parallel_roles(mut self, enable: bool) -> Self {
        self.parallel_roles = Some(enable);
        self
    }

    pub fn build(self) -> CorrectionConfig {
        let default = CorrectionConfig::default();
        CorrectionConfig {
            output: TiffOutputConfig {
                compression: self.compression.unwrap_or(default.output.compression),
                predictor: self.predictor.unwrap_or(default.output.predictor),
            },
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            out_of_frame: self.out_of_frame.unwrap_or(default.out_of_frame),
            write_flat_images: self.write_flat_images.unwrap_or(default.write_flat_images),
            output_name: self.output_name.unwrap_or(default.output_name),
            parallel_roles: self.parallel_roles.unwrap_or(default.parallel_roles),
        }
    }
}

/// Input files of a file-based run. Relative paths resolve against
/// `working_dir`.
#[derive(Debug, Clone)]
pub struct CorrectionRequest {
    pub working_dir: PathBuf,
    pub primary_image: PathBuf,
    pub secondary_image: PathBuf,
    pub config_file: PathBuf,
    /// Use this coordinate list instead of threshold detection
    pub hot_pixel_list: Option<PathBuf>,
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// Primary image with hot pixels replaced, in its original frame
    pub corrected: GrayImage,
    pub primary_flat: GrayImage,
    /// Secondary flat image after level adjustment; replacements come from here
    pub secondary_flat: GrayImage,
    /// Applied replacements, in detection order
    pub replacements: Vec<Replacement>,
    /// Hot pixels left untouched under [`OutOfFramePolicy::Skip`]
    pub skipped: Vec<FlatHotPixel>,
    pub timings: PipelineTimings,
}
