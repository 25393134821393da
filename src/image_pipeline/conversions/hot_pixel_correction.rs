use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::image_pipeline::{
    common::error::{CorrectionError, Result},
    common::timing::PipelineTimings,
    config::{Calibration, CameraRole, ConfigStore},
    conversions::types::{CorrectionConfig, CorrectionOutcome, CorrectionRequest, OutOfFramePolicy},
    geometry::TransformPair,
    hot_pixels::{self, FlatHotPixel, HotPixel},
    pixels,
    raster::GrayImage,
    tiff::{ImageReader, ImageWriter, StandardTiffWriter, TiffImageReader},
};

/// Replaces hot pixels of a primary camera image with values taken from a
/// co-registered secondary camera image.
///
/// Stages run strictly in order and any failure aborts the run before
/// anything is written:
/// detect, transform images, transform points, sample, patch.
pub struct HotPixelCorrectionPipeline<R: ImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: CorrectionConfig,
}

impl HotPixelCorrectionPipeline<TiffImageReader, StandardTiffWriter> {
    pub fn new(config: CorrectionConfig) -> Self {
        Self {
            reader: TiffImageReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<R: ImageReader, W: ImageWriter> HotPixelCorrectionPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: CorrectionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, image: &GrayImage) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if image.width() == 0 || image.height() == 0 {
            return Err(CorrectionError::InvalidDimensions(image.width(), image.height()));
        }

        Ok(())
    }

    /// Detects hot pixels in `primary` with the calibrated threshold, then
    /// runs [`correct_with`](Self::correct_with).
    #[instrument(skip_all, fields(threshold = calibration.hot_pixel_threshold))]
    pub fn correct(
        &self,
        primary: &GrayImage,
        secondary: &GrayImage,
        calibration: &Calibration,
    ) -> Result<CorrectionOutcome> {
        let mut timings = PipelineTimings::new();
        let hot = {
            let _span = tracing::info_span!("detect_hot_pixels").entered();
            timings.time("detect", || hot_pixels::detect(primary, calibration.hot_pixel_threshold))
        };
        self.run(primary, secondary, calibration, hot, timings)
    }

    /// Replaces the given hot pixels. Their coordinates are in `primary`'s
    /// own frame.
    #[instrument(skip_all, fields(hot_pixels = hot.len()))]
    pub fn correct_with(
        &self,
        primary: &GrayImage,
        secondary: &GrayImage,
        calibration: &Calibration,
        hot: Vec<HotPixel>,
    ) -> Result<CorrectionOutcome> {
        self.run(primary, secondary, calibration, hot, PipelineTimings::new())
    }

    fn run(
        &self,
        primary: &GrayImage,
        secondary: &GrayImage,
        calibration: &Calibration,
        hot: Vec<HotPixel>,
        mut timings: PipelineTimings,
    ) -> Result<CorrectionOutcome> {
        info!("Starting hot pixel correction");

        {
            let _span = tracing::info_span!("validate_dimensions",
                primary_width = primary.width(),
                primary_height = primary.height(),
                secondary_width = secondary.width(),
                secondary_height = secondary.height()
            ).entered();
            self.validate_dimensions(primary)?;
            self.validate_dimensions(secondary)?;
        }

        let (primary_pair, secondary_pair) = {
            let _span = tracing::info_span!("build_transforms").entered();
            timings.time("build_transforms", || -> Result<_> {
                Ok((
                    TransformPair::from_config(calibration.role(CameraRole::Primary))?,
                    TransformPair::from_config(calibration.role(CameraRole::Secondary))?,
                ))
            })?
        };

        let (primary_flat, secondary_flat) = {
            let _span = tracing::info_span!("transform_images", parallel = self.config.parallel_roles).entered();
            timings.time("transform_images", || {
                if self.config.parallel_roles {
                    rayon::join(
                        || primary_pair.apply_to_image(primary),
                        || secondary_pair.apply_to_image(secondary),
                    )
                } else {
                    (primary_pair.apply_to_image(primary), secondary_pair.apply_to_image(secondary))
                }
            })
        };
        let (primary_flat, secondary_flat) = (primary_flat?, secondary_flat?);

        let secondary_flat = {
            let _span = tracing::info_span!("adjust_levels").entered();
            timings.time("adjust_levels", || {
                pixels::adjust_brightness_contrast(
                    &secondary_flat,
                    calibration.secondary_brightness,
                    calibration.secondary_contrast,
                )
            })
        };

        let located = {
            let _span = tracing::info_span!("transform_points").entered();
            timings.time("transform_points", || primary_pair.locate_hot_pixels(&hot))
        };

        let (located, skipped) = self.apply_out_of_frame_policy(located, &secondary_flat);

        let replacements = {
            let _span = tracing::info_span!("sample_values", count = located.len()).entered();
            timings.time("sample", || pixels::sample_replacements(&secondary_flat, &located))?
        };

        let corrected = {
            let _span = tracing::info_span!("patch_primary", count = replacements.len()).entered();
            timings.time("patch", || pixels::apply_replacements(primary, &replacements))?
        };

        info!(
            replaced = replacements.len(),
            skipped = skipped.len(),
            "Correction complete"
        );
        timings.log_summary();

        Ok(CorrectionOutcome {
            corrected,
            primary_flat,
            secondary_flat,
            replacements,
            skipped,
            timings,
        })
    }

    fn apply_out_of_frame_policy(
        &self,
        located: Vec<FlatHotPixel>,
        secondary_flat: &GrayImage,
    ) -> (Vec<FlatHotPixel>, Vec<FlatHotPixel>) {
        match self.config.out_of_frame {
            OutOfFramePolicy::Reject => (located, Vec::new()),
            OutOfFramePolicy::Skip => {
                let (inside, outside): (Vec<_>, Vec<_>) = located
                    .into_iter()
                    .partition(|h| h.flat.is_some_and(|flat| secondary_flat.contains(flat)));
                if !outside.is_empty() {
                    warn!("{} hot pixels fall outside the secondary image and stay unpatched", outside.len());
                }
                (inside, outside)
            }
        }
    }

    /// Reads the request's files, corrects the primary image and writes the
    /// result (and optionally the flat images) into the working directory.
    ///
    /// Output files are only created once every stage has succeeded.
    #[instrument(skip(self, request), fields(dir = %request.working_dir.display()))]
    pub fn correct_files(&self, request: &CorrectionRequest) -> Result<CorrectionOutcome> {
        let dir = &request.working_dir;
        info!(
            primary = %request.primary_image.display(),
            secondary = %request.secondary_image.display(),
            config = %request.config_file.display(),
            "Correcting files"
        );

        let calibration = {
            let _span = tracing::info_span!("load_config").entered();
            let store = ConfigStore::load(dir.join(&request.config_file))?;
            Calibration::from_store(&store)?
        };

        let primary = self.read_file(&dir.join(&request.primary_image))?;
        let secondary = self.read_file(&dir.join(&request.secondary_image))?;

        let outcome = match &request.hot_pixel_list {
            Some(list) => {
                let hot = hot_pixels::load_hot_pixels(dir.join(list), &primary)?;
                self.correct_with(&primary, &secondary, &calibration, hot)?
            }
            None => self.correct(&primary, &secondary, &calibration)?,
        };

        let mut outputs = vec![(self.config.output_name.clone(), &outcome.corrected)];
        if self.config.write_flat_images {
            outputs.push((flat_name(CameraRole::Primary), &outcome.primary_flat));
            outputs.push((flat_name(CameraRole::Secondary), &outcome.secondary_flat));
        }
        self.write_outputs(dir, &outputs)?;

        Ok(outcome)
    }

    fn read_file(&self, path: &Path) -> Result<GrayImage> {
        let _span = tracing::info_span!("read_image", path = %path.display()).entered();
        let bytes = std::fs::read(path).map_err(|e| {
            CorrectionError::InputRead(format!("{}: {}", path.display(), e))
        })?;
        self.reader.read_image(&bytes)
    }

    /// Encodes every image in memory, stages each one in a temporary file
    /// inside `dir`, then renames them all into place. An encode or staging
    /// failure leaves no output file behind.
    fn write_outputs(&self, dir: &Path, outputs: &[(String, &GrayImage)]) -> Result<()> {
        let _span = tracing::info_span!("write_outputs", count = outputs.len()).entered();

        let mut encoded = Vec::with_capacity(outputs.len());
        for (name, image) in outputs {
            let mut buffer = Vec::new();
            self.writer.write_image(image, &mut buffer, &self.config.output)?;
            encoded.push((dir.join(name), buffer));
        }

        let output_error = |path: &Path, e: &dyn std::fmt::Display| {
            CorrectionError::OutputWrite(format!("{}: {}", path.display(), e))
        };
        let mut staged = Vec::with_capacity(encoded.len());
        for (path, buffer) in encoded {
            let mut temp = NamedTempFile::new_in(dir).map_err(|e| output_error(&path, &e))?;
            temp.write_all(&buffer).map_err(|e| output_error(&path, &e))?;
            staged.push((path, temp));
        }

        for (path, temp) in staged {
            temp.persist(&path).map_err(|e| output_error(&path, &e.error))?;
            info!(path = %path.display(), "Wrote image");
        }
        Ok(())
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CorrectionConfig) {
        self.config = config;
    }
}

/// File name of a role's flat-frame image.
pub fn flat_name(role: CameraRole) -> String {
    format!("{}Flat.tif", role.config_prefix())
}
