use std::f64::consts::PI;

use tracing::info;

use crate::image_pipeline::raster::GrayImage;

/// Linear level mapping derived from brightness/contrast percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelAdjust {
    pub slope: f64,
    pub intercept: f64,
}

impl LevelAdjust {
    /// `brightness` and `contrast` are percentages in -100..100; 0/0 is the
    /// identity. Contrast sets the slope through `tan(pi * (c/100 + 1) / 4)`,
    /// brightness shifts the line while keeping mid-grey anchored.
    pub fn from_percent(brightness: f64, contrast: f64) -> Self {
        let slope = (PI * (contrast / 100.0 + 1.0) / 4.0).tan().max(0.0);
        let intercept = brightness / 100.0 + ((100.0 - brightness) / 200.0) * (1.0 - slope);
        Self { slope, intercept }
    }

    pub fn is_identity(&self) -> bool {
        (self.slope - 1.0).abs() < 1e-12 && self.intercept.abs() < 1e-12
    }

    fn map(&self, value: u16, max: f64) -> u16 {
        let normalized = f64::from(value) / max;
        let out = (self.slope * normalized + self.intercept).clamp(0.0, 1.0);
        (out * max).round() as u16
    }
}

/// New image with the level mapping applied to every sample, clamped to the
/// image's bit depth.
pub fn adjust_brightness_contrast(image: &GrayImage, brightness: f64, contrast: f64) -> GrayImage {
    let levels = LevelAdjust::from_percent(brightness, contrast);
    if levels.is_identity() {
        return image.clone();
    }
    info!(brightness, contrast, slope = levels.slope, intercept = levels.intercept, "Adjusting levels");

    let max = f64::from(image.depth().max_value());
    let data = image.data().iter().map(|&v| levels.map(v, max)).collect();
    image.with_data(data)
}
