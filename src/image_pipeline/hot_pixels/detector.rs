use tracing::{debug, info};
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::hot_pixels::types::HotPixel;
use crate::image_pipeline::raster::GrayImage;

/// Returns every pixel whose intensity is `>= threshold`, in raster order
/// (top-to-bottom, left-to-right).
///
/// The threshold is not clamped to the image's bit depth: a threshold above
/// the depth's maximum yields nothing, one at or below zero yields every pixel.
pub fn detect(image: &GrayImage, threshold: f64) -> Vec<HotPixel> {
    info!(
        width = image.width(),
        height = image.height(),
        threshold,
        "Looking for hot pixels"
    );

    let width = image.width();
    let hot: Vec<HotPixel> = image
        .data()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| f64::from(v) >= threshold)
        .map(|(i, &value)| HotPixel {
            coord: PixelCoord::new((i % width) as i64, (i / width) as i64),
            value,
        })
        .collect();

    debug!(first = ?hot.first(), last = ?hot.last(), "Detection bounds");
    info!("{} hot pixels found", hot.len());
    hot
}
