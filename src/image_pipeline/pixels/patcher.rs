use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::hot_pixels::Replacement;
use crate::image_pipeline::raster::GrayImage;

/// New image equal to `original` except at the listed cells.
///
/// Entries apply in order, so the last value for a repeated coordinate wins.
/// Every coordinate is checked before anything is written; one out-of-bounds
/// entry fails the call and no image is produced. Values are clamped to the
/// image's bit depth.
pub fn patch(original: &GrayImage, entries: &[(PixelCoord, u16)]) -> Result<GrayImage> {
    let indices = entries
        .iter()
        .map(|&(coord, _)| original.index_of(coord))
        .collect::<Result<Vec<_>>>()?;

    let max = original.depth().max_value();
    let mut data = original.data().to_vec();
    for (idx, &(_, value)) in indices.into_iter().zip(entries) {
        data[idx] = value.min(max);
    }
    debug!("{} pixels patched", entries.len());
    Ok(original.with_data(data))
}

/// Writes each replacement value back at its hot pixel's original-frame
/// coordinate.
///
/// A coordinate outside `original` is `HotPixelOutOfBounds` naming the
/// hot pixel; nothing is written in that case.
pub fn apply_replacements(original: &GrayImage, replacements: &[Replacement]) -> Result<GrayImage> {
    for r in replacements {
        original
            .index_of(r.original.coord)
            .map_err(|e| e.at_hot_pixel("patch", r.original.coord))?;
    }
    let entries: Vec<(PixelCoord, u16)> = replacements
        .iter()
        .map(|r| (r.original.coord, r.value))
        .collect();
    patch(original, &entries)
}
