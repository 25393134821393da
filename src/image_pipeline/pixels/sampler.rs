use tracing::debug;

use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::hot_pixels::{FlatHotPixel, Replacement};
use crate::image_pipeline::raster::GrayImage;

/// Reads the intensity at each coordinate, in input order.
///
/// Any coordinate outside the canvas fails the whole call with `OutOfBounds`.
pub fn sample_at(image: &GrayImage, points: &[PixelCoord]) -> Result<Vec<u16>> {
    let data = image.data();
    let values = points
        .iter()
        .map(|&p| image.index_of(p).map(|i| data[i]))
        .collect::<Result<Vec<_>>>()?;
    debug!("{} samples read", values.len());
    Ok(values)
}

/// Samples each hot pixel's flat-frame coordinate and keeps the result on
/// the same record.
///
/// A flat coordinate outside `image` is `HotPixelOutOfBounds` naming the
/// hot pixel; one with no flat position is `ProjectionUndefined`.
pub fn sample_replacements(image: &GrayImage, hot: &[FlatHotPixel]) -> Result<Vec<Replacement>> {
    let data = image.data();
    let replacements = hot
        .iter()
        .map(|h| -> Result<Replacement> {
            let coord = h.original.coord;
            let flat = h.flat.ok_or(CorrectionError::ProjectionUndefined {
                x: coord.x as f64,
                y: coord.y as f64,
            })?;
            let idx = image
                .index_of(flat)
                .map_err(|e| e.at_hot_pixel("sample", coord))?;
            Ok(Replacement { original: h.original, flat, value: data[idx] })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("{} replacement values sampled", replacements.len());
    Ok(replacements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::hot_pixels::HotPixel;
    use crate::image_pipeline::raster::BitDepth;

    fn image() -> GrayImage {
        GrayImage::from_fn(5, 4, BitDepth::Sixteen, |x, y| (100 * y + x) as u16)
    }

    #[test]
    fn test_values_in_input_order() {
        let pts = [PixelCoord::new(4, 3), PixelCoord::new(0, 0), PixelCoord::new(2, 1), PixelCoord::new(4, 3)];
        assert_eq!(sample_at(&image(), &pts).unwrap(), vec![304, 0, 102, 304]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        for p in [PixelCoord::new(-1, 0), PixelCoord::new(0, -1), PixelCoord::new(5, 0), PixelCoord::new(0, 4)] {
            let err = sample_at(&image(), &[PixelCoord::new(1, 1), p]).unwrap_err();
            assert!(matches!(err, CorrectionError::OutOfBounds { x, y, width: 5, height: 4 } if x == p.x && y == p.y));
        }
    }

    #[test]
    fn test_replacements_keep_original_coordinates() {
        let hot = [
            FlatHotPixel {
                original: HotPixel { coord: PixelCoord::new(9, 9), value: 65535 },
                flat: Some(PixelCoord::new(1, 2)),
            },
            FlatHotPixel {
                original: HotPixel { coord: PixelCoord::new(7, 0), value: 65000 },
                flat: Some(PixelCoord::new(3, 0)),
            },
        ];
        let out = sample_replacements(&image(), &hot).unwrap();
        assert_eq!(out[0].original.coord, PixelCoord::new(9, 9));
        assert_eq!(out[0].value, 201);
        assert_eq!(out[1].original.coord, PixelCoord::new(7, 0));
        assert_eq!(out[1].flat, PixelCoord::new(3, 0));
        assert_eq!(out[1].value, 3);
    }

    #[test]
    fn test_out_of_frame_names_stage_and_hot_pixel() {
        let hot = [FlatHotPixel {
            original: HotPixel { coord: PixelCoord::new(8, 1), value: 65535 },
            flat: Some(PixelCoord::new(6, 1)),
        }];
        let err = sample_replacements(&image(), &hot).unwrap_err();
        assert!(matches!(
            err,
            CorrectionError::HotPixelOutOfBounds { stage: "sample", original, x: 6, y: 1, width: 5, height: 4 }
                if original == PixelCoord::new(8, 1)
        ));
        let message = err.to_string();
        assert!(message.contains("sample"));
        assert!(message.contains("(8, 1)"));
    }

    #[test]
    fn test_missing_flat_position_is_projection_error() {
        let hot = [FlatHotPixel {
            original: HotPixel { coord: PixelCoord::new(2, 3), value: 65535 },
            flat: None,
        }];
        let err = sample_replacements(&image(), &hot).unwrap_err();
        assert!(matches!(err, CorrectionError::ProjectionUndefined { x, y } if x == 2.0 && y == 3.0));
    }
}
