use nalgebra::Point2;
use rayon::prelude::*;

use crate::image_pipeline::raster::GrayImage;

/// Resamples `src` onto a canvas of the same size by inverse mapping.
///
/// `to_source` maps a destination pixel centre back into `src`; the nearest
/// source pixel is copied. Destination pixels that map outside `src`, or
/// nowhere, are black. Rows are processed in parallel.
pub(crate) fn warp_nearest<F>(src: &GrayImage, to_source: F) -> GrayImage
where
    F: Fn(Point2<f64>) -> Option<Point2<f64>> + Sync,
{
    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return src.clone();
    }

    let mut data = vec![0u16; width * height];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let Some(s) = to_source(Point2::new(x as f64, y as f64)) else {
                    continue;
                };
                let (sx, sy) = (s.x.round(), s.y.round());
                if sx.is_finite() && sy.is_finite() {
                    if let Some(v) = src.get(sx as i64, sy as i64) {
                        *out = v;
                    }
                }
            }
        });

    src.with_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::raster::BitDepth;

    #[test]
    fn test_shift_fills_black() {
        let src = GrayImage::from_fn(4, 3, BitDepth::Sixteen, |x, y| (1 + y * 4 + x) as u16);
        // Content moves one pixel right: dst(x, y) = src(x - 1, y).
        let out = warp_nearest(&src, |p| Some(Point2::new(p.x - 1.0, p.y)));
        assert_eq!(out.get(0, 0), Some(0));
        assert_eq!(out.get(1, 0), Some(1));
        assert_eq!(out.get(3, 2), Some(11));
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_unmapped_pixels_black() {
        let src = GrayImage::from_fn(3, 3, BitDepth::Eight, |_, _| 200);
        let out = warp_nearest(&src, |p| (p.x < 1.0).then_some(p));
        assert_eq!(out.data(), &[200, 0, 0, 200, 0, 0, 200, 0, 0]);
    }

    #[test]
    fn test_empty_image() {
        let src = GrayImage::new(0, 5, BitDepth::Sixteen);
        let out = warp_nearest(&src, Some);
        assert_eq!(out.data().len(), 0);
    }
}
