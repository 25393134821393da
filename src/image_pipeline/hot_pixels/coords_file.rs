//! Hot pixel lists supplied as text instead of detected.
//!
//! One `x y` pair per line, whitespace separated. Lines starting with `#`
//! and blank lines are skipped. Coordinates may be fractional and are rounded
//! to the nearest pixel.

use std::path::Path;

use tracing::info;
use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::common::types::PixelCoord;
use crate::image_pipeline::hot_pixels::types::HotPixel;
use crate::image_pipeline::raster::GrayImage;

pub fn parse_coordinates(text: &str) -> Result<Vec<PixelCoord>> {
    let mut coords = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |reason: String| CorrectionError::CoordinateParse { line: idx + 1, reason };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [x, y] = fields[..] else {
            return Err(parse_error(format!("expected 'x y', got '{}'", line)));
        };
        let parse = |s: &str| -> Result<f64> {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| parse_error(format!("'{}' is not a number", s)))
        };
        let (x, y) = (parse(x)?, parse(y)?);
        coords.push(PixelCoord::new(x.round() as i64, y.round() as i64));
    }
    Ok(coords)
}

/// Reads a coordinate list and pairs each entry with its value in `image`.
///
/// Entries keep file order. A coordinate outside `image` is `OutOfBounds`.
pub fn load_hot_pixels<P: AsRef<Path>>(path: P, image: &GrayImage) -> Result<Vec<HotPixel>> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading hot pixel list");
    let text = std::fs::read_to_string(path)
        .map_err(|e| CorrectionError::InputRead(format!("{}: {}", path.display(), e)))?;

    let hot = parse_coordinates(&text)?
        .into_iter()
        .map(|coord| -> Result<HotPixel> {
            let idx = image.index_of(coord)?;
            Ok(HotPixel { coord, value: image.data()[idx] })
        })
        .collect::<Result<Vec<_>>>()?;
    info!("{} hot pixels listed", hot.len());
    Ok(hot)
}
