use std::io::Write;
use tracing::debug;
use ::tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use ::tiff::tags::Predictor;
use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::raster::{BitDepth, GrayImage};
use crate::image_pipeline::tiff::types::{TiffCompression, TiffOutputConfig};
use crate::image_pipeline::tiff::writer::ImageWriter;

/// Writes grayscale TIFFs at the grid's own bit depth.
pub struct StandardTiffWriter;

impl ImageWriter for StandardTiffWriter {
    fn write_image(&self, image: &GrayImage, output: &mut dyn Write, config: &TiffOutputConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{} ({}-bit)", image.width(), image.height(), image.depth().bits());

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| CorrectionError::Encode(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let (width, height) = (image.width() as u32, image.height() as u32);
        let written = match image.depth() {
            BitDepth::Eight => {
                let bytes: Vec<u8> = image.data().iter().map(|&v| v as u8).collect();
                encoder.write_image::<colortype::Gray8>(width, height, &bytes)
            }
            BitDepth::Sixteen => encoder.write_image::<colortype::Gray16>(width, height, image.data()),
        };
        written.map_err(|e| CorrectionError::Encode(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
