//! TIFF decoding into single-channel grids.
//!
//! Grayscale images are read as-is. Colour images are reduced to their first
//! (red) channel.

use std::io::Cursor;

use tracing::{debug, warn};
use ::tiff::decoder::{Decoder, DecodingResult};
use ::tiff::ColorType;
use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::raster::{BitDepth, GrayImage};
use crate::image_pipeline::tiff::reader::ImageReader;

pub struct TiffImageReader;

impl ImageReader for TiffImageReader {
    fn read_image(&self, data: &[u8]) -> Result<GrayImage> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| CorrectionError::ImageDecode(e.to_string()))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| CorrectionError::ImageDecode(e.to_string()))?;
        let colortype = decoder
            .colortype()
            .map_err(|e| CorrectionError::ImageDecode(e.to_string()))?;

        let channels = match colortype {
            ColorType::Gray(8) | ColorType::Gray(16) => 1,
            ColorType::RGB(8) | ColorType::RGB(16) => {
                warn!("Colour TIFF, keeping the red channel only");
                3
            }
            ColorType::RGBA(8) | ColorType::RGBA(16) => {
                warn!("Colour TIFF, keeping the red channel only");
                4
            }
            other => {
                return Err(CorrectionError::UnsupportedFormat(format!("{:?}", other)));
            }
        };

        let (width, height) = (width as usize, height as usize);
        let image = match decoder
            .read_image()
            .map_err(|e| CorrectionError::ImageDecode(e.to_string()))?
        {
            DecodingResult::U8(values) => {
                let samples = first_channel(&values, channels).map(u16::from).collect();
                GrayImage::from_data(width, height, BitDepth::Eight, samples)?
            }
            DecodingResult::U16(values) => {
                let samples = first_channel(&values, channels).collect();
                GrayImage::from_data(width, height, BitDepth::Sixteen, samples)?
            }
            _ => {
                return Err(CorrectionError::UnsupportedFormat(format!(
                    "{:?} sample format",
                    colortype
                )));
            }
        };

        debug!("Decoded image: {}x{} ({}-bit)", width, height, image.depth().bits());
        Ok(image)
    }
}

fn first_channel<T: Copy>(values: &[T], channels: usize) -> impl Iterator<Item = T> + '_ {
    values.iter().step_by(channels).copied()
}
