use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::GrayImage;
use crate::image_pipeline::tiff::types::TiffOutputConfig;

pub trait ImageWriter {
    fn write_image(&self, image: &GrayImage, output: &mut dyn Write, config: &TiffOutputConfig) -> Result<()>;
}
