//! TIFF codec module
//!
//! The image file boundary of the pipeline: decoding TIFF files into
//! grayscale grids and encoding grids back to TIFF.

mod reader;
mod standard_tiff_writer;
mod tiff_reader;
mod writer;
pub mod types;


pub use reader::ImageReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use tiff_reader::TiffImageReader;
pub use types::{TiffCompression, TiffOutputConfig};
pub use writer::ImageWriter;
