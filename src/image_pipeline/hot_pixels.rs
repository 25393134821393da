//! Hot pixel detection module
//!
//! Finds defective pixels in the primary image, or reads them from a
//! coordinate list, and defines the records that carry them through the
//! pipeline.

pub mod coords_file;
pub mod detector;
pub mod types;

pub use coords_file::{load_hot_pixels, parse_coordinates};
pub use detector::detect;
pub use types::{FlatHotPixel, HotPixel, Replacement};
