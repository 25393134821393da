//! Hot pixel record types
//!
//! A hot pixel moves through the pipeline as one record that gains
//! information at each stage, so the original-frame coordinate, its
//! flat-frame counterpart and the replacement value can never drift apart.

use crate::image_pipeline::common::types::PixelCoord;

/// Defective pixel found in the primary image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotPixel {
    /// Position in the primary image's own (untransformed) frame.
    pub coord: PixelCoord,
    /// Intensity observed at `coord`.
    pub value: u16,
}

/// Hot pixel with its location in the common flat frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatHotPixel {
    pub original: HotPixel,
    /// `None` when the perspective transform sends the pixel to infinity.
    pub flat: Option<PixelCoord>,
}

/// Hot pixel with the value sampled for it from the secondary flat image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub original: HotPixel,
    pub flat: PixelCoord,
    pub value: u16,
}
