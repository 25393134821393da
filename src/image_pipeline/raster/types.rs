//! Single-channel intensity grid types

use crate::image_pipeline::common::error::{CorrectionError, Result};
use crate::image_pipeline::common::types::PixelCoord;

/// Sample depth of a decoded grayscale image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    /// Largest representable intensity (white).
    pub fn max_value(self) -> u16 {
        match self {
            BitDepth::Eight => u8::MAX as u16,
            BitDepth::Sixteen => u16::MAX,
        }
    }
}

/// Immutable row-major grid of intensity samples.
///
/// Operations on a grid (warps, patches, level adjustments) always produce a
/// new grid; the samples are never mutated through a shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    depth: BitDepth,
    data: Vec<u16>,
}

impl GrayImage {
    /// Black canvas.
    pub fn new(width: usize, height: usize, depth: BitDepth) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![0; width * height],
        }
    }

    /// Wraps decoded samples. Values above the depth's maximum are clamped.
    pub fn from_data(width: usize, height: usize, depth: BitDepth, mut data: Vec<u16>) -> Result<Self> {
        if data.len() != width * height {
            return Err(CorrectionError::InvalidDimensions(width, height));
        }
        let max = depth.max_value();
        if max != u16::MAX {
            data.iter_mut().for_each(|v| *v = (*v).min(max));
        }
        Ok(Self { width, height, depth, data })
    }

    /// Builds a grid from wide samples, clamping each into the depth's range.
    pub fn from_samples_clamped(width: usize, height: usize, depth: BitDepth, samples: &[u32]) -> Result<Self> {
        let max = depth.max_value() as u32;
        let data = samples.iter().map(|&v| v.min(max) as u16).collect();
        Self::from_data(width, height, depth, data)
    }

    /// Grid with `f(x, y)` at each cell, clamped to the depth's range.
    pub fn from_fn(width: usize, height: usize, depth: BitDepth, f: impl Fn(usize, usize) -> u16) -> Self {
        let max = depth.max_value();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y).min(max));
            }
        }
        Self { width, height, depth, data }
    }

    pub(crate) fn from_raw_parts(width: usize, height: usize, depth: BitDepth, data: Vec<u16>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, depth, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn contains(&self, coord: PixelCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u64) < self.width as u64 && (coord.y as u64) < self.height as u64
    }

    /// Row-major index of `coord`, or `OutOfBounds`.
    pub fn index_of(&self, coord: PixelCoord) -> Result<usize> {
        if !self.contains(coord) {
            return Err(CorrectionError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(coord.y as usize * self.width + coord.x as usize)
    }

    /// Sample at `(x, y)`, `None` when outside the canvas.
    pub fn get(&self, x: i64, y: i64) -> Option<u16> {
        self.index_of(PixelCoord::new(x, y)).ok().map(|i| self.data[i])
    }

    /// Copy of this grid with the samples replaced by `data`.
    pub(crate) fn with_data(&self, data: Vec<u16>) -> Self {
        Self::from_raw_parts(self.width, self.height, self.depth, data)
    }
}
