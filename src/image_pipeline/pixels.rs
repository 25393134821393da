//! Pixel value access module
//!
//! Reads values at coordinates, writes replacement values back, and adjusts
//! image levels.

pub mod adjust;
pub mod patcher;
pub mod sampler;

pub use adjust::{adjust_brightness_contrast, LevelAdjust};
pub use patcher::{apply_replacements, patch};
pub use sampler::{sample_at, sample_replacements};
