//! Decoded image representation
//!
//! Every stage of the pipeline exchanges single-channel grids of 8 or 16-bit
//! intensity samples.

pub mod types;

pub use types::{BitDepth, GrayImage};
