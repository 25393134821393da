//! Geometric transform module
//!
//! Builds the rotation + perspective transform that brings a camera's raw
//! image into the common flat frame, and applies it identically to rasters
//! and to point lists.

pub mod perspective;
pub mod rotation;
mod transform;
mod warp;

#[cfg(test)]
mod tests;

pub use perspective::{build_perspective, PerspectiveMatrix};
pub use rotation::{build_rotation, RotationMatrix};
pub use transform::{apply_to_image, apply_to_points, TransformPair};
