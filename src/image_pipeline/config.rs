//! Configuration module
//!
//! Parses the `name=value` calibration file and resolves it into typed
//! per-camera parameters.

pub mod calibration;
pub mod store;

pub use calibration::{Calibration, CalibrationPoint, CameraRole, CameraRoleConfig, Quad};
pub use store::ConfigStore;
