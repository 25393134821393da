//! Common utilities module
//!
//! This module contains the error taxonomy, coordinate types and stage timing
//! shared across the correction pipeline.

pub mod error;
pub mod timing;
pub mod types;

pub use error::{CorrectionError, Result};
pub use timing::{PipelineTimings, StageTiming, Timer};
pub use types::PixelCoord;
