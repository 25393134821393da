use thiserror::Error;

use crate::image_pipeline::common::types::PixelCoord;

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("Malformed config line {line}: {reason}")]
    ConfigParse { line: usize, reason: String },

    #[error("Malformed hot pixel coordinate on line {line}: {reason}")]
    CoordinateParse { line: usize, reason: String },

    #[error("Missing required config parameter: {0}")]
    MissingParameter(String),

    #[error("Degenerate calibration quadrilateral: {0}")]
    DegenerateQuad(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Coordinate ({x}, {y}) lies outside the {width}x{height} canvas")]
    OutOfBounds { x: i64, y: i64, width: usize, height: usize },

    #[error("{stage}: hot pixel {original} needs ({x}, {y}), outside the {width}x{height} canvas")]
    HotPixelOutOfBounds {
        stage: &'static str,
        original: PixelCoord,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("Point ({x}, {y}) maps to infinity under the perspective transform")]
    ProjectionUndefined { x: f64, y: f64 },

    #[error("Failed to read input file: {0}")]
    InputRead(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),

    #[error("Failed to encode TIFF image: {0}")]
    Encode(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorrectionError {
    /// Ties a canvas `OutOfBounds` to the pipeline stage and the hot pixel
    /// (original-frame coordinate) that caused it. Other errors pass through.
    pub fn at_hot_pixel(self, stage: &'static str, original: PixelCoord) -> Self {
        match self {
            CorrectionError::OutOfBounds { x, y, width, height } => {
                CorrectionError::HotPixelOutOfBounds { stage, original, x, y, width, height }
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
