use crate::rect::{Axis, Rect};

/// Errors returned by grid construction and rectangle adjustment.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CropAdjustError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidImage { width: usize, height: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("rectangle {rect} has no area")]
    InvalidRectangle { rect: Rect },

    #[error("rectangle {rect} is outside the {width}x{height} grid")]
    OutOfBounds {
        rect: Rect,
        width: usize,
        height: usize,
    },

    #[error("{axis} edges of rectangle {rect} crossed while scanning")]
    BoundaryCollapse { rect: Rect, axis: Axis },
}

impl CropAdjustError {
    /// The rectangle the error refers to, if any.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            CropAdjustError::InvalidRectangle { rect }
            | CropAdjustError::OutOfBounds { rect, .. }
            | CropAdjustError::BoundaryCollapse { rect, .. } => Some(*rect),
            CropAdjustError::InvalidImage { .. } | CropAdjustError::InvalidBuffer { .. } => None,
        }
    }
}
