//! Snap approximate bounding boxes to dark content on a grayscale grid.
//!
//! Given an intensity grid and a rough rectangle around dark content (text
//! on a lighter page, for example), [`CropAdjuster::fix_rect`] moves each edge
//! to the boundary between content and background lines and then pads the
//! result by a proportional margin.
//!
//! This crate does no image decoding. Feed it a [`PixelGrid`] built from raw
//! bytes, or any [`RgbSource`] through [`image_to_grid`]; the `crop-adjust`
//! facade crate adapts `image` buffers.
//!
//! ```
//! use crop_adjust_core::{CropAdjustParams, CropAdjuster, PixelGrid, Rect};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = PixelGrid::from_fn(120, 60, |x, y| {
//!     if (20..100).contains(&x) && (20..40).contains(&y) { 0 } else { 255 }
//! })?;
//! let params = CropAdjustParams::default()
//!     .with_threshold(0.5)?
//!     .with_expand_ratio(0.0)?;
//! let adjuster = CropAdjuster::new(params)?;
//!
//! // the left, top and bottom edges reach the block; the right edge stops
//! // after `search_range` columns
//! let fixed = adjuster.fix_rect(&grid, Rect::new(24, 24, 30, 12))?;
//! assert_eq!(fixed, Rect::new(20, 20, 54, 20));
//! # Ok(())
//! # }
//! ```

mod dark;
mod engine;
mod error;
mod expand;
mod grid;
mod io;
mod logger;
mod params;
mod rect;
mod scan;

pub use dark::{dark_rate, estimate_dark_reference, Line, DARK_CLUSTER_SIZE};
pub use engine::{BatchFix, BatchIter, CropAdjuster};
pub use error::CropAdjustError;
pub use expand::{expand_rect, margin};
pub use grid::{image_to_grid, luminance, InterleavedRgb, PixelGrid, RgbSource};
pub use io::{
    format_rect_list, load_rect_list, parse_rect_list, CropAdjustConfig, CropAdjustIoError,
    CropReport, CropReportEntry, RectListError,
};
pub use params::{CropAdjustParams, ParamsError};
pub use rect::{Axis, Edge, Rect};
pub use scan::{skip_step, BoundaryScanner, SKIP_STEP_DIVISOR};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
