//! Adjust rectangles around dark text/objects in images.
//!
//! This crate provides:
//! - re-exports of `crop-adjust-core` (grid, scanner, adjuster, I/O types)
//! - (feature `image`) conversion of `image` crate buffers into a
//!   [`PixelGrid`] and an end-to-end helper that runs a rectangle list file
//!   against an image file
//! - (feature `cli`) the `crop-adjust` command-line tool
//!
//! ## Quickstart
//!
//! ```no_run
//! use crop_adjust::process::load_grid;
//! use crop_adjust::{CropAdjustParams, CropAdjuster, Rect};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = load_grid("samples/03.jpg")?;
//! let adjuster = CropAdjuster::new(CropAdjustParams::default())?;
//! let fixed = adjuster.fix_rect(&grid, Rect::new(190, 125, 172, 31))?;
//! println!("adjusted rectangle: {fixed}");
//! # Ok(())
//! # }
//! ```

pub use crop_adjust_core as core;

pub use crop_adjust_core::{
    CropAdjustConfig, CropAdjustError, CropAdjustParams, CropAdjuster, CropReport, PixelGrid,
    Rect,
};

#[cfg(feature = "image")]
pub mod process;
