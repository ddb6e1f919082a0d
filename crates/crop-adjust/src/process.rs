//! `image` crate integration and file-level batch processing.

use std::path::Path;

use ::image::{DynamicImage, ImageReader, RgbImage, RgbaImage};
use log::{info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::core::{
    image_to_grid, load_rect_list, CropAdjustError, CropAdjustIoError, CropAdjuster, CropReport,
    InterleavedRgb, ParamsError, PixelGrid,
};

/// Errors produced by the file-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] CropAdjustIoError),

    #[error(transparent)]
    Grid(#[from] CropAdjustError),

    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Convert an `image::RgbImage` into an intensity grid.
pub fn grid_from_rgb8(img: &RgbImage) -> Result<PixelGrid, CropAdjustError> {
    let src = InterleavedRgb::rgb(img.width() as usize, img.height() as usize, img.as_raw())?;
    image_to_grid(&src)
}

/// Convert an `image::RgbaImage` into an intensity grid; alpha is ignored.
pub fn grid_from_rgba8(img: &RgbaImage) -> Result<PixelGrid, CropAdjustError> {
    let src = InterleavedRgb::rgba(img.width() as usize, img.height() as usize, img.as_raw())?;
    image_to_grid(&src)
}

/// Convert any decoded image into an intensity grid.
///
/// Goes through 8-bit RGB so the same luminance weights apply whatever the
/// source color type.
pub fn grid_from_image(img: &DynamicImage) -> Result<PixelGrid, CropAdjustError> {
    match img {
        DynamicImage::ImageRgb8(rgb) => grid_from_rgb8(rgb),
        DynamicImage::ImageRgba8(rgba) => grid_from_rgba8(rgba),
        other => grid_from_rgb8(&other.to_rgb8()),
    }
}

/// Decode an image file and convert it into an intensity grid.
pub fn load_grid(path: impl AsRef<Path>) -> Result<PixelGrid, ProcessError> {
    let img = ImageReader::open(path.as_ref())
        .map_err(::image::ImageError::IoError)?
        .with_guessed_format()
        .map_err(::image::ImageError::IoError)?
        .decode()?;
    Ok(grid_from_image(&img)?)
}

/// Adjust every rectangle listed in `rects_path` against `image_path`.
///
/// Individual rectangle failures are recorded in the report; only unreadable
/// inputs fail the whole call.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(image = %image_path.as_ref().display()))
)]
pub fn process_image_file(
    image_path: impl AsRef<Path>,
    rects_path: impl AsRef<Path>,
    adjuster: &CropAdjuster,
) -> Result<CropReport, ProcessError> {
    let image_path = image_path.as_ref();
    let grid = load_grid(image_path)?;
    let rects = load_rect_list(rects_path)?;
    info!(
        "{}: {}x{} grid, {} rectangles",
        image_path.display(),
        grid.width(),
        grid.height(),
        rects.len()
    );

    let mut report = CropReport::new(image_path.to_string_lossy(), *adjuster.params());
    for (given, outcome) in rects.iter().zip(adjuster.fix_rects(&grid, &rects)) {
        if let Err(err) = &outcome {
            warn!("{given}: {err}");
        }
        report.push(*given, outcome);
    }
    Ok(report)
}
