//! Rectangle adjustment pipeline.
//!
//! `fix_rect` validates the rectangle, estimates its dark reference, snaps the
//! four edges and pads the result. The adjuster holds only an immutable
//! parameter snapshot, so one instance can serve any number of grids and
//! threads.

use log::{debug, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::dark::estimate_dark_reference;
use crate::error::CropAdjustError;
use crate::expand::expand_rect;
use crate::grid::PixelGrid;
use crate::params::{CropAdjustParams, ParamsError};
use crate::rect::{Axis, Rect};
use crate::scan::{skip_step, BoundaryScanner};

/// Snaps approximate rectangles to dark content.
#[derive(Clone, Debug, Default)]
pub struct CropAdjuster {
    params: CropAdjustParams,
}

impl CropAdjuster {
    pub fn new(params: CropAdjustParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CropAdjustParams {
        &self.params
    }

    /// New adjuster with different parameters; `self` is left untouched.
    pub fn with_params(&self, params: CropAdjustParams) -> Result<Self, ParamsError> {
        Self::new(params)
    }

    /// Adjust `rect` and apply the expansion margin.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, grid, rect), fields(rect = %rect))
    )]
    pub fn fix_rect(&self, grid: &PixelGrid, rect: Rect) -> Result<Rect, CropAdjustError> {
        let scanned = self.scan_rect(grid, rect)?;
        let fixed = expand_rect(
            &scanned,
            self.params.expand_ratio,
            grid.width(),
            grid.height(),
        )?;
        debug!("fixed {rect} -> {scanned} -> {fixed}");
        Ok(fixed)
    }

    /// Tuple form of [`CropAdjuster::fix_rect`].
    pub fn fix_rect_xywh(
        &self,
        grid: &PixelGrid,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(i32, i32, i32, i32), CropAdjustError> {
        self.fix_rect(grid, Rect::new(x, y, w, h))
            .map(|r| r.as_tuple())
    }

    /// Snap the edges of `rect` without applying the margin.
    ///
    /// An axis whose edges cross during the scan keeps its original span.
    pub fn scan_rect(&self, grid: &PixelGrid, rect: Rect) -> Result<Rect, CropAdjustError> {
        if rect.is_empty() {
            return Err(CropAdjustError::InvalidRectangle { rect });
        }
        if !rect.fits_within(grid.width(), grid.height()) {
            return Err(CropAdjustError::OutOfBounds {
                rect,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let dark = estimate_dark_reference(grid, &rect)?;
        let step = skip_step(rect.width);
        debug!("{rect}: dark reference {dark}, skip step {step}");

        let scanner = BoundaryScanner::new(grid, rect, dark, self.params, step);
        let mut scanned = rect;
        for axis in [Axis::Vertical, Axis::Horizontal] {
            match scanner.scan_axis(axis) {
                Ok(r) => scanned = scanned.with_span(axis, r.start(axis), r.extent(axis)),
                Err(err @ CropAdjustError::BoundaryCollapse { .. }) => {
                    warn!("{err}; keeping original {axis} span");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(scanned)
    }

    /// Lazily adjust `rects` in order. The batch can be iterated repeatedly.
    pub fn fix_rects<'a>(&'a self, grid: &'a PixelGrid, rects: &'a [Rect]) -> BatchFix<'a> {
        BatchFix {
            adjuster: self,
            grid,
            rects,
        }
    }
}

/// Ordered, restartable batch of rectangles against one grid.
#[derive(Clone, Copy, Debug)]
pub struct BatchFix<'a> {
    adjuster: &'a CropAdjuster,
    grid: &'a PixelGrid,
    rects: &'a [Rect],
}

impl<'a> BatchFix<'a> {
    pub fn iter(&self) -> BatchIter<'a> {
        BatchIter {
            adjuster: self.adjuster,
            grid: self.grid,
            rects: self.rects.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Input rectangles, in processing order.
    pub fn inputs(&self) -> &'a [Rect] {
        self.rects
    }
}

impl<'a> IntoIterator for BatchFix<'a> {
    type Item = Result<Rect, CropAdjustError>;
    type IntoIter = BatchIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &BatchFix<'a> {
    type Item = Result<Rect, CropAdjustError>;
    type IntoIter = BatchIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`BatchFix`]. One failure does not stop the iteration.
#[derive(Clone, Debug)]
pub struct BatchIter<'a> {
    adjuster: &'a CropAdjuster,
    grid: &'a PixelGrid,
    rects: std::slice::Iter<'a, Rect>,
}

impl Iterator for BatchIter<'_> {
    type Item = Result<Rect, CropAdjustError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rect = *self.rects.next()?;
        Some(self.adjuster.fix_rect(self.grid, rect))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rects.size_hint()
    }
}

impl ExactSizeIterator for BatchIter<'_> {}
