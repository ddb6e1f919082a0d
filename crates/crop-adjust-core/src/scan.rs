//! Edge snapping.
//!
//! Every edge runs the same probe loop, parametrized by the [`Edge`]
//! descriptor: the axis it moves along, its outward sign, and the orientation
//! of the lines it probes (rows for top/bottom, columns for left/right).
//!
//! An edge first walks outward while the probed lines are content. If the
//! very first outward probe is background (or there is no room to probe), it
//! checks its own line; a background edge line retracts inward until the
//! first content line. Both walks stop after `search_range` rows/columns or at
//! the grid border.

use log::{debug, trace};

use crate::dark::{dark_rate, Line};
use crate::error::CropAdjustError;
use crate::grid::PixelGrid;
use crate::params::CropAdjustParams;
use crate::rect::{Axis, Edge, Rect};

/// Columns of rectangle width per skipped row.
pub const SKIP_STEP_DIVISOR: i32 = 40;

/// Row stride for a rectangle of the given width, at least 1.
pub fn skip_step(width: i32) -> usize {
    (width / SKIP_STEP_DIVISOR).max(1) as usize
}

/// Probes lines around a fixed rectangle against one dark reference.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryScanner<'a> {
    grid: &'a PixelGrid,
    rect: Rect,
    dark: u8,
    params: CropAdjustParams,
    skip_step: usize,
}

impl<'a> BoundaryScanner<'a> {
    /// `rect` fixes both the starting edges and the span of every probed line.
    pub fn new(
        grid: &'a PixelGrid,
        rect: Rect,
        dark: u8,
        params: CropAdjustParams,
        skip_step: usize,
    ) -> Self {
        Self {
            grid,
            rect,
            dark,
            params,
            skip_step: skip_step.max(1),
        }
    }

    /// Dark rate of the line at `index` perpendicular to `edge`'s axis.
    pub fn line_rate(&self, edge: Edge, index: i32) -> f32 {
        let span = edge.axis().other();
        let start = self.rect.start(span);
        let end = start + self.rect.extent(span);
        let line = match edge.axis() {
            Axis::Vertical => Line::row(index, start, end),
            Axis::Horizontal => Line::column(index, start, end),
        };
        dark_rate(self.grid, &line, self.dark, self.params.tolerance)
    }

    /// A line is content when it has dark pixels and reaches the threshold.
    fn is_content(&self, edge: Edge, index: i32) -> bool {
        let rate = self.line_rate(edge, index);
        let content = rate > 0.0 && rate >= self.params.threshold;
        trace!("{edge} probe {index}: rate={rate:.3} content={content}");
        content
    }

    fn stride(&self, edge: Edge) -> i32 {
        match edge.axis() {
            Axis::Vertical => self.skip_step as i32,
            Axis::Horizontal => 1,
        }
    }

    fn in_grid(&self, axis: Axis, index: i32) -> bool {
        let len = match axis {
            Axis::Horizontal => self.grid.width(),
            Axis::Vertical => self.grid.height(),
        };
        index >= 0 && (index as i64) < len as i64
    }

    /// Settled line index (inclusive) for `edge`.
    pub fn scan_edge(&self, edge: Edge) -> i32 {
        let origin = edge.line_of(&self.rect);
        let stride = self.stride(edge);
        let range = i32::try_from(self.params.search_range).unwrap_or(i32::MAX);
        let max_steps = range / stride;
        let outward = edge.outward() * stride;

        let mut pos = origin;
        for step in 1..=max_steps {
            let candidate = origin + outward * step;
            if !self.in_grid(edge.axis(), candidate) || !self.is_content(edge, candidate) {
                break;
            }
            pos = candidate;
        }
        if pos != origin {
            debug!("{edge} edge grew {origin} -> {pos}");
            return pos;
        }

        if self.is_content(edge, origin) {
            return origin;
        }

        for step in 1..=max_steps {
            let candidate = origin - outward * step;
            if !self.in_grid(edge.axis(), candidate) {
                break;
            }
            pos = candidate;
            if self.is_content(edge, candidate) {
                break;
            }
        }
        debug!("{edge} edge retracted {origin} -> {pos}");
        pos
    }

    /// Snap both edges along `axis` and return the rectangle with that span replaced.
    ///
    /// Fails with [`CropAdjustError::BoundaryCollapse`] when the two edges cross.
    pub fn scan_axis(&self, axis: Axis) -> Result<Rect, CropAdjustError> {
        let (low, high) = match axis {
            Axis::Horizontal => (Edge::Left, Edge::Right),
            Axis::Vertical => (Edge::Top, Edge::Bottom),
        };
        let first = self.scan_edge(low);
        let last = self.scan_edge(high);
        if first > last {
            return Err(CropAdjustError::BoundaryCollapse {
                rect: self.rect,
                axis,
            });
        }
        Ok(self.rect.with_span(axis, first, last - first + 1))
    }
}
