//! Dark reference estimation and per-line dark rates.

use crate::error::CropAdjustError;
use crate::grid::PixelGrid;
use crate::rect::{Axis, Rect};

/// Number of darkest pixels averaged into the dark reference.
pub const DARK_CLUSTER_SIZE: usize = 9;

/// Representative "ink" intensity of `rect`.
///
/// Returns the rounded mean of the [`DARK_CLUSTER_SIZE`] darkest pixels in the
/// rectangle (all of them when it is smaller), so one stray black pixel does
/// not define the reference on its own. Pixels outside the grid are ignored.
pub fn estimate_dark_reference(grid: &PixelGrid, rect: &Rect) -> Result<u8, CropAdjustError> {
    if rect.is_empty() {
        return Err(CropAdjustError::InvalidRectangle { rect: *rect });
    }

    let x0 = rect.x.max(0) as usize;
    let y0 = rect.y.max(0) as usize;
    let x1 = (rect.right().max(0) as usize).min(grid.width());
    let y1 = (rect.bottom().max(0) as usize).min(grid.height());
    if x0 >= x1 || y0 >= y1 {
        return Err(CropAdjustError::OutOfBounds {
            rect: *rect,
            width: grid.width(),
            height: grid.height(),
        });
    }

    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for &v in &grid.row(y)[x0..x1] {
            hist[v as usize] += 1;
        }
    }

    let mut remaining = DARK_CLUSTER_SIZE.min((x1 - x0) * (y1 - y0)) as u64;
    let taken = remaining;
    let mut sum = 0u64;
    for (value, &count) in hist.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let n = remaining.min(count as u64);
        sum += value as u64 * n;
        remaining -= n;
    }

    Ok(((sum + taken / 2) / taken) as u8)
}

/// A row or column segment.
///
/// `orientation == Horizontal` is a row at `y = index` covering `x` in
/// `[start, end)`; `Vertical` is a column at `x = index` covering `y` in
/// `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub orientation: Axis,
    pub index: i32,
    pub start: i32,
    pub end: i32,
}

impl Line {
    pub const fn row(y: i32, x_start: i32, x_end: i32) -> Self {
        Self {
            orientation: Axis::Horizontal,
            index: y,
            start: x_start,
            end: x_end,
        }
    }

    pub const fn column(x: i32, y_start: i32, y_end: i32) -> Self {
        Self {
            orientation: Axis::Vertical,
            index: x,
            start: y_start,
            end: y_end,
        }
    }
}

/// Fraction of in-grid pixels on `line` within `tolerance` of `dark`.
///
/// Returns `0.0` when no pixel of the line falls inside the grid.
pub fn dark_rate(grid: &PixelGrid, line: &Line, dark: u8, tolerance: u8) -> f32 {
    let lower = dark.saturating_sub(tolerance);
    let upper = dark.saturating_add(tolerance);

    let mut dark_pixels = 0u32;
    let mut total = 0u32;
    for t in line.start..line.end {
        let px = match line.orientation {
            Axis::Horizontal => grid.get(t as i64, line.index as i64),
            Axis::Vertical => grid.get(line.index as i64, t as i64),
        };
        if let Some(v) = px {
            total += 1;
            if (lower..=upper).contains(&v) {
                dark_pixels += 1;
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    dark_pixels as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stripes() -> PixelGrid {
        // columns 0..4 black, 4..8 gray 100, rest white
        PixelGrid::from_fn(12, 6, |x, _| match x {
            0..=3 => 0,
            4..=7 => 100,
            _ => 255,
        })
        .expect("grid")
    }

    #[test]
    fn dark_reference_of_uniform_rect_is_its_value() {
        let grid = PixelGrid::filled(20, 20, 255).expect("grid");
        let dark = estimate_dark_reference(&grid, &Rect::new(2, 2, 10, 10)).expect("dark");
        assert_eq!(dark, 255);
    }

    #[test]
    fn dark_reference_resists_single_outlier() {
        let grid = PixelGrid::from_fn(10, 10, |x, y| if (x, y) == (5, 5) { 0 } else { 200 })
            .expect("grid");
        let dark = estimate_dark_reference(&grid, &Rect::new(0, 0, 10, 10)).expect("dark");
        // (0 + 8 * 200) / 9 = 177.8
        assert_eq!(dark, 178);
    }

    #[test]
    fn dark_reference_picks_darkest_cluster() {
        let grid = stripes();
        let dark = estimate_dark_reference(&grid, &Rect::new(2, 0, 8, 6)).expect("dark");
        assert_eq!(dark, 0);
    }

    #[test]
    fn dark_reference_rejects_degenerate_rect() {
        let grid = stripes();
        let rect = Rect::new(1, 1, 0, 3);
        assert_eq!(
            estimate_dark_reference(&grid, &rect),
            Err(CropAdjustError::InvalidRectangle { rect })
        );
    }

    #[test]
    fn dark_rate_counts_band_inclusively() {
        let grid = stripes();
        let row = Line::row(2, 0, 12);
        assert_relative_eq!(dark_rate(&grid, &row, 0, 0), 4.0 / 12.0);
        // band [0, 100] takes in the gray stripe
        assert_relative_eq!(dark_rate(&grid, &row, 50, 50), 8.0 / 12.0);
        assert_relative_eq!(dark_rate(&grid, &row, 255, 0), 4.0 / 12.0);
    }

    #[test]
    fn dark_rate_on_columns() {
        let grid = stripes();
        assert_relative_eq!(dark_rate(&grid, &Line::column(1, 0, 6), 0, 20), 1.0);
        assert_relative_eq!(dark_rate(&grid, &Line::column(9, 0, 6), 0, 20), 0.0);
    }

    #[test]
    fn dark_rate_ignores_pixels_outside_grid() {
        let grid = stripes();
        // only x = 0..4 are inside the grid, all black
        assert_relative_eq!(dark_rate(&grid, &Line::row(0, -4, 4), 0, 0), 1.0);
        assert_relative_eq!(dark_rate(&grid, &Line::row(-1, 0, 12), 0, 255), 0.0);
        assert_relative_eq!(dark_rate(&grid, &Line::column(3, 5, 5), 0, 255), 0.0);
    }
}
