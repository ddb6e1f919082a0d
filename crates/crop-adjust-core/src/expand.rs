use crate::error::CropAdjustError;
use crate::rect::Rect;

/// Margin added on each side of a `size`-pixel span.
pub fn margin(size: i32, ratio: f32) -> i32 {
    (size as f32 * ratio).round() as i32
}

/// Pad `rect` by `ratio` of its width/height on every side, clipped to the grid.
pub fn expand_rect(
    rect: &Rect,
    ratio: f32,
    grid_width: usize,
    grid_height: usize,
) -> Result<Rect, CropAdjustError> {
    if rect.is_empty() {
        return Err(CropAdjustError::InvalidRectangle { rect: *rect });
    }

    let mx = margin(rect.width, ratio) as i64;
    let my = margin(rect.height, ratio) as i64;

    let left = (rect.x as i64 - mx).max(0);
    let top = (rect.y as i64 - my).max(0);
    let right = (rect.right() + mx).min(grid_width as i64);
    let bottom = (rect.bottom() + my).min(grid_height as i64);

    let expanded = Rect::new(
        left as i32,
        top as i32,
        (right - left) as i32,
        (bottom - top) as i32,
    );
    if expanded.is_empty() {
        return Err(CropAdjustError::InvalidRectangle { rect: *rect });
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_rounded_margin_per_side() {
        let out = expand_rect(&Rect::new(100, 100, 50, 20), 0.1, 1000, 1000).expect("expand");
        assert_eq!(out, Rect::new(95, 98, 60, 24));
    }

    #[test]
    fn zero_ratio_is_identity() {
        let r = Rect::new(3, 4, 5, 6);
        assert_eq!(expand_rect(&r, 0.0, 20, 20), Ok(r));
    }

    #[test]
    fn clips_to_grid() {
        let out = expand_rect(&Rect::new(2, 1, 40, 10), 0.25, 45, 12).expect("expand");
        // margins 10 and 3 (2.5 rounds away from zero)
        assert_eq!(out, Rect::new(0, 0, 45, 12));
    }

    #[test]
    fn rect_outside_grid_collapses() {
        let r = Rect::new(50, 50, 4, 4);
        assert_eq!(
            expand_rect(&r, 0.1, 20, 20),
            Err(CropAdjustError::InvalidRectangle { rect: r })
        );
        let empty = Rect::new(0, 0, 0, 4);
        assert!(expand_rect(&empty, 0.1, 20, 20).is_err());
    }
}
