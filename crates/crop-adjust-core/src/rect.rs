use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in grid coordinates.
///
/// `x`/`y` address the top-left pixel; the rectangle covers the half-open
/// ranges `[x, x + width)` and `[y, y + height)`. Signed fields let callers
/// hand in whatever a rectangle list contains; validity is checked by the
/// engine, not by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from inclusive pixel bounds.
    pub const fn from_bounds(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left + 1,
            height: bottom - top + 1,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// True when every pixel of the rectangle lies inside a `width x height` grid.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        !self.is_empty()
            && self.x >= 0
            && self.y >= 0
            && self.right() <= width as i64
            && self.bottom() <= height as i64
    }

    /// First pixel position along `axis`.
    pub(crate) const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Length along `axis`.
    pub(crate) const fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replace the span along `axis`, keeping the other axis untouched.
    pub(crate) const fn with_span(self, axis: Axis, start: i32, extent: i32) -> Self {
        match axis {
            Axis::Horizontal => Self {
                x: start,
                width: extent,
                ..self
            },
            Axis::Vertical => Self {
                y: start,
                height: extent,
                ..self
            },
        }
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((x, y, width, height): (i32, i32, i32, i32)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<[i32; 4]> for Rect {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Coordinate axis. `Horizontal` is x (columns), `Vertical` is y (rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// One of the four rectangle boundaries.
///
/// An edge moves along one axis and probes lines that run along the other:
/// top/bottom probe rows, left/right probe columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Axis along which the edge position moves.
    pub const fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Left | Edge::Right => Axis::Horizontal,
        }
    }

    /// +1 when moving outward increases the coordinate, -1 otherwise.
    pub const fn outward(self) -> i32 {
        match self {
            Edge::Top | Edge::Left => -1,
            Edge::Bottom | Edge::Right => 1,
        }
    }

    /// Index of the outermost line still inside `rect` on this edge.
    pub const fn line_of(self, rect: &Rect) -> i32 {
        match self {
            Edge::Top => rect.y,
            Edge::Bottom => rect.y + rect.height - 1,
            Edge::Left => rect.x,
            Edge::Right => rect.x + rect.width - 1,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(name)
    }
}
