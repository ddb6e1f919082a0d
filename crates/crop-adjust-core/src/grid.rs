//! Grayscale intensity grid and RGB(A) reduction.

use crate::error::CropAdjustError;

/// Immutable grayscale image, row-major, one byte per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap a row-major intensity buffer of length `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, CropAdjustError> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(CropAdjustError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Grid filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, CropAdjustError> {
        let len = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, CropAdjustError> {
        let len = checked_area(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Intensity at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    /// Row `y` as a slice.
    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

fn checked_area(width: usize, height: usize) -> Result<usize, CropAdjustError> {
    if width == 0 || height == 0 {
        return Err(CropAdjustError::InvalidImage { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(CropAdjustError::InvalidImage { width, height })
}

/// Any bitmap that can report its size and an RGB triple per pixel.
///
/// Alpha, where present, is ignored by the conversion.
pub trait RgbSource {
    fn dimensions(&self) -> (usize, usize);
    fn rgb_at(&self, x: usize, y: usize) -> [u8; 3];
}

/// Perceptual luminance (ITU-R BT.601 weights), rounded to the nearest integer.
#[inline]
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

/// Reduce a color bitmap to an intensity grid.
pub fn image_to_grid<S: RgbSource + ?Sized>(src: &S) -> Result<PixelGrid, CropAdjustError> {
    let (width, height) = src.dimensions();
    PixelGrid::from_fn(width, height, |x, y| luminance(src.rgb_at(x, y)))
}

/// Interleaved 8-bit pixel buffer with 3 (RGB) or 4 (RGBA) channels per pixel.
#[derive(Clone, Copy, Debug)]
pub struct InterleavedRgb<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> InterleavedRgb<'a> {
    pub fn rgb(width: usize, height: usize, data: &'a [u8]) -> Result<Self, CropAdjustError> {
        Self::with_channels(width, height, 3, data)
    }

    pub fn rgba(width: usize, height: usize, data: &'a [u8]) -> Result<Self, CropAdjustError> {
        Self::with_channels(width, height, 4, data)
    }

    fn with_channels(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, CropAdjustError> {
        let expected = checked_area(width, height)?
            .checked_mul(channels)
            .ok_or(CropAdjustError::InvalidImage { width, height })?;
        if data.len() != expected {
            return Err(CropAdjustError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }
}

impl RgbSource for InterleavedRgb<'_> {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * self.channels;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
