//! Flat, bounds-checked 2D pixel storage.
//!
//! The same type backs both the color buffer and the depth buffer. Accesses
//! outside the buffer never fail: writes are dropped and reads return
//! [`Color::TRANSPARENT`], so callers can draw partially off-screen geometry
//! without branching on bounds themselves.

use std::ops::Range;
use std::path::Path;

use rayon::prelude::*;

use crate::color::{Color, PixelFormat};

/// Row-major pixel bytes with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer and normalizes every pixel to the default color.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = width as usize * height as usize * format.bytes_per_pixel();
        let mut buffer = Self {
            width,
            height,
            format,
            data: vec![0; size],
        };
        for pixel in buffer.data.chunks_exact_mut(format.bytes_per_pixel()) {
            format.encode(Color::default(), pixel);
        }
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Number of bytes in one row.
    pub fn pitch(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Raw bytes in the buffer's [`PixelFormat`], ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if self.data.is_empty()
            || x < 0
            || y < 0
            || x >= self.width as i32
            || y >= self.height as i32
        {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.bytes_per_pixel())
    }

    /// Writes a pixel. Out-of-bounds coordinates are ignored.
    ///
    /// Only what the format can hold is stored, so a later [`get`] returns
    /// [`PixelFormat::normalize`] of `color`: BGR24 buffers drop alpha.
    ///
    /// [`get`]: PixelBuffer::get
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            let bpp = self.bytes_per_pixel();
            self.format.encode(color, &mut self.data[offset..offset + bpp]);
        }
    }

    /// Reads a pixel, or [`Color::TRANSPARENT`] when out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        match self.offset(x, y) {
            Some(offset) => self
                .format
                .decode(&self.data[offset..offset + self.bytes_per_pixel()]),
            None => Color::TRANSPARENT,
        }
    }

    /// The stored channels of one pixel in the buffer's byte order, or
    /// `None` when out of bounds.
    #[inline]
    pub fn channels(&self, x: i32, y: i32) -> Option<&[u8]> {
        let offset = self.offset(x, y)?;
        self.data.get(offset..offset + self.bytes_per_pixel())
    }

    /// Overwrites the stored channels of one pixel, in the buffer's byte
    /// order. Channels past `bytes_per_pixel` are ignored, as are
    /// out-of-bounds coordinates.
    pub fn set_channels(&mut self, x: i32, y: i32, channels: &[u8]) {
        if let Some(offset) = self.offset(x, y) {
            let bpp = self.bytes_per_pixel();
            for (dst, &src) in self.data[offset..offset + bpp].iter_mut().zip(channels) {
                *dst = src;
            }
        }
    }

    /// Overwrites every byte of the buffer with `value`.
    pub fn clear(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Mutable views of the rows in `rows`, for filling them in parallel.
    ///
    /// `rows` must lie within `0..height`.
    pub(crate) fn par_rows_mut(
        &mut self,
        rows: Range<usize>,
    ) -> impl IndexedParallelIterator<Item = RowMut<'_>> + '_ {
        let pitch = self.pitch();
        let format = self.format;
        let first = rows.start;
        self.data[rows.start * pitch..rows.end * pitch]
            .par_chunks_mut(pitch.max(1))
            .enumerate()
            .map(move |(i, bytes)| RowMut {
                y: first + i,
                format,
                bytes,
            })
    }

    /// Copies the buffer into an RGBA image.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.get(x as i32, y as i32).to_array())
        })
    }

    /// Writes the buffer to an image file; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}

/// One row of a [`PixelBuffer`], borrowed for the duration of a parallel fill.
pub(crate) struct RowMut<'a> {
    y: usize,
    format: PixelFormat,
    bytes: &'a mut [u8],
}

impl RowMut<'_> {
    pub fn y(&self) -> usize {
        self.y
    }

    #[inline]
    pub fn get(&self, x: usize) -> Color {
        let bpp = self.format.bytes_per_pixel();
        match self.bytes.get(x * bpp..(x + 1) * bpp) {
            Some(pixel) => self.format.decode(pixel),
            None => Color::TRANSPARENT,
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, color: Color) {
        let bpp = self.format.bytes_per_pixel();
        if let Some(pixel) = self.bytes.get_mut(x * bpp..(x + 1) * bpp) {
            self.format.encode(color, pixel);
        }
    }
}
