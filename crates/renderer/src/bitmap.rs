//! Pixel buffers that raster operations paint into.

use terrain_common::{Rgb, Rgba};

/// Bits per pixel of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Gray8,
    Rgb24,
    Rgba32,
}

impl ColorDepth {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorDepth::Gray8 => 1,
            ColorDepth::Rgb24 => 3,
            ColorDepth::Rgba32 => 4,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes_per_pixel() as u32 * 8
    }
}

/// A writable raster addressed with `(x, y)`, row 0 at the top.
///
/// Implementations ignore writes outside the buffer and return black for
/// reads outside it.
pub trait PixelBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn depth(&self) -> ColorDepth;

    fn get_pixel24(&self, x: usize, y: usize) -> Rgb;
    fn get_pixel32(&self, x: usize, y: usize) -> Rgba;
    fn set_pixel24(&mut self, x: usize, y: usize, color: Rgb);
    fn set_pixel32(&mut self, x: usize, y: usize, color: Rgba);

    /// Multiply the gray level by `factor`.
    fn scale_pixel8(&mut self, x: usize, y: usize, factor: f32);
    /// Multiply the color channels by `factor`.
    fn scale_pixel24(&mut self, x: usize, y: usize, factor: f32);
    /// Multiply the color channels by `factor`, leaving alpha alone.
    fn scale_pixel32(&mut self, x: usize, y: usize, factor: f32);

    /// Scale a pixel at the buffer's own depth.
    fn scale_pixel(&mut self, x: usize, y: usize, factor: f32) {
        match self.depth() {
            ColorDepth::Gray8 => self.scale_pixel8(x, y, factor),
            ColorDepth::Rgb24 => self.scale_pixel24(x, y, factor),
            ColorDepth::Rgba32 => self.scale_pixel32(x, y, factor),
        }
    }

    fn fill(&mut self, color: Rgba) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_pixel32(x, y, color);
            }
        }
    }
}

#[inline]
fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).clamp(0.0, 255.0) as u8
}

#[inline]
fn gray_level(color: Rgb) -> u8 {
    ((color.r as u16 + color.g as u16 + color.b as u16) / 3) as u8
}

/// In-memory raster, rows stored top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    depth: ColorDepth,
    data: Vec<u8>,
}

impl Bitmap {
    /// Black (transparent for RGBA) bitmap.
    pub fn new(width: usize, height: usize, depth: ColorDepth) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![0; width * height * depth.bytes_per_pixel()],
        }
    }

    pub fn filled(width: usize, height: usize, depth: ColorDepth, color: Rgba) -> Self {
        let mut bitmap = Self::new(width, height, depth);
        bitmap.fill(color);
        bitmap
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Raw pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.depth.bytes_per_pixel();
        &self.data[y * stride..(y + 1) * stride]
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y * self.width + x) * self.depth.bytes_per_pixel())
    }

    /// Scale every color channel of a pixel; alpha is never touched.
    fn scale_color(&mut self, x: usize, y: usize, factor: f32) {
        let channels = self.depth.bytes_per_pixel().min(3);
        if let Some(i) = self.offset(x, y) {
            for c in &mut self.data[i..i + channels] {
                *c = scale_channel(*c, factor);
            }
        }
    }
}

impl PixelBuffer for Bitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn depth(&self) -> ColorDepth {
        self.depth
    }

    fn get_pixel24(&self, x: usize, y: usize) -> Rgb {
        self.get_pixel32(x, y).rgb()
    }

    fn get_pixel32(&self, x: usize, y: usize) -> Rgba {
        let Some(i) = self.offset(x, y) else {
            return Rgba::new(0, 0, 0, 0);
        };
        let d = &self.data;
        match self.depth {
            ColorDepth::Gray8 => Rgba::new(d[i], d[i], d[i], 255),
            ColorDepth::Rgb24 => Rgba::new(d[i], d[i + 1], d[i + 2], 255),
            ColorDepth::Rgba32 => Rgba::new(d[i], d[i + 1], d[i + 2], d[i + 3]),
        }
    }

    fn set_pixel24(&mut self, x: usize, y: usize, color: Rgb) {
        self.set_pixel32(x, y, Rgba::from(color));
    }

    fn set_pixel32(&mut self, x: usize, y: usize, color: Rgba) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        match self.depth {
            ColorDepth::Gray8 => self.data[i] = gray_level(color.rgb()),
            ColorDepth::Rgb24 => self.data[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]),
            ColorDepth::Rgba32 => {
                self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a])
            }
        }
    }

    fn scale_pixel8(&mut self, x: usize, y: usize, factor: f32) {
        self.scale_color(x, y, factor);
    }

    fn scale_pixel24(&mut self, x: usize, y: usize, factor: f32) {
        self.scale_color(x, y, factor);
    }

    fn scale_pixel32(&mut self, x: usize, y: usize, factor: f32) {
        self.scale_color(x, y, factor);
    }
}
