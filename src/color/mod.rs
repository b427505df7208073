//! Colors and rendered page images.
//!
//! A page is rasterized once per processing pass into a [`RasterImage`];
//! [`sampler`] derives background and foreground estimates from it.

pub mod sampler;

pub use sampler::{average_color_of_region, estimate_background, estimate_foreground};

/// An opaque RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0.0 to 1.0)
    pub r: f32,
    /// Green component (0.0 to 1.0)
    pub g: f32,
    /// Blue component (0.0 to 1.0)
    pub b: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Opaque white.
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a new color; channels are clamped to `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a gray color.
    pub fn gray(level: f32) -> Self {
        Self::new(level, level, level)
    }

    /// Convert DeviceCMYK to RGB.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self::new((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
    }

    /// Perceived brightness, `0.299 r + 0.587 g + 0.114 b`.
    pub fn luminance(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Sum of the per-channel absolute differences.
    pub fn difference(&self, other: &Color) -> f32 {
        (self.r - other.r).abs() + (self.g - other.g).abs() + (self.b - other.b).abs()
    }

    /// Black on light colors, white on dark ones.
    pub fn contrasting(&self) -> Color {
        if self.luminance() > 0.5 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }

    /// Arithmetic mean of `colors`, or `None` for an empty slice.
    pub fn mean(colors: &[Color]) -> Option<Color> {
        if colors.is_empty() {
            return None;
        }
        let n = colors.len() as f32;
        let (r, g, b) = colors.iter().fold((0.0, 0.0, 0.0), |(r, g, b), c| {
            (r + c.r, g + c.g, b + c.b)
        });
        Some(Color {
            r: r / n,
            g: g / n,
            b: b / n,
        })
    }
}

/// A page rendered to RGBA pixels, row-major from the top-left corner.
///
/// Alpha is not premultiplied. Pages are rendered onto an opaque background,
/// so samplers only read the color channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA buffer; returns `None` if its length does not match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// An image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let px = [
            (color.r * 255.0).round() as u8,
            (color.g * 255.0).round() as u8,
            (color.b * 255.0).round() as u8,
            255,
        ];
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(offset..offset + 3)?;
        Some(Color::from_rgb8(px[0], px[1], px[2]))
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data[offset] = (color.r * 255.0).round() as u8;
        self.data[offset + 1] = (color.g * 255.0).round() as u8;
        self.data[offset + 2] = (color.b * 255.0).round() as u8;
        self.data[offset + 3] = 255;
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
