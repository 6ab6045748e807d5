//! Colors and the byte layouts a [`PixelBuffer`](crate::render::PixelBuffer) can store them in.

use std::fmt;
use std::str::FromStr;

/// A logical RGBA color, independent of how a buffer lays out its bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// All channels zero. Returned for reads outside a buffer.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque gray with every color channel set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Every channel, alpha included, set to `value`.
    pub const fn splat(value: u8) -> Self {
        Self::rgba(value, value, value, value)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const BLUE: Color = Color::rgb(64, 128, 255);
pub const YELLOW: Color = Color::rgb(255, 200, 0);
pub const PURPLE: Color = Color::rgb(70, 50, 150);
pub const PINK: Color = Color::rgb(175, 50, 150);
pub const TEAL: Color = Color::rgb(10, 215, 170);

/// Face colors cycled through by flat fills and wireframes.
pub const PALETTE: [Color; 6] = [RED, GREEN, BLUE, PINK, TEAL, PURPLE];

/// Palette color for the `index`-th face.
pub fn palette(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Byte layout of one pixel in a buffer.
///
/// The presentation layer uploads buffer bytes verbatim, so the variant
/// must match the texture format it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Four bytes per pixel: red, green, blue, alpha.
    #[default]
    Rgba32,
    /// Three bytes per pixel: blue, green, red. No alpha is stored.
    Bgr24,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba32 => 4,
            PixelFormat::Bgr24 => 3,
        }
    }

    /// `color` as this format stores it: formats without alpha make it opaque.
    pub const fn normalize(self, color: Color) -> Color {
        match self {
            PixelFormat::Rgba32 => color,
            PixelFormat::Bgr24 => Color::rgb(color.r, color.g, color.b),
        }
    }

    /// Writes `color` into `out`, which must be `bytes_per_pixel` long.
    #[inline]
    pub fn encode(self, color: Color, out: &mut [u8]) {
        match self {
            PixelFormat::Rgba32 => out.copy_from_slice(&color.to_array()),
            PixelFormat::Bgr24 => out.copy_from_slice(&[color.b, color.g, color.r]),
        }
    }

    /// Reads a color back from `bytes_per_pixel` bytes.
    ///
    /// Formats without alpha report fully opaque pixels.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> Color {
        match self {
            PixelFormat::Rgba32 => Color::rgba(bytes[0], bytes[1], bytes[2], bytes[3]),
            PixelFormat::Bgr24 => Color::rgb(bytes[2], bytes[1], bytes[0]),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgba32 => write!(f, "rgba"),
            PixelFormat::Bgr24 => write!(f, "bgr"),
        }
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgba" | "rgba32" => Ok(PixelFormat::Rgba32),
            "bgr" | "bgr24" => Ok(PixelFormat::Bgr24),
            other => Err(format!("unknown channel order '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgr_stores_channels_reversed() {
        let mut bytes = [0u8; 3];
        PixelFormat::Bgr24.encode(Color::rgb(1, 2, 3), &mut bytes);
        assert_eq!(bytes, [3, 2, 1]);
        assert_eq!(PixelFormat::Bgr24.decode(&bytes), Color::rgb(1, 2, 3));
    }

    #[test]
    fn normalize_matches_decode() {
        let translucent = Color::rgba(10, 20, 30, 40);
        for format in [PixelFormat::Rgba32, PixelFormat::Bgr24] {
            let mut bytes = vec![0u8; format.bytes_per_pixel()];
            format.encode(translucent, &mut bytes);
            assert_eq!(format.decode(&bytes), format.normalize(translucent));
        }
        assert_eq!(PixelFormat::Bgr24.normalize(translucent).a, 255);
    }

    #[test]
    fn rgba_keeps_alpha() {
        let mut bytes = [0u8; 4];
        PixelFormat::Rgba32.encode(Color::rgba(9, 8, 7, 6), &mut bytes);
        assert_eq!(bytes, [9, 8, 7, 6]);
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(palette(0), RED);
        assert_eq!(palette(PALETTE.len() + 2), BLUE);
    }

    #[test]
    fn channel_order_parses_names() {
        assert_eq!("BGR".parse::<PixelFormat>(), Ok(PixelFormat::Bgr24));
        assert_eq!("rgba".parse::<PixelFormat>(), Ok(PixelFormat::Rgba32));
        assert!("argb".parse::<PixelFormat>().is_err());
    }
}
