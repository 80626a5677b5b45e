//! Pixel mode declarations: band count, bytes per pixel, channel semantics.

use core::fmt;

/// The symbolic name of a pixel layout, drawn from a closed set.
///
/// This is the tagged-variant form of the mode strings (`"1"`, `"L"`,
/// `"RGB"`, `"BGR;15"`, ...) that a caller speaks at the public boundary;
/// internally every shuffler and the dispatch table match on this enum
/// rather than comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Mode {
  /// Bilevel: one byte per pixel, always 0 or 255.
  Bilevel,
  /// 8-bit luma.
  L,
  /// Signed 32-bit integer per pixel.
  I,
  /// 32-bit float per pixel.
  F,
  /// 8-bit palette index.
  P,
  /// 8-bit RGB, stored as 4 bytes per pixel (4th byte always 255).
  Rgb,
  /// 8-bit RGBA.
  Rgba,
  /// 8-bit RGB with an ignored 4th byte, always written 255.
  Rgbx,
  /// Premultiplied 8-bit RGBA.
  RgbaPremultiplied,
  /// 8-bit CMYK.
  Cmyk,
  /// 8-bit YCbCr.
  YCbCr,
  /// Packed 15-bit BGR (`0RRRRRGGGGGBBBBB`), 2 bytes per pixel.
  Bgr15,
  /// Packed 16-bit BGR (`RRRRRGGGGGGBBBBB`), 2 bytes per pixel.
  Bgr16,
  /// 3 bytes per pixel, stored `b, g, r`.
  Bgr24,
  /// Little-endian signed 16-bit integer per pixel.
  I16,
  /// Big-endian signed 16-bit integer per pixel.
  I16B,
}

impl Mode {
  /// Number of bands (logical channels) this mode carries.
  #[inline]
  #[must_use]
  pub const fn bands(self) -> usize {
    match self {
      Mode::Bilevel | Mode::L | Mode::I | Mode::F | Mode::P | Mode::I16 | Mode::I16B => 1,
      Mode::Rgb | Mode::Rgbx | Mode::Bgr15 | Mode::Bgr16 | Mode::Bgr24 | Mode::YCbCr => 3,
      Mode::Rgba | Mode::RgbaPremultiplied | Mode::Cmyk => 4,
    }
  }

  /// Number of bytes occupied by one pixel of this mode.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    match self {
      Mode::Bilevel | Mode::L | Mode::P => 1,
      Mode::Bgr15 | Mode::Bgr16 | Mode::I16 | Mode::I16B => 2,
      Mode::Bgr24 => 3,
      Mode::Rgb | Mode::Rgba | Mode::Rgbx | Mode::RgbaPremultiplied | Mode::Cmyk | Mode::YCbCr => {
        4
      }
      Mode::I | Mode::F => 4,
    }
  }

  /// Whether this mode always writes its 4th byte as 255 (the alpha-fill
  /// invariant).
  #[inline]
  #[must_use]
  pub const fn fourth_byte_is_always_255(self) -> bool {
    matches!(self, Mode::Rgb | Mode::Rgbx | Mode::YCbCr)
  }

  /// Parses the public-boundary string form of a mode.
  #[inline]
  #[must_use]
  pub fn from_str_name(s: &str) -> Option<Self> {
    Some(match s {
      "1" => Mode::Bilevel,
      "L" => Mode::L,
      "I" => Mode::I,
      "F" => Mode::F,
      "P" => Mode::P,
      "RGB" => Mode::Rgb,
      "RGBA" => Mode::Rgba,
      "RGBX" => Mode::Rgbx,
      "RGBa" => Mode::RgbaPremultiplied,
      "CMYK" => Mode::Cmyk,
      "YCbCr" => Mode::YCbCr,
      "BGR;15" => Mode::Bgr15,
      "BGR;16" => Mode::Bgr16,
      "BGR;24" => Mode::Bgr24,
      "I;16" => Mode::I16,
      "I;16B" => Mode::I16B,
      _ => return None,
    })
  }

  /// Renders the public-boundary string form of this mode.
  #[inline]
  #[must_use]
  pub const fn as_str_name(self) -> &'static str {
    match self {
      Mode::Bilevel => "1",
      Mode::L => "L",
      Mode::I => "I",
      Mode::F => "F",
      Mode::P => "P",
      Mode::Rgb => "RGB",
      Mode::Rgba => "RGBA",
      Mode::Rgbx => "RGBX",
      Mode::RgbaPremultiplied => "RGBa",
      Mode::Cmyk => "CMYK",
      Mode::YCbCr => "YCbCr",
      Mode::Bgr15 => "BGR;15",
      Mode::Bgr16 => "BGR;16",
      Mode::Bgr24 => "BGR;24",
      Mode::I16 => "I;16",
      Mode::I16B => "I;16B",
    }
  }

  /// Whether this mode is one of the RGB-family modes the quantizer and
  /// the bilevel dither accept as multi-band color input.
  #[inline]
  #[must_use]
  pub const fn is_rgb_family(self) -> bool {
    matches!(self, Mode::Rgb | Mode::Rgba | Mode::Rgbx)
  }
}

impl fmt::Display for Mode {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str_name())
  }
}

impl core::str::FromStr for Mode {
  type Err = crate::error::ConvertError;

  #[inline]
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Mode::from_str_name(s).ok_or(crate::error::ConvertError::BadMode)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_every_mode_string() {
    let modes = [
      Mode::Bilevel,
      Mode::L,
      Mode::I,
      Mode::F,
      Mode::P,
      Mode::Rgb,
      Mode::Rgba,
      Mode::Rgbx,
      Mode::RgbaPremultiplied,
      Mode::Cmyk,
      Mode::YCbCr,
      Mode::Bgr15,
      Mode::Bgr16,
      Mode::Bgr24,
      Mode::I16,
      Mode::I16B,
    ];
    for m in modes {
      assert_eq!(Mode::from_str_name(m.as_str_name()), Some(m));
    }
  }

  #[test]
  fn rgb_family_pixels_are_always_four_bytes() {
    assert_eq!(Mode::Rgb.bytes_per_pixel(), 4);
    assert_eq!(Mode::Rgba.bytes_per_pixel(), 4);
    assert_eq!(Mode::Rgbx.bytes_per_pixel(), 4);
  }
}
