//! The quantizer (C5): expanding a palette-mode image out to a direct-color
//! mode, and reducing a direct-color image down to palette mode with either
//! a closest-color or a Floyd–Steinberg-dithered lookup.

use alloc::vec::Vec;

use crate::error::ConvertError;
use crate::image::{Bitmap, ImageBuffer, OwnedImage, Palmap};
use crate::mode::Mode;
use crate::palette::{Palette, Rgba8};
use crate::shuffle::{self, cmyk, rgb as rgb_shuffle, ycbcr};

/// Expands a `P`-mode `src` to direct-color mode `dst_mode`.
///
/// Grounded in the reference implementation's explicit `p2bit`/`p2l`/`p2i`/
/// `p2f`/`p2rgb`/`p2rgba`/`p2cmyk`/`p2ycbcr` per-destination table: each
/// index is expanded through the palette's RGBA entry, then routed through
/// the same per-pixel arithmetic the direct `RGB -> M` shuffler would use,
/// rather than writing a second copy of that arithmetic here.
///
/// `P -> RGBX` uses the RGBA entry's three color channels directly, same as
/// `P -> RGBA`; the fourth byte is overwritten to 255 by the row shuffler
/// invariant either way. A `dst_mode` this crate has no from-palette
/// expansion for (e.g. `P -> BGR;15`) is reported as
/// [`ConvertError::ConversionNotSupported`] rather than a panic.
///
/// ## Panics
/// If `src.mode()` isn't `Mode::P`, or `src` carries no palette.
pub fn from_palette(
  preallocated: Option<OwnedImage>, src: &dyn ImageBuffer, dst_mode: Mode,
) -> Result<OwnedImage, ConvertError> {
  crate::trace!("from_palette> dst_mode={:?}", dst_mode);
  assert_eq!(src.mode(), Mode::P);
  let palette = src.palette().expect("P-mode image must carry a palette");
  let (width, height) = (src.width(), src.height());

  if dst_mode == Mode::P {
    return OwnedImage::copy(preallocated, src);
  }

  let mut expanded = Bitmap::try_new_zeroed(Mode::Rgba, width, height)?;
  for y in 0..height {
    let idx_row = src.row_indices(y);
    let rgba_row = expanded.row_bytes_mut(y);
    for x in 0..width {
      let e = palette.get(idx_row[x]);
      let px = &mut rgba_row[x * 4..x * 4 + 4];
      px[0] = e.r;
      px[1] = e.g;
      px[2] = e.b;
      px[3] = e.a;
    }
  }

  if dst_mode == Mode::Rgba {
    let mut out = OwnedImage::new_like(dst_mode, width, height, preallocated)?;
    for y in 0..height {
      out.row_bytes_mut(y).copy_from_slice(expanded.row_bytes(y));
    }
    return Ok(out);
  }

  let shuffler: shuffle::Shuffler = match dst_mode {
    Mode::Bilevel => shuffle::find(Mode::Rgba, Mode::Bilevel).unwrap(),
    Mode::L => shuffle::find(Mode::Rgba, Mode::L).unwrap(),
    Mode::I => shuffle::find(Mode::Rgba, Mode::I).unwrap(),
    Mode::F => shuffle::find(Mode::Rgba, Mode::F).unwrap(),
    Mode::Rgb | Mode::Rgbx => rgb_shuffle::rgba_to_rgb,
    Mode::Cmyk => cmyk::rgb_to_cmyk,
    Mode::YCbCr => ycbcr::rgb_to_ycbcr,
    _ => return Err(ConvertError::ConversionNotSupported { src: Mode::P, dst: dst_mode }),
  };

  let mut out = OwnedImage::new_like(dst_mode, width, height, preallocated)?;
  for y in 0..height {
    shuffler(out.row_bytes_mut(y), expanded.row_bytes(y), width);
  }
  Ok(out)
}

/// Reduces `src` (`L` or an RGB-family mode) to `P`-mode.
///
/// Step 1 of spec.md §4.4: a single-band source gets the greyscale ramp, a
/// multi-band source gets the fixed browser color cube — the reference
/// implementation always synthesizes the palette from the band count and
/// ignores any caller-supplied one, which this preserves (recorded as an
/// Open Question resolution in DESIGN.md).
///
/// Callers are expected to have already validated that `src.mode()` is `L`
/// or an RGB-family mode (the driver does this before routing here); any
/// other source mode is reported as
/// [`ConvertError::ConversionNotSupported`].
pub fn to_palette(
  preallocated: Option<OwnedImage>, src: &dyn ImageBuffer, dither: bool,
) -> Result<OwnedImage, ConvertError> {
  crate::trace!("to_palette> src_mode={:?} dither={}", src.mode(), dither);
  let (width, height) = (src.width(), src.height());

  if src.mode() == Mode::L {
    let mut out = OwnedImage::new_like(Mode::P, width, height, preallocated)?;
    out.set_palette(Palette::greyscale_ramp());
    for y in 0..height {
      out.row_indices_mut(y).copy_from_slice(src.row_bytes(y));
    }
    return Ok(out);
  }

  if !src.mode().is_rgb_family() {
    return Err(ConvertError::ConversionNotSupported { src: src.mode(), dst: Mode::P });
  }

  let mut palette = Palette::browser();
  palette.prepare()?;

  let mut out = OwnedImage::new_like(Mode::P, width, height, preallocated)?;
  out.set_palette(Palette::browser());

  if dither {
    quantize_dithered(&mut out, src, &mut palette)?;
  } else {
    quantize_closest(&mut out, src, &mut palette);
  }

  palette.discard();
  Ok(out)
}

fn quantize_closest(out: &mut dyn ImageBuffer, src: &dyn ImageBuffer, palette: &mut Palette) {
  let (width, height) = (src.width(), src.height());
  for y in 0..height {
    let src_row = src.row_bytes(y);
    let out_row = out.row_indices_mut(y);
    for x in 0..width {
      let px = &src_row[x * 4..x * 4 + 4];
      out_row[x] = palette.nearest(px[0], px[1], px[2]);
    }
  }
}

/// The Floyd–Steinberg variant (dither on): a two-row scratch array carries
/// error into the next row, an in-row accumulator carries error not yet
/// applied within the current row — the "clearer" two-row-array form
/// spec.md §9 licenses as an alternative to the source's triple-accumulator
/// state machine.
fn quantize_dithered(
  out: &mut dyn ImageBuffer, src: &dyn ImageBuffer, palette: &mut Palette,
) -> Result<(), ConvertError> {
  let (width, height) = (src.width(), src.height());
  let mut err_curr: Vec<[i32; 3]> = {
    let mut v = Vec::new();
    v.try_reserve(width).map_err(|_| ConvertError::OutOfMemory)?;
    v.resize(width, [0i32; 3]);
    v
  };
  let mut err_next: Vec<[i32; 3]> = {
    let mut v = Vec::new();
    v.try_reserve(width).map_err(|_| ConvertError::OutOfMemory)?;
    v.resize(width, [0i32; 3]);
    v
  };

  for y in 0..height {
    let src_row = src.row_bytes(y);
    for x in 0..width {
      let px = &src_row[x * 4..x * 4 + 4];
      let mut corrected = [0i32; 3];
      for c in 0..3 {
        corrected[c] = clamp_i32(px[c] as i32 + err_curr[x][c]);
      }

      let idx = palette.nearest(corrected[0] as u8, corrected[1] as u8, corrected[2] as u8);
      out.row_indices_mut(y)[x] = idx;

      let chosen: Rgba8 = palette.get(idx);
      let chosen_rgb = [chosen.r as i32, chosen.g as i32, chosen.b as i32];

      for c in 0..3 {
        let residual = corrected[c] - chosen_rgb[c];
        if x + 1 < width {
          err_curr[x + 1][c] += (residual * 7) / 16;
          err_next[x + 1][c] += residual / 16;
        }
        if x > 0 {
          err_next[x - 1][c] += (residual * 3) / 16;
        }
        err_next[x][c] += (residual * 5) / 16;
      }
    }
    err_curr.copy_from_slice(&err_next);
    err_next.iter_mut().for_each(|e| *e = [0; 3]);
  }
  Ok(())
}

#[inline]
fn clamp_i32(v: i32) -> i32 {
  v.clamp(0, 255)
}
