//! The dispatch & driver (C3): validates modes, routes the palette and
//! bilevel-dither special cases, otherwise walks the row shuffler table.

use crate::dither::dither_to_bilevel;
use crate::error::ConvertError;
use crate::image::{ImageBuffer, OwnedImage};
use crate::mode::Mode;
use crate::palette::Palette;
use crate::quantize::{from_palette, to_palette};
use crate::shuffle;

/// Converts `src` to `dst_mode`, following the six steps of the dispatch
/// driver:
///
/// 1. A `None` `dst_mode` requires a palette-mode `src`; the destination
///    becomes the palette's own pixel mode (always `Mode::Rgba` here, since
///    that's what this crate's palette entries expand to).
/// 2. If the resolved destination mode equals `src`'s mode, this is a plain
///    copy.
/// 3. A palette-mode `src` routes to [`from_palette`].
/// 4. A palette-mode destination routes to [`to_palette`] (`dither` selects
///    the variant).
/// 5. A `Bilevel` destination with `dither` set routes to
///    [`dither_to_bilevel`].
/// 6. Otherwise, look up `(src, dst)` in the row shuffler table and walk
///    rows; an absent pair is [`ConvertError::ConversionNotSupported`].
///
/// `palette` is accepted for API symmetry with the collaborator contract
/// but is not consulted: per spec.md §9 (a preserved behavior of the
/// reference implementation), `to_palette` always synthesizes its own
/// palette from the source's band count.
pub fn convert(
  preallocated: Option<OwnedImage>, src: &dyn ImageBuffer, dst_mode: Option<Mode>,
  _palette: Option<&Palette>, dither: bool,
) -> Result<OwnedImage, ConvertError> {
  let dst_mode = match dst_mode {
    Some(m) => m,
    None => {
      if src.mode() != Mode::P {
        return Err(ConvertError::BadMode);
      }
      Mode::Rgba
    }
  };
  crate::trace!("convert> {:?} -> {:?} (dither={})", src.mode(), dst_mode, dither);

  if dst_mode == src.mode() {
    return OwnedImage::copy(preallocated, src);
  }

  if src.mode() == Mode::P {
    return from_palette(preallocated, src, dst_mode);
  }

  if dst_mode == Mode::P {
    if src.mode() != Mode::L && !src.mode().is_rgb_family() {
      return Err(ConvertError::ConversionNotSupported { src: src.mode(), dst: dst_mode });
    }
    return to_palette(preallocated, src, dither);
  }

  if dst_mode == Mode::Bilevel && dither {
    if src.mode() != Mode::L && !src.mode().is_rgb_family() {
      return Err(ConvertError::ConversionNotSupported { src: src.mode(), dst: dst_mode });
    }
    let mut out =
      OwnedImage::new_like(Mode::Bilevel, src.width(), src.height(), preallocated)?;
    dither_to_bilevel(&mut out, src)?;
    return Ok(out);
  }

  let shuffler = shuffle::find(src.mode(), dst_mode)
    .ok_or(ConvertError::ConversionNotSupported { src: src.mode(), dst: dst_mode })?;

  let mut out = OwnedImage::new_like(dst_mode, src.width(), src.height(), preallocated)?;
  for y in 0..src.height() {
    shuffler(out.row_bytes_mut(y), src.row_bytes(y), src.width());
  }
  Ok(out)
}

/// Re-converts `src` into `dst`'s own mode, with no dithering and no
/// caller-supplied palette — a thin convenience wrapper over [`convert`]
/// mirroring the reference implementation's `ImagingConvert2`.
pub fn convert_like(dst: &mut dyn ImageBuffer, src: &dyn ImageBuffer) -> Result<(), ConvertError> {
  let result = convert(None, src, Some(dst.mode()), None, false)?;
  for y in 0..dst.height() {
    dst.row_bytes_mut(y).copy_from_slice(result.row_bytes(y));
  }
  if let Some(palette) = result.palette() {
    dst.set_palette(palette.clone());
  }
  Ok(())
}
