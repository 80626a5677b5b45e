//! Bilevel error-diffusion binarization (C6): `L`/`RGB`-family `-> 1` with
//! dithering on.

use alloc::vec::Vec;

use crate::error::ConvertError;
use crate::image::ImageBuffer;
use crate::mode::Mode;
use crate::shuffle::luma;

/// Binarizes `src` (`L` or an RGB-family mode) into `dst` (`1`-mode),
/// applying Floyd–Steinberg error diffusion restricted to one channel.
///
/// For an RGB-family source, the luma `L(rgb)/1000` is taken per pixel
/// before the one-dimensional diffusion loop runs; everything past that
/// point is identical to the `L` path.
///
/// Callers are expected to have already validated that `src.mode()` is `L`
/// or an RGB-family mode and that `dst` is `Bilevel`-shaped like `src` (the
/// driver does this before routing here).
///
/// ## Panics
/// If `src.mode()` is neither `L` nor RGB-family, or if `dst.mode()` isn't
/// `Bilevel`, or the two images don't share a shape.
pub fn dither_to_bilevel(
  dst: &mut dyn ImageBuffer, src: &dyn ImageBuffer,
) -> Result<(), ConvertError> {
  assert_eq!(dst.mode(), Mode::Bilevel);
  assert!(src.mode() == Mode::L || src.mode().is_rgb_family());
  assert_eq!(src.width(), dst.width());
  assert_eq!(src.height(), dst.height());
  crate::trace!("dither_to_bilevel> {}x{} from {:?}", src.width(), src.height(), src.mode());

  let width = src.width();
  let height = src.height();
  let mut err_curr: Vec<i32> = {
    let mut v = Vec::new();
    v.try_reserve(width).map_err(|_| ConvertError::OutOfMemory)?;
    v.resize(width, 0i32);
    v
  };
  let mut err_next: Vec<i32> = {
    let mut v = Vec::new();
    v.try_reserve(width).map_err(|_| ConvertError::OutOfMemory)?;
    v.resize(width, 0i32);
    v
  };

  for y in 0..height {
    let samples = sample_row(src, y, width);
    let dst_row = dst.row_bytes_mut(y);
    for x in 0..width {
      let corrected = samples[x] + err_curr[x];
      let out = if corrected > 128 { 255u8 } else { 0u8 };
      dst_row[x] = out;

      let residual = corrected - out as i32;
      if x + 1 < width {
        err_curr[x + 1] += (residual * 7) / 16;
        err_next[x + 1] += residual / 16;
      }
      if x > 0 {
        err_next[x - 1] += (residual * 3) / 16;
      }
      err_next[x] += (residual * 5) / 16;
    }
    err_curr.copy_from_slice(&err_next);
    err_next.iter_mut().for_each(|e| *e = 0);
  }
  Ok(())
}

fn sample_row(src: &dyn ImageBuffer, y: usize, width: usize) -> Vec<i32> {
  let row = src.row_bytes(y);
  let mut out = Vec::with_capacity(width);
  if src.mode() == Mode::L {
    for x in 0..width {
      out.push(row[x] as i32);
    }
  } else {
    for x in 0..width {
      let px = &row[x * 4..x * 4 + 4];
      out.push(luma(px[0], px[1], px[2]) / 1000);
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::image::Bitmap;

  #[test]
  fn bilevel_output_is_always_0_or_255() {
    let mut src = Bitmap::new_zeroed(Mode::L, 5, 1);
    src.row_bytes_mut(0).copy_from_slice(&[0, 64, 127, 200, 255]);
    let mut dst = Bitmap::new_zeroed(Mode::Bilevel, 5, 1);
    dither_to_bilevel(&mut dst, &src).unwrap();
    for &b in dst.row_bytes(0) {
      assert!(b == 0 || b == 255);
    }
  }

  #[test]
  fn mass_is_conserved_within_width_times_height() {
    let mut src = Bitmap::new_zeroed(Mode::L, 8, 1);
    src.row_bytes_mut(0).copy_from_slice(&[10, 200, 30, 180, 90, 120, 60, 220]);
    let mut dst = Bitmap::new_zeroed(Mode::Bilevel, 8, 1);
    dither_to_bilevel(&mut dst, &src).unwrap();
    let sum_in: i64 = src.row_bytes(0).iter().map(|&b| b as i64).sum();
    let sum_out: i64 = dst.row_bytes(0).iter().map(|&b| b as i64).sum();
    assert!((sum_in - sum_out).unsigned_abs() <= (8 * 255) as u64);
  }

  #[test]
  fn scenario_l_2x1_0_255_to_bilevel() {
    let mut src = Bitmap::new_zeroed(Mode::L, 2, 1);
    src.row_bytes_mut(0).copy_from_slice(&[0, 255]);
    let mut dst = Bitmap::new_zeroed(Mode::Bilevel, 2, 1);
    dither_to_bilevel(&mut dst, &src).unwrap();
    assert_eq!(dst.row_bytes(0), &[0, 255]);
  }
}
