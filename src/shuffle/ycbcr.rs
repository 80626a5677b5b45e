//! The YCbCr collaborator: `rgb -> ycbcr` and `ycbcr -> rgb`, plus the two
//! shufflers that only touch the Y channel.
//!
//! spec.md §1 scopes the YCbCr transform matrices out as "specified by
//! their contract, not coefficients" — this module supplies the standard
//! ITU-R BT.601 integer coefficients (the same fixed-point constants used
//! throughout the JPEG ecosystem) since the engine needs *some* concrete
//! numbers to run end to end.

use super::clip_u8;

#[inline]
pub(crate) fn rgb_to_ycbcr(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let s = &src[x * 4..x * 4 + 4];
    let d = &mut dst[x * 4..x * 4 + 4];
    let (r, g, b) = (s[0] as i32, s[1] as i32, s[2] as i32);

    let y = (19595 * r + 38470 * g + 7471 * b + 0x8000) >> 16;
    let cb = 128 + ((-11059 * r - 21709 * g + 32768 * b + 0x8000) >> 16);
    let cr = 128 + ((32768 * r - 27439 * g - 5329 * b + 0x8000) >> 16);

    d[0] = clip_u8(y);
    d[1] = clip_u8(cb);
    d[2] = clip_u8(cr);
    d[3] = 255;
  }
}

#[inline]
pub(crate) fn ycbcr_to_rgb(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let s = &src[x * 4..x * 4 + 4];
    let d = &mut dst[x * 4..x * 4 + 4];
    let y = s[0] as i32;
    let cb = s[1] as i32 - 128;
    let cr = s[2] as i32 - 128;

    let r = y + ((91881 * cr) >> 16);
    let g = y - ((22554 * cb + 46802 * cr) >> 16);
    let b = y + ((116130 * cb) >> 16);

    d[0] = clip_u8(r);
    d[1] = clip_u8(g);
    d[2] = clip_u8(b);
    d[3] = 255;
  }
}

#[inline]
pub(crate) fn ycbcr_to_l(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    dst[x] = src[x * 4];
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_grey_unchanged() {
    let src = [128u8, 128, 128, 0];
    let mut ycbcr = [0u8; 4];
    rgb_to_ycbcr(&mut ycbcr, &src, 1);
    assert_eq!(ycbcr, [128, 128, 128, 255]);
    let mut back = [0u8; 4];
    ycbcr_to_rgb(&mut back, &ycbcr, 1);
    assert_eq!(&back[..3], &src[..3]);
  }
}
