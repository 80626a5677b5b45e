//! Shufflers between the RGB family and [`Mode::Cmyk`](crate::mode::Mode::Cmyk).
//!
//! No undercolor removal is performed in either direction — explicitly out
//! of scope per spec.md §1.

use super::clip_u8;

/// `RGB/RGBA/RGBX -> CMYK`: `(~r, ~g, ~b, 0)`.
#[inline]
pub(crate) fn rgb_to_cmyk(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let s = &src[x * 4..x * 4 + 4];
    let d = &mut dst[x * 4..x * 4 + 4];
    d[0] = !s[0];
    d[1] = !s[1];
    d[2] = !s[2];
    d[3] = 0;
  }
}

/// `CMYK -> RGB/RGBA/RGBX`: per channel `saturate(255 - (c_i + k))`, alpha
/// forced to 255.
#[inline]
pub(crate) fn cmyk_to_rgb(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let s = &src[x * 4..x * 4 + 4];
    let d = &mut dst[x * 4..x * 4 + 4];
    let k = s[3] as i32;
    d[0] = clip_u8(255 - (s[0] as i32 + k));
    d[1] = clip_u8(255 - (s[1] as i32 + k));
    d[2] = clip_u8(255 - (s[2] as i32 + k));
    d[3] = 255;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cmyk_to_rgb_scenarios_from_spec() {
    let mut dst = [0u8; 4];
    cmyk_to_rgb(&mut dst, &[0, 0, 0, 0], 1);
    assert_eq!(dst, [255, 255, 255, 255]);

    cmyk_to_rgb(&mut dst, &[0, 0, 0, 255], 1);
    assert_eq!(dst, [0, 0, 0, 255]);
  }

  #[test]
  fn rgb_to_cmyk_has_no_black_channel() {
    let mut dst = [0u8; 4];
    rgb_to_cmyk(&mut dst, &[10, 20, 30, 0], 1);
    assert_eq!(dst, [245, 235, 225, 0]);
  }
}
