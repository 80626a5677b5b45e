//! Shufflers between [`Mode::I`](crate::mode::Mode::I) and
//! [`Mode::F`](crate::mode::Mode::F), and their saturating narrowing back
//! to [`Mode::L`](crate::mode::Mode::L).

use super::clip_u8;

#[inline]
pub(crate) fn i_to_l(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let v = i32::from_ne_bytes(src[x * 4..x * 4 + 4].try_into().unwrap());
    dst[x] = clip_u8(v);
  }
}

#[inline]
pub(crate) fn i_to_f(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let v = i32::from_ne_bytes(src[x * 4..x * 4 + 4].try_into().unwrap());
    let f = v as f32;
    dst[x * 4..x * 4 + 4].copy_from_slice(&f.to_ne_bytes());
  }
}

#[inline]
pub(crate) fn f_to_l(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let v = f32::from_ne_bytes(src[x * 4..x * 4 + 4].try_into().unwrap());
    dst[x] = if v <= 0.0 {
      0
    } else if v >= 255.0 {
      255
    } else {
      v as u8
    };
  }
}

#[inline]
pub(crate) fn f_to_i(dst: &mut [u8], src: &[u8], width: usize) {
  for x in 0..width {
    let v = f32::from_ne_bytes(src[x * 4..x * 4 + 4].try_into().unwrap());
    let i = v as i32;
    dst[x * 4..x * 4 + 4].copy_from_slice(&i.to_ne_bytes());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec::Vec;

  #[test]
  fn i_to_l_clips_to_0_255() {
    let mut dst = [0u8; 3];
    let src: Vec<u8> =
      [(-10i32), 128, 9000].iter().flat_map(|v| v.to_ne_bytes()).collect();
    i_to_l(&mut dst, &src, 3);
    assert_eq!(dst, [0, 128, 255]);
  }

  #[test]
  fn f_to_l_truncates_and_clips() {
    let mut dst = [0u8; 3];
    let src: Vec<u8> =
      [(-1.5f32), 127.9, 1000.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
    f_to_l(&mut dst, &src, 3);
    assert_eq!(dst, [0, 127, 255]);
  }
}
