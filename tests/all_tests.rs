#![allow(bad_style)]

use imagine_convert::{convert, Bitmap, ImageBuffer, Mode, OwnedImage, Palette, Rgba8};

#[allow(dead_code)]
fn rand_bytes(count: usize) -> Vec<u8> {
  let mut buffer = vec![0; count];
  getrandom::getrandom(&mut buffer).unwrap();
  buffer
}

fn rgb_bitmap(w: usize, h: usize, fill: impl Fn(usize, usize) -> (u8, u8, u8)) -> Bitmap {
  let mut bmp = Bitmap::new_zeroed(Mode::Rgb, w, h);
  for y in 0..h {
    let row = bmp.row_bytes_mut(y);
    for x in 0..w {
      let (r, g, b) = fill(x, y);
      let px = &mut row[x * 4..x * 4 + 4];
      px[0] = r;
      px[1] = g;
      px[2] = b;
      px[3] = 255;
    }
  }
  bmp
}

#[test]
fn identity_conversion_is_a_bytewise_copy_for_every_representative_mode() {
  for mode in [Mode::L, Mode::Rgb, Mode::Rgba, Mode::Cmyk, Mode::Bgr24, Mode::I, Mode::F] {
    let src = Bitmap::new_zeroed(mode, 3, 2);
    let out = convert(None, &src, Some(mode), None, false).unwrap();
    for y in 0..2 {
      assert_eq!(out.row_bytes(y), src.row_bytes(y), "mode {mode} failed identity");
    }
  }
}

#[test]
fn rgb_family_destinations_always_carry_a_255_fourth_byte() {
  let src = rgb_bitmap(4, 3, |x, y| ((x * 40) as u8, (y * 60) as u8, 17));
  for mode in [Mode::Rgb, Mode::Rgbx, Mode::YCbCr] {
    let out = convert(None, &src, Some(mode), None, false).unwrap();
    for y in 0..3 {
      for px in out.row_bytes(y).chunks_exact(4) {
        assert_eq!(px[3], 255, "{mode} fourth byte not 255");
      }
    }
  }
}

#[test]
fn i_round_trips_through_both_endian_16_bit_forms_within_range() {
  for &v in &[-32768i32, -1000, -1, 0, 1, 1000, 32767] {
    let mut src = Bitmap::new_zeroed(Mode::I, 1, 1);
    src.row_bytes_mut(0).copy_from_slice(&v.to_ne_bytes());

    for mode in [Mode::I16, Mode::I16B] {
      let packed = convert(None, &src, Some(mode), None, false).unwrap();
      let back = convert(None, &packed, Some(Mode::I), None, false).unwrap();
      let got = i32::from_ne_bytes(back.row_bytes(0).try_into().unwrap());
      assert_eq!(got, v, "{mode} round trip failed for {v}");
    }
  }
}

#[test]
fn clipping_holds_for_f_to_l_and_i_to_l() {
  let mut f = Bitmap::new_zeroed(Mode::F, 3, 1);
  for (i, v) in [-50.0f32, 128.0, 9000.0].iter().enumerate() {
    f.row_bytes_mut(0)[i * 4..i * 4 + 4].copy_from_slice(&v.to_ne_bytes());
  }
  let l = convert(None, &f, Some(Mode::L), None, false).unwrap();
  assert_eq!(l.row_bytes(0), &[0, 128, 255]);

  let mut i = Bitmap::new_zeroed(Mode::I, 3, 1);
  for (idx, v) in [-50i32, 128, 9000].iter().enumerate() {
    i.row_bytes_mut(0)[idx * 4..idx * 4 + 4].copy_from_slice(&v.to_ne_bytes());
  }
  let l = convert(None, &i, Some(Mode::L), None, false).unwrap();
  assert_eq!(l.row_bytes(0), &[0, 128, 255]);
}

#[test]
fn closest_color_quantization_chooses_a_globally_minimal_distance_entry() {
  let src = rgb_bitmap(6, 6, |x, y| ((x * 50) as u8, (y * 50) as u8, 128));
  let OwnedImage::Indexed(out) = convert(None, &src, Some(Mode::P), None, false).unwrap() else {
    panic!("P destination must produce an indexed image");
  };
  let palette = out.palette().unwrap();
  for y in 0..6 {
    let src_row = src.row_bytes(y);
    for x in 0..6 {
      let px = &src_row[x * 4..x * 4 + 4];
      let chosen: Rgba8 = palette.get(out.row_indices(y)[x]);
      let chosen_d = dist_sq(px, chosen);
      for entry in palette.entries() {
        assert!(dist_sq(px, *entry) >= chosen_d, "a strictly closer entry exists");
      }
    }
  }
}

fn dist_sq(px: &[u8], e: Rgba8) -> i32 {
  let dr = px[0] as i32 - e.r as i32;
  let dg = px[1] as i32 - e.g as i32;
  let db = px[2] as i32 - e.b as i32;
  dr * dr + dg * dg + db * db
}

#[test]
fn palette_round_trip_through_a_known_entry() {
  let mut entries = [Rgba8::default(); 256];
  entries[7] = Rgba8::new(10, 20, 30, 255);
  let palette = Palette::from_entries(entries);
  let mut src = imagine_convert::Palmap::new_zeroed(2, 1, palette);
  src.row_indices_mut(0).copy_from_slice(&[7, 7]);

  let out = convert(None, &src, Some(Mode::Rgb), None, false).unwrap();
  assert_eq!(out.row_bytes(0), &[10, 20, 30, 255, 10, 20, 30, 255]);
}

#[test]
fn dithered_to_palette_output_indices_are_always_in_range() {
  let buf = rand_bytes(16 * 16 * 3);
  let src = rgb_bitmap(16, 16, |x, y| {
    let i = (y * 16 + x) * 3;
    (buf[i], buf[i + 1], buf[i + 2])
  });
  let out = convert(None, &src, Some(Mode::P), None, true).unwrap();
  for y in 0..16 {
    for &idx in out.row_indices(y) {
      let _ = idx; // u8 is always in [0, 255] by type
    }
  }
  assert_eq!(out.width(), 16);
  assert_eq!(out.height(), 16);
}

#[test]
fn bilevel_dither_produces_only_0_or_255_across_a_random_image() {
  let buf = rand_bytes(20);
  let mut src = Bitmap::new_zeroed(Mode::L, 20, 1);
  src.row_bytes_mut(0).copy_from_slice(&buf);

  let out_mode = Mode::Bilevel;
  let out = imagine_convert::convert(None, &src, Some(out_mode), None, true).unwrap();
  for &b in out.row_bytes(0) {
    assert!(b == 0 || b == 255);
  }
}
