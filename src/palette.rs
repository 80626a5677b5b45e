//! The 256-entry palette and its sparse nearest-color cache.

use alloc::boxed::Box;
use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};

use crate::error::ConvertError;

/// One palette entry: red/green/blue/alpha, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroable, Pod)]
#[repr(C)]
pub struct Rgba8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba8 {
  /// Builds an entry from its four channels directly.
  #[inline]
  #[must_use]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// Squared Euclidean distance in RGB (alpha excluded) to another entry.
  #[inline]
  #[must_use]
  fn distance_sq(self, r: u8, g: u8, b: u8) -> i32 {
    let dr = i32::from(self.r) - i32::from(r);
    let dg = i32::from(self.g) - i32::from(g);
    let db = i32::from(self.b) - i32::from(b);
    dr * dr + dg * dg + db * db
  }
}

/// Number of bits of each channel kept in a cache cell key.
///
/// spec.md §3 leaves this as an implementation parameter in `4..=6`; `5` is
/// chosen (32 levels per channel, 32,768 cells total), the middle of the
/// allowed range.
const CACHE_BITS: u32 = 5;
const CACHE_LEVELS: usize = 1 << CACHE_BITS;
const CACHE_CELLS: usize = CACHE_LEVELS * CACHE_LEVELS * CACHE_LEVELS;

#[inline]
#[must_use]
const fn cache_index(r: u8, g: u8, b: u8) -> usize {
  let shift = 8 - CACHE_BITS;
  let rq = (r as usize) >> shift;
  let gq = (g as usize) >> shift;
  let bq = (b as usize) >> shift;
  (rq * CACHE_LEVELS + gq) * CACHE_LEVELS + bq
}

/// The center of the cell a given quantized coordinate addresses, used when
/// populating a cache entry (spec.md §4.3: "the palette index minimizing
/// squared Euclidean distance in RGB to the cell center").
#[inline]
#[must_use]
const fn cell_center(quantized: usize) -> u8 {
  let shift = 8 - CACHE_BITS;
  let lo = (quantized << shift) as u32;
  let hi = lo + (1 << shift) - 1;
  ((lo + hi) / 2) as u8
}

/// A fixed 256-entry RGBA palette, plus a lazily-filled nearest-color cache.
///
/// The cache is the `Uninitialized -> Ready -> Uninitialized` state machine
/// of spec.md §4.6: [`prepare`](Palette::prepare) allocates and zeros it,
/// [`lookup`](Palette::lookup)/[`update`](Palette::update) fill individual
/// cells, and [`discard`](Palette::discard) releases it. Conversions that
/// use the cache always bracket their use between `prepare` and `discard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
  entries: [Rgba8; 256],
  cache: Option<Box<[Option<u8>; CACHE_CELLS]>>,
}

impl Palette {
  /// A palette with all 256 entries set to opaque black.
  #[must_use]
  pub fn new_zeroed() -> Self {
    Palette { entries: [Rgba8::default(); 256], cache: None }
  }

  /// Builds a palette from 256 explicit entries.
  #[must_use]
  pub fn from_entries(entries: [Rgba8; 256]) -> Self {
    Palette { entries, cache: None }
  }

  /// The greyscale ramp palette: entry `i` is `(i, i, i, 255)`.
  ///
  /// Used by the quantizer (spec.md §4.4 step 1) when the source of a
  /// `to-palette` conversion is single-band.
  #[must_use]
  pub fn greyscale_ramp() -> Self {
    let mut entries = [Rgba8::default(); 256];
    let mut i = 0usize;
    while i < 256 {
      let v = i as u8;
      entries[i] = Rgba8::new(v, v, v, 255);
      i += 1;
    }
    Palette::from_entries(entries)
  }

  /// The "browser" color cube: a fixed 6x6x6 web-safe color cube, padded
  /// out to 256 entries with a grey ramp.
  ///
  /// This reproduces the reference `ImagingPaletteNewBrowser` palette: the
  /// 216 combinations of the six levels `{0, 51, 102, 153, 204, 255}` in
  /// `r, g, b` order, followed by 40 additional grey-ramp entries filling
  /// out the remaining palette slots.
  #[must_use]
  pub fn browser() -> Self {
    const LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
    let mut entries = [Rgba8::default(); 256];
    let mut i = 0usize;
    while i < 216 {
      let r = LEVELS[i / 36];
      let g = LEVELS[(i / 6) % 6];
      let b = LEVELS[i % 6];
      entries[i] = Rgba8::new(r, g, b, 255);
      i += 1;
    }
    let remaining = 256 - 216;
    let mut j = 0usize;
    while j < remaining {
      let v = ((j * 255) / (remaining - 1)) as u8;
      entries[216 + j] = Rgba8::new(v, v, v, 255);
      j += 1;
    }
    Palette::from_entries(entries)
  }

  /// This palette's 256 entries.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[Rgba8; 256] {
    &self.entries
  }

  /// Expands index `i` to its RGBA entry.
  #[inline]
  #[must_use]
  pub fn get(&self, i: u8) -> Rgba8 {
    self.entries[i as usize]
  }

  /// Allocates and zeros the nearest-color cache grid. Idempotent: calling
  /// this on an already-`Ready` palette just re-zeros the grid.
  ///
  /// Reports [`ConvertError::OutOfMemory`] rather than aborting if the
  /// backing allocation can't be satisfied.
  pub fn prepare(&mut self) -> Result<(), ConvertError> {
    let mut cells = Vec::new();
    cells.try_reserve(CACHE_CELLS).map_err(|_| ConvertError::OutOfMemory)?;
    cells.resize(CACHE_CELLS, None);
    let boxed: Box<[Option<u8>; CACHE_CELLS]> =
      cells.try_into().unwrap_or_else(|_: Vec<Option<u8>>| unreachable!("length matches"));
    self.cache = Some(boxed);
    Ok(())
  }

  /// Releases the cache grid, returning the palette to `Uninitialized`.
  pub fn discard(&mut self) {
    self.cache = None;
  }

  /// Addresses the cache cell quantized `(r, g, b)` falls into.
  ///
  /// ## Panics
  /// If [`prepare`](Palette::prepare) hasn't been called.
  #[inline]
  #[must_use]
  pub fn lookup(&mut self, r: u8, g: u8, b: u8) -> Option<u8> {
    let idx = cache_index(r, g, b);
    self.cache.as_ref().expect("palette cache not prepared")[idx]
  }

  /// Fills the cache cell for quantized `(r, g, b)` with the palette index
  /// minimizing squared Euclidean distance to the cell center, breaking
  /// ties by lowest index. Once filled, a cell is never invalidated while
  /// the palette's entries stay fixed.
  ///
  /// ## Panics
  /// If [`prepare`](Palette::prepare) hasn't been called.
  pub fn update(&mut self, r: u8, g: u8, b: u8) -> u8 {
    let shift = 8 - CACHE_BITS;
    let cr = cell_center((r as usize) >> shift);
    let cg = cell_center((g as usize) >> shift);
    let cb = cell_center((b as usize) >> shift);

    let mut best_index = 0u8;
    let mut best_distance = i32::MAX;
    for (i, entry) in self.entries.iter().enumerate() {
      let d = entry.distance_sq(cr, cg, cb);
      if d < best_distance {
        best_distance = d;
        best_index = i as u8;
      }
    }

    let idx = cache_index(r, g, b);
    self.cache.as_mut().expect("palette cache not prepared")[idx] = Some(best_index);
    best_index
  }

  /// `lookup`, falling back to `update` on a cache miss — the sequence
  /// every quantizer pixel performs.
  #[inline]
  pub fn nearest(&mut self, r: u8, g: u8, b: u8) -> u8 {
    match self.lookup(r, g, b) {
      Some(i) => i,
      None => self.update(r, g, b),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn greyscale_ramp_entry_i_is_i_i_i() {
    let pal = Palette::greyscale_ramp();
    assert_eq!(pal.get(0), Rgba8::new(0, 0, 0, 255));
    assert_eq!(pal.get(128), Rgba8::new(128, 128, 128, 255));
    assert_eq!(pal.get(255), Rgba8::new(255, 255, 255, 255));
  }

  #[test]
  fn browser_palette_has_256_distinct_opaque_entries() {
    let pal = Palette::browser();
    for e in pal.entries() {
      assert_eq!(e.a, 255);
    }
  }

  #[test]
  fn update_is_idempotent_for_the_same_cell() {
    let mut pal = Palette::browser();
    pal.prepare().unwrap();
    let first = pal.update(250, 250, 250);
    let second = pal.lookup(250, 250, 250);
    assert_eq!(Some(first), second);
    pal.discard();
  }

  #[test]
  fn update_picks_the_true_nearest_entry() {
    let mut pal = Palette::from_entries({
      let mut e = [Rgba8::default(); 256];
      e[0] = Rgba8::new(0, 0, 0, 255);
      e[1] = Rgba8::new(255, 255, 255, 255);
      e
    });
    pal.prepare().unwrap();
    let idx = pal.nearest(250, 250, 250);
    assert_eq!(idx, 1);
    pal.discard();
  }
}
