//! Pixel-format conversion engine: mode×mode dispatch, palette
//! quantization with Floyd–Steinberg dithering, and bilevel dithering.
//!
//! The entry point is [`convert::convert`]; [`mode::Mode`] enumerates the
//! closed set of pixel layouts the engine understands, and [`image`]
//! supplies the `ImageBuffer` collaborator contract plus the owned
//! `Bitmap`/`Palmap` containers.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Prints a diagnostic line (file, line number, then the formatted
/// message) when the `trace` feature is enabled; a silent no-op otherwise.
#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

pub mod convert;
pub mod dither;
pub mod error;
pub mod image;
pub mod mode;
pub mod palette;
pub mod quantize;
mod shuffle;

pub use convert::{convert, convert_like};
pub use error::ConvertError;
pub use image::{Bitmap, ImageBuffer, OwnedImage, Palmap};
pub use mode::Mode;
pub use palette::{Palette, Rgba8};
