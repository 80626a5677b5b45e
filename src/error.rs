use crate::mode::Mode;

/// An error from a conversion call.
///
/// Every variant maps to one of the three failure kinds the engine exposes:
/// a bad or missing mode, an unsupported `(src, dst)` pair, or an allocation
/// that could not be satisfied. A failed call never returns a partial image;
/// any scratch buffers it acquired are released before the error is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertError {
  /// The mode string given at the public boundary did not match any known
  /// [`Mode`], or a source image with no palette was asked to convert with
  /// a `None` destination mode (which requires one).
  BadMode,

  /// The `(src, dst)` mode pair isn't in the dispatch table and isn't one
  /// of the palette or bilevel-dither special cases.
  ConversionNotSupported {
    /// The source mode that was requested.
    src: Mode,
    /// The destination mode that was requested.
    dst: Mode,
  },

  /// Allocation of the output image, a duplicated palette, the nearest-color
  /// cache, or a scratch error-diffusion row failed.
  OutOfMemory,
}

impl core::fmt::Display for ConvertError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      ConvertError::BadMode => write!(f, "mode is unrecognized or a required palette is absent"),
      ConvertError::ConversionNotSupported { src, dst } => {
        write!(f, "conversion from {src:?} to {dst:?} is not supported")
      }
      ConvertError::OutOfMemory => write!(f, "allocation failed during conversion"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for ConvertError {}
