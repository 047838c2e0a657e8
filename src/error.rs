//! Error types for encoder construction and setup.

use core::fmt;

/// Errors that can occur while wiring up or priming an encoder.
///
/// Decoding problems at run time are not errors in this sense: they raise
/// the encoder's sticky flag and are read back with `consume_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError<E> {
    /// Underlying pin or port failure.
    Source(E),

    /// The sample source tracks a different number of lines than the decoder.
    LineCount {
        /// Lines the decoder needs.
        expected: u8,
        /// Lines the source provides.
        found: u8,
    },

    /// Port mask is zero or its bits are not contiguous.
    InvalidMask,
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Source(e) => write!(f, "Sample source error: {:?}", e),
            EncoderError::LineCount { expected, found } => write!(
                f,
                "Sample source has {} lines, decoder needs {}",
                found, expected
            ),
            EncoderError::InvalidMask => write!(f, "Port mask must be non-zero and contiguous"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Source(e) => defmt::write!(f, "Sample source error: {}", e),
            EncoderError::LineCount { expected, found } => defmt::write!(
                f,
                "Sample source has {} lines, decoder needs {}",
                found,
                expected
            ),
            EncoderError::InvalidMask => defmt::write!(f, "Invalid port mask"),
        }
    }
}
