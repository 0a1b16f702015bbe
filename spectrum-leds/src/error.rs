//! Construction-time error types.
//!
//! Only building a pipeline can fail. Once every component has been
//! constructed, the per-frame calls are total over their input shapes.

use thiserror::Error;

/// Errors raised while validating configuration or reserving buffers.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("frame length {0} is not a power of two of at least 2")]
    InvalidSize(usize),

    #[error("{what} must not be zero-length")]
    ZeroLength { what: &'static str },

    #[error("slot count {0} is outside 3..=254")]
    InvalidSlotCount(usize),

    #[error("gain must be finite and positive, got {0}")]
    InvalidGain(f32),

    #[error("smoothing factor must lie in [0, 1), got {0}")]
    InvalidSmoothing(f32),

    #[error("hue span must lie in [240, 360], got {0}")]
    InvalidHueSpan(f32),

    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),

    #[error("failed to reserve {bytes} bytes")]
    Allocation { bytes: usize },
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
