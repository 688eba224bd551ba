//! Error types for bitmap decoding and compositing.
use thiserror::Error;

/// Errors produced while decoding a source bitmap or building a canvas.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file could not be opened or read.
    #[cfg(feature = "std")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header is shorter than 54 bytes or describes an impossible image.
    #[error("Invalid bitmap header: {0}")]
    InvalidHeader(&'static str),

    /// The file ends before the declared pixel payload.
    #[error("Truncated pixel data: expected {expected} bytes, got {available}")]
    TruncatedPixelData { expected: usize, available: usize },

    /// The decoded payload cannot cover the composite region.
    #[error("Source buffer too small: region needs {required} bytes, got {available}")]
    SourceBufferTooSmall { required: u64, available: usize },

    /// Canvas dimensions are zero or do not fit a DIB.
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

pub type Result<T> = core::result::Result<T, Error>;
