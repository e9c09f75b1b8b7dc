//! Error types for MC protocol communication.

use std::io;
use thiserror::Error;

/// Result type alias for MC protocol operations.
pub type Result<T> = std::result::Result<T, McError>;

/// Errors that can occur during MC protocol communication.
#[derive(Debug, Error)]
pub enum McError {
    /// Invalid client configuration (bad port, bad address).
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error.
        reason: String,
    },

    /// The element width is outside the range the operation accepts.
    #[error("Unsupported element width: {width} bytes (accepted {min}-{max})")]
    UnsupportedElementWidth {
        /// Byte width of the requested element type.
        width: usize,
        /// Minimum accepted width.
        min: usize,
        /// Maximum accepted width.
        max: usize,
    },

    /// A read or write was requested with zero elements.
    #[error("No data: {operation} requires at least one element")]
    EmptyInput {
        /// Name of the rejecting operation parameter.
        operation: &'static str,
    },

    /// Parallel point/value arrays have different lengths.
    #[error("Size mismatch: {points} points but {values} values")]
    SizeMismatch {
        /// Number of point addresses supplied.
        points: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A bit array requiring two-per-byte packing has odd length.
    #[error("Odd-size bit array: {len} bits (packing requires an even count)")]
    OddSizeArray {
        /// Length of the rejected array.
        len: usize,
    },

    /// I/O error from the underlying transport, propagated verbatim.
    #[error("Transport failure: {0}")]
    Transport(#[from] io::Error),

    /// Response buffer shorter than the protocol variant's minimum.
    #[error("Response too short: {len} bytes (minimum {min})")]
    ResponseTooShort {
        /// Actual buffer length.
        len: usize,
        /// Minimum valid length for the frame variant.
        min: usize,
    },

    /// Response does not start with the expected header byte.
    #[error("Response header corrupt: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ResponseHeaderCorrupt {
        /// Header byte the frame variant expects.
        expected: u8,
        /// Byte actually received.
        actual: u8,
    },

    /// Nonzero end code returned by the controller.
    #[error("Controller returned error code 0x{code:04X}")]
    ControllerError {
        /// End code from the response frame.
        code: u16,
    },

    /// Declared length field disagrees with the actual buffer size.
    #[error("Response length corrupt: declared {declared} bytes, buffer is {actual}")]
    ResponseLengthCorrupt {
        /// Length declared inside the frame.
        declared: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Operation attempted after the client was closed.
    #[error("Client is closed")]
    ClientClosed,
}

impl McError {
    /// Creates a new `InvalidConfiguration` error.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Returns the controller end code if this is a `ControllerError`.
    pub fn controller_code(&self) -> Option<u16> {
        match self {
            Self::ControllerError { code } => Some(*code),
            _ => None,
        }
    }
}
