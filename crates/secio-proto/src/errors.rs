//! Error types for wire decoding and framing.

use thiserror::Error;

/// Result alias for wire operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding secio wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Protobuf decoding failed
    #[error("failed to decode {message}: {reason}")]
    Decode {
        /// Message type being decoded
        message: &'static str,
        /// Decoder error text
        reason: String,
    },

    /// A decoded message violated a structural rule
    #[error("invalid {message}: {reason}")]
    InvalidField {
        /// Message type being validated
        message: &'static str,
        /// Which rule was violated
        reason: String,
    },

    /// The serialized public key names a key type this build does not know
    #[error("unknown key type tag: {0}")]
    UnknownKeyType(i32),

    /// Peer's first line did not name the secio protocol
    #[error("protocol mismatch: peer answered {received:?}")]
    ProtocolMismatch {
        /// The line the peer sent (lossy UTF-8)
        received: String,
    },

    /// The first message had no newline terminating the protocol line
    #[error("missing protocol identifier line")]
    MissingProtocolLine,

    /// Frame exceeds configured maximum
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Claimed or actual frame size
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Buffer ended before the frame did
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    FrameTruncated {
        /// Bytes the length prefix promised
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },
}

impl From<prost::DecodeError> for ProtocolError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Decode { message: "protobuf", reason: err.to_string() }
    }
}
