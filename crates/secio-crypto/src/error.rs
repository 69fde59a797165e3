//! Error types for secio cryptographic operations.

use secio_proto::{KeyType, ProtocolError};
use thiserror::Error;

/// Errors from negotiation, signing, key agreement, and channel crypto.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The two preference lists share no algorithm
    #[error("no common {category}: local offers {local:?}, remote offers {remote:?}")]
    NoCommonAlgorithm {
        /// Algorithm family ("exchange", "cipher", "hash")
        category: &'static str,
        /// Local list as sent
        local: String,
        /// Remote list as received
        remote: String,
    },

    /// Sign or verify requested for a key algorithm without an implementation
    #[error("unsupported key type: {0:?}")]
    UnsupportedKeyType(KeyType),

    /// Signature did not verify against the claimed identity
    #[error("signature verification failed")]
    InvalidSignature,

    /// Serialized identity key could not be parsed
    #[error("invalid public key: {reason}")]
    InvalidPublicKey {
        /// Parser error text
        reason: String,
    },

    /// Peer's ephemeral point is not on the negotiated curve
    #[error("invalid ephemeral public key for {curve}")]
    InvalidEphemeralKey {
        /// Curve wire name
        curve: &'static str,
    },

    /// Key or IV of the wrong length for the cipher
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Frame MAC did not match
    #[error("MAC verification failed")]
    MacMismatch,

    /// Frame too short to hold a MAC tag
    #[error("frame of {actual} bytes is shorter than the {tag_size}-byte MAC")]
    FrameTooShort {
        /// Received frame length
        actual: usize,
        /// MAC tag length for the negotiated hash
        tag_size: usize,
    },

    /// Key serialization or signing failed inside the backend
    #[error("key operation failed: {0}")]
    KeyOperation(String),
}

impl CryptoError {
    /// Returns true if the error means the peer failed authentication or
    /// sent tampered data, as opposed to a local capability gap.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::MacMismatch | Self::FrameTooShort { .. })
    }
}

impl From<ProtocolError> for CryptoError {
    fn from(err: ProtocolError) -> Self {
        Self::InvalidPublicKey { reason: err.to_string() }
    }
}
