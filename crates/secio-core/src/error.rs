//! Error types for the secio handshake and secure session.
//!
//! Every handshake stage fails closed: the first error aborts the whole
//! handshake and all partial state is dropped with it. Lower layers keep
//! their own error types; `From` conversions lift them into
//! [`SecioError`] at the stage boundary.

use std::{io, time::Duration};

use secio_crypto::CryptoError;
use secio_proto::{KeyType, ProtocolError};
use thiserror::Error;

/// Errors from the underlying message transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Peer closed the connection
    #[error("connection closed by peer")]
    Closed,

    /// Transport reported zero bytes for a send or an empty receive
    #[error("transport returned nothing on {operation}")]
    Empty {
        /// "send" or "receive"
        operation: &'static str,
    },

    /// Length prefix exceeded the frame limit or the stream ended mid-frame
    #[error("framing error: {0}")]
    Framing(#[from] ProtocolError),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that abort a handshake or close a secure session.
#[derive(Error, Debug)]
pub enum SecioError {
    /// Transport send/receive failed or the connection closed
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    /// Peer did not open with the secio protocol line
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(String),

    /// Propose, Exchange, or a key inside them failed to decode
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// No algorithm in common for one category
    #[error("no common {category}: local offers {local:?}, remote offers {remote:?}")]
    NegotiationFailed {
        /// Algorithm family ("exchange", "cipher", "hash")
        category: &'static str,
        /// Local list as sent
        local: String,
        /// Remote list as received
        remote: String,
    },

    /// Sign or verify requested for an unimplemented key algorithm
    #[error("unsupported key type: {0:?}")]
    UnsupportedKeyType(KeyType),

    /// Peer's Exchange signature did not verify
    #[error("exchange signature verification failed")]
    SignatureInvalid,

    /// A secure frame failed MAC verification
    #[error("secure frame tampered or corrupted")]
    TamperedOrCorrupted,

    /// The nonce echo after key setup did not match
    #[error("handshake confirmation failed: {reason}")]
    HandshakeConfirmationFailed {
        /// What went wrong
        reason: String,
    },

    /// Handshake did not complete within the configured deadline
    #[error("handshake timeout after {elapsed:?}")]
    Timeout {
        /// How long we waited
        elapsed: Duration,
    },

    /// Session was used after a fatal error closed it
    #[error("secure session is closed")]
    SessionClosed,

    /// Local key setup failed (bug or misconfigured key material)
    #[error("internal error: {0}")]
    Internal(String),
}

impl SecioError {
    /// Returns true if a fresh handshake attempt may succeed.
    ///
    /// Timeouts and transport failures can clear up on retry. Everything
    /// else means the peer is incompatible, misbehaving, or an attacker.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::TransportFailure(_))
    }
}

impl From<ProtocolError> for SecioError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::ProtocolMismatch { .. } | ProtocolError::MissingProtocolLine => {
                Self::ProtocolMismatch(err.to_string())
            },
            other => Self::MalformedMessage(other.to_string()),
        }
    }
}

impl From<CryptoError> for SecioError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::NoCommonAlgorithm { category, local, remote } => {
                Self::NegotiationFailed { category, local, remote }
            },
            CryptoError::UnsupportedKeyType(kind) => Self::UnsupportedKeyType(kind),
            CryptoError::InvalidSignature => Self::SignatureInvalid,
            CryptoError::InvalidPublicKey { .. } | CryptoError::InvalidEphemeralKey { .. } => {
                Self::MalformedMessage(err.to_string())
            },
            CryptoError::MacMismatch | CryptoError::FrameTooShort { .. } => Self::TamperedOrCorrupted,
            CryptoError::InvalidKeyLength { .. } | CryptoError::KeyOperation(_) => {
                Self::Internal(err.to_string())
            },
        }
    }
}

/// Convert `SecioError` to `io::Error` for callers on io-style APIs.
impl From<SecioError> for io::Error {
    fn from(err: SecioError) -> Self {
        let kind = match &err {
            SecioError::TransportFailure(TransportError::Io(inner)) => inner.kind(),
            SecioError::TransportFailure(TransportError::Closed) => io::ErrorKind::UnexpectedEof,
            SecioError::TransportFailure(_) => io::ErrorKind::Other,
            SecioError::Timeout { .. } => io::ErrorKind::TimedOut,
            SecioError::SessionClosed => io::ErrorKind::NotConnected,
            SecioError::ProtocolMismatch(_)
            | SecioError::MalformedMessage(_)
            | SecioError::SignatureInvalid
            | SecioError::TamperedOrCorrupted
            | SecioError::HandshakeConfirmationFailed { .. } => io::ErrorKind::InvalidData,
            SecioError::NegotiationFailed { .. } | SecioError::UnsupportedKeyType(_) => {
                io::ErrorKind::Unsupported
            },
            SecioError::Internal(_) => io::ErrorKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_transport_failures_are_transient() {
        assert!(SecioError::Timeout { elapsed: Duration::from_secs(30) }.is_transient());
        assert!(SecioError::TransportFailure(TransportError::Closed).is_transient());
    }

    #[test]
    fn authentication_failures_are_fatal() {
        assert!(!SecioError::SignatureInvalid.is_transient());
        assert!(!SecioError::TamperedOrCorrupted.is_transient());
        assert!(!SecioError::HandshakeConfirmationFailed { reason: "mismatch".into() }.is_transient());
        assert!(!SecioError::ProtocolMismatch("http".into()).is_transient());
        assert!(!SecioError::SessionClosed.is_transient());
    }

    #[test]
    fn crypto_errors_map_onto_taxonomy() {
        let negotiation = CryptoError::NoCommonAlgorithm {
            category: "cipher",
            local: "AES-256".into(),
            remote: "Blowfish".into(),
        };
        assert!(matches!(
            SecioError::from(negotiation),
            SecioError::NegotiationFailed { category: "cipher", .. }
        ));
        assert!(matches!(SecioError::from(CryptoError::InvalidSignature), SecioError::SignatureInvalid));
        assert!(matches!(SecioError::from(CryptoError::MacMismatch), SecioError::TamperedOrCorrupted));
        assert!(matches!(
            SecioError::from(CryptoError::InvalidEphemeralKey { curve: "P-256" }),
            SecioError::MalformedMessage(_)
        ));
        assert!(matches!(
            SecioError::from(CryptoError::UnsupportedKeyType(KeyType::Secp256k1)),
            SecioError::UnsupportedKeyType(KeyType::Secp256k1)
        ));
    }

    #[test]
    fn protocol_errors_split_mismatch_from_malformed() {
        assert!(matches!(
            SecioError::from(ProtocolError::MissingProtocolLine),
            SecioError::ProtocolMismatch(_)
        ));
        assert!(matches!(
            SecioError::from(ProtocolError::UnknownKeyType(7)),
            SecioError::MalformedMessage(_)
        ));
    }

    #[test]
    fn io_conversion_preserves_kind() {
        let err: io::Error = SecioError::Timeout { elapsed: Duration::from_secs(1) }.into();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);

        let err: io::Error = SecioError::TamperedOrCorrupted.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        let err: io::Error = SecioError::TransportFailure(TransportError::Io(reset)).into();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
