//! Protocol identifier line.
//!
//! The first message each side sends is the ASCII line `/secio/1.0.0\n`
//! immediately followed by the encoded [`crate::Propose`]. The receiver
//! accepts any first line that mentions `secio`; everything after the first
//! newline is the peer's Propose.

use crate::errors::{ProtocolError, Result};

/// Protocol identifier, without the trailing newline.
pub const PROTOCOL_ID: &str = "/secio/1.0.0";

/// Protocol identifier line exactly as sent.
pub const PROTOCOL_LINE: &[u8] = b"/secio/1.0.0\n";

/// Token the peer's first line must contain.
const ACCEPT_TOKEN: &[u8] = b"secio";

/// Prefix `message` with the protocol identifier line.
pub fn with_protocol_line(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(PROTOCOL_LINE.len() + message.len());
    out.extend_from_slice(PROTOCOL_LINE);
    out.extend_from_slice(message);
    out
}

/// Split a peer's first message into its protocol line and the remainder.
///
/// Returns the line without its newline, and the bytes after the newline.
///
/// # Errors
///
/// - `ProtocolError::MissingProtocolLine` if there is no newline
/// - `ProtocolError::ProtocolMismatch` if the line does not contain `secio`
pub fn split_protocol_line(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let newline = bytes.iter().position(|&b| b == b'\n').ok_or(ProtocolError::MissingProtocolLine)?;
    let (line, rest) = bytes.split_at(newline);

    if !line.windows(ACCEPT_TOKEN.len()).any(|w| w == ACCEPT_TOKEN) {
        return Err(ProtocolError::ProtocolMismatch {
            received: String::from_utf8_lossy(line).into_owned(),
        });
    }

    // Skip the newline itself
    Ok((line, &rest[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_prefixed_verbatim() {
        let wire = with_protocol_line(&[1, 2, 3]);
        assert_eq!(&wire[..13], b"/secio/1.0.0\n");
        assert_eq!(&wire[13..], &[1, 2, 3]);
    }

    #[test]
    fn split_returns_message_after_first_newline() {
        let wire = with_protocol_line(b"body\nwith newline");
        let (line, rest) = split_protocol_line(&wire).unwrap();
        assert_eq!(line, b"/secio/1.0.0");
        assert_eq!(rest, b"body\nwith newline");
    }

    #[test]
    fn other_secio_versions_are_accepted() {
        let (line, rest) = split_protocol_line(b"/secio/2.0.0\nxyz").unwrap();
        assert_eq!(line, b"/secio/2.0.0");
        assert_eq!(rest, b"xyz");
    }

    #[test]
    fn empty_body_is_allowed_here() {
        let (_, rest) = split_protocol_line(b"/secio/1.0.0\n").unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn foreign_protocol_is_a_mismatch() {
        let result = split_protocol_line(b"/plaintext/2.0.0\nxyz");
        assert_eq!(
            result,
            Err(ProtocolError::ProtocolMismatch { received: "/plaintext/2.0.0".to_string() })
        );
    }

    #[test]
    fn secio_after_the_newline_does_not_count() {
        let result = split_protocol_line(b"/noise\n/secio/1.0.0\n");
        assert!(matches!(result, Err(ProtocolError::ProtocolMismatch { .. })));
    }

    #[test]
    fn missing_newline_is_rejected() {
        assert_eq!(split_protocol_line(b"/secio/1.0.0"), Err(ProtocolError::MissingProtocolLine));
    }
}
