//! Length-prefixed message framing.
//!
//! Layout on the wire: `[length: u32 big-endian] + [payload: length bytes]`.
//!
//! Stream transports use this to turn a byte stream into discrete messages.
//! The handshake itself only ever sees whole messages.
//!
//! # Security
//!
//! The length prefix is checked against the caller's maximum before any
//! payload allocation, so a hostile prefix cannot force a large buffer.

use bytes::{BufMut, Bytes};

use crate::errors::{ProtocolError, Result};

/// Size of the big-endian length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default maximum payload size (8 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 8 * 1024 * 1024;

/// Write `payload` as one frame into `dst`.
///
/// # Errors
///
/// - `ProtocolError::FrameTooLarge` if the payload exceeds `max_frame_size`
///   or cannot be described by a u32 prefix
pub fn encode_frame(payload: &[u8], max_frame_size: usize, dst: &mut impl BufMut) -> Result<()> {
    if payload.len() > max_frame_size {
        return Err(ProtocolError::FrameTooLarge { size: payload.len(), max: max_frame_size });
    }

    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::FrameTooLarge { size: payload.len(), max: max_frame_size })?;

    dst.put_u32(len);
    dst.put_slice(payload);
    Ok(())
}

/// Interpret a length prefix, rejecting sizes over `max_frame_size`.
pub fn decode_frame_len(prefix: [u8; LENGTH_PREFIX_SIZE], max_frame_size: usize) -> Result<usize> {
    let len = u32::from_be_bytes(prefix) as usize;
    if len > max_frame_size {
        return Err(ProtocolError::FrameTooLarge { size: len, max: max_frame_size });
    }
    Ok(len)
}

/// Decode one frame from the front of `bytes`.
///
/// Returns the payload and the total number of bytes consumed (prefix
/// included). Trailing bytes are left for the next call.
pub fn decode_frame(bytes: &[u8], max_frame_size: usize) -> Result<(Bytes, usize)> {
    let Some((prefix, rest)) = bytes.split_first_chunk::<LENGTH_PREFIX_SIZE>() else {
        return Err(ProtocolError::FrameTruncated {
            expected: LENGTH_PREFIX_SIZE,
            actual: bytes.len(),
        });
    };

    let len = decode_frame_len(*prefix, max_frame_size)?;
    let Some(payload) = rest.get(..len) else {
        return Err(ProtocolError::FrameTruncated { expected: len, actual: rest.len() });
    };

    Ok((Bytes::copy_from_slice(payload), LENGTH_PREFIX_SIZE + len))
}
