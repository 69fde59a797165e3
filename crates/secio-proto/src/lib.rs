//! Secio wire format.
//!
//! Everything that crosses the wire during the secio handshake, and nothing
//! that interprets it:
//!
//! - [`Propose`]: first-round offer (identity key, nonce, algorithm lists)
//! - [`Exchange`]: second-round signed ephemeral key
//! - [`PublicKeyProto`]: serialized identity public key carried in a Propose
//! - the `/secio/1.0.0` protocol identifier line that prefixes the first
//!   message
//! - the 4-byte length-prefixed frame codec used by stream transports
//!
//! Messages are protobuf encoded with `prost`. Field tags are the
//! compatibility surface; Rust field names are free to differ from the
//! `.proto` names.
//!
//! # Invariants
//!
//! Decoding never panics on untrusted input. Structural checks that the
//! protobuf layer cannot express (nonce length, non-empty keys) live in the
//! `validate` methods and are applied by [`Propose::decode_validated`] and
//! [`Exchange::decode_validated`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod frame;
pub mod messages;
pub mod protocol;

pub use errors::{ProtocolError, Result};
pub use frame::{DEFAULT_MAX_FRAME_SIZE, LENGTH_PREFIX_SIZE, decode_frame, decode_frame_len, encode_frame};
pub use messages::{Exchange, KeyType, NONCE_SIZE, Propose, PublicKeyProto};
pub use protocol::{PROTOCOL_ID, PROTOCOL_LINE, split_protocol_line, with_protocol_line};
