//! Cryptographic building blocks for the secio handshake.
//!
//! Each piece is a pure function or a small state machine with no I/O:
//!
//! - [`catalog`]: supported curves, ciphers, and hashes, and the lists a
//!   node offers
//! - [`negotiation`]: the hash-ordered pick of a common algorithm from two
//!   preference lists
//! - [`identity`]: long-term keys, transcript signatures, peer fingerprints
//! - [`ephemeral`]: single-use ECDH key pairs
//! - [`stretch`]: expansion of the ECDH secret into directional key bundles
//! - [`cipher`]: CTR encryption with encrypt-then-MAC frame protection
//!
//! # Key schedule
//!
//! ```text
//! ECDH(eph_local, eph_remote) -> shared secret
//!   -> stretch(cipher, hash, secret) -> k1 | k2
//!   -> order(local, remote) picks which half each side sends with
//!   -> CipherState per direction
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod cipher;
pub mod ephemeral;
pub mod error;
pub mod identity;
pub mod negotiation;
pub mod stretch;

pub use catalog::{Algorithm, Catalog, CipherKind, Curve, HashKind};
pub use cipher::CipherState;
pub use ephemeral::EphemeralKeyPair;
pub use error::CryptoError;
pub use identity::{PeerId, PrivateKey, PublicKey};
pub use negotiation::{NegotiationList, Parameters, negotiate, order_hash, parse_list, proposal_order, select_best};
pub use stretch::{KeyBundle, MAC_KEY_SIZE, StretchedKeys, stretch_keys};
