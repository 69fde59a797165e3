//! Fuzz target for handshake message decoding
//!
//! Feeds arbitrary bytes to every decoder a peer's first two messages reach:
//! Propose, Exchange, and the serialized identity key inside a Propose.
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use secio_crypto::PublicKey;
use secio_proto::{Exchange, NONCE_SIZE, Propose, PublicKeyProto};

fuzz_target!(|data: &[u8]| {
    if let Ok(propose) = Propose::decode_validated(data) {
        assert_eq!(propose.rand.len(), NONCE_SIZE);
        assert!(!propose.public_key.is_empty());
        let _ = PublicKey::from_protobuf(&propose.public_key);
    }

    if let Ok(exchange) = Exchange::decode_validated(data) {
        assert!(!exchange.epubkey.is_empty());
        assert!(!exchange.signature.is_empty());
    }

    if let Ok(key) = PublicKeyProto::decode_validated(data) {
        let _ = key.kind();
    }

    let _ = PublicKey::from_protobuf(data);
});
