//! Protobuf handshake messages.
//!
//! Tags match the secio `.proto` definitions:
//!
//! ```text
//! message Propose  { bytes rand = 1; bytes pubkey = 2; string exchanges = 3;
//!                    string ciphers = 4; string hashes = 5; }
//! message Exchange { bytes epubkey = 1; bytes signature = 2; }
//! message PublicKey { KeyType Type = 1; bytes Data = 2; }
//! ```

use prost::Message;

use crate::errors::{ProtocolError, Result};

/// Length of the random nonce carried in a [`Propose`].
pub const NONCE_SIZE: usize = 16;

/// First-round handshake offer.
///
/// The encoded bytes of both the local and the remote Propose are part of the
/// signed transcript, so a Propose is never re-encoded after it is sent:
/// callers keep the exact bytes that went over the wire.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Propose {
    /// 16 random bytes chosen by the sender
    #[prost(bytes = "vec", tag = "1")]
    pub rand: Vec<u8>,
    /// Serialized [`PublicKeyProto`] of the sender's identity key
    #[prost(bytes = "vec", tag = "2")]
    pub public_key: Vec<u8>,
    /// Comma-separated key exchange curves, most preferred first
    #[prost(string, tag = "3")]
    pub exchanges: String,
    /// Comma-separated symmetric ciphers, most preferred first
    #[prost(string, tag = "4")]
    pub ciphers: String,
    /// Comma-separated hash algorithms, most preferred first
    #[prost(string, tag = "5")]
    pub hashes: String,
}

impl Propose {
    /// Decode and validate a Propose received from a peer.
    pub fn decode_validated(bytes: &[u8]) -> Result<Self> {
        let propose = Self::decode(bytes).map_err(|e| ProtocolError::Decode {
            message: "Propose",
            reason: e.to_string(),
        })?;
        propose.validate()?;
        Ok(propose)
    }

    /// Check the rules the protobuf schema cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.rand.len() != NONCE_SIZE {
            return Err(ProtocolError::InvalidField {
                message: "Propose",
                reason: format!("nonce is {} bytes, expected {NONCE_SIZE}", self.rand.len()),
            });
        }

        if self.public_key.is_empty() {
            return Err(ProtocolError::InvalidField {
                message: "Propose",
                reason: "empty public key".to_string(),
            });
        }

        Ok(())
    }
}

/// Second-round message: ephemeral public key and its signature.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Exchange {
    /// Uncompressed SEC1 point of the sender's ephemeral key
    #[prost(bytes = "vec", tag = "1")]
    pub epubkey: Vec<u8>,
    /// Identity-key signature over the handshake transcript
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

impl Exchange {
    /// Decode and validate an Exchange received from a peer.
    pub fn decode_validated(bytes: &[u8]) -> Result<Self> {
        let exchange = Self::decode(bytes).map_err(|e| ProtocolError::Decode {
            message: "Exchange",
            reason: e.to_string(),
        })?;

        if exchange.epubkey.is_empty() {
            return Err(ProtocolError::InvalidField {
                message: "Exchange",
                reason: "empty ephemeral public key".to_string(),
            });
        }

        if exchange.signature.is_empty() {
            return Err(ProtocolError::InvalidField {
                message: "Exchange",
                reason: "empty signature".to_string(),
            });
        }

        Ok(exchange)
    }
}

/// Identity key algorithm tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyType {
    /// RSA, SPKI DER encoded
    Rsa = 0,
    /// Ed25519, raw 32-byte key
    Ed25519 = 1,
    /// secp256k1, compressed SEC1 point
    Secp256k1 = 2,
    /// ECDSA, SPKI DER encoded
    Ecdsa = 3,
}

/// Serialized identity public key: type tag plus raw key bytes.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct PublicKeyProto {
    /// [`KeyType`] discriminant
    #[prost(enumeration = "KeyType", tag = "1")]
    pub key_type: i32,
    /// Key bytes in the encoding the type tag implies
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

impl PublicKeyProto {
    /// Build from a known key type.
    pub fn new(kind: KeyType, data: Vec<u8>) -> Self {
        Self { key_type: kind as i32, data }
    }

    /// Decode a serialized public key and check that its type tag is known.
    pub fn decode_validated(bytes: &[u8]) -> Result<Self> {
        let key = Self::decode(bytes).map_err(|e| ProtocolError::Decode {
            message: "PublicKey",
            reason: e.to_string(),
        })?;
        key.kind()?;

        if key.data.is_empty() {
            return Err(ProtocolError::InvalidField {
                message: "PublicKey",
                reason: "empty key data".to_string(),
            });
        }

        Ok(key)
    }

    /// Type tag as an enum. Unknown tags are an error, not a default.
    pub fn kind(&self) -> Result<KeyType> {
        KeyType::try_from(self.key_type).map_err(|_| ProtocolError::UnknownKeyType(self.key_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_propose() -> Propose {
        Propose {
            rand: vec![7; NONCE_SIZE],
            public_key: PublicKeyProto::new(KeyType::Ed25519, vec![1; 32]).encode_to_vec(),
            exchanges: "P-256,P-384,P-521".to_string(),
            ciphers: "AES-256,AES-128,Blowfish".to_string(),
            hashes: "SHA256,SHA512".to_string(),
        }
    }

    #[test]
    fn propose_field_tags_are_stable() {
        let propose = Propose {
            rand: vec![0xAA],
            public_key: vec![0xBB],
            exchanges: "a".to_string(),
            ciphers: "b".to_string(),
            hashes: "c".to_string(),
        };

        // tag 1 bytes, tag 2 bytes, tag 3..5 strings, each length 1
        assert_eq!(hex::encode(propose.encode_to_vec()), "0a01aa1201bb1a01612201622a0163");
    }

    #[test]
    fn exchange_field_tags_are_stable() {
        let exchange = Exchange { epubkey: vec![0x04], signature: vec![0x99, 0x98] };
        assert_eq!(hex::encode(exchange.encode_to_vec()), "0a010412029998");
    }

    #[test]
    fn valid_propose_passes_validation() {
        let bytes = sample_propose().encode_to_vec();
        let decoded = Propose::decode_validated(&bytes).unwrap();
        assert_eq!(decoded, sample_propose());
    }

    #[test]
    fn short_nonce_is_rejected() {
        let mut propose = sample_propose();
        propose.rand.truncate(8);

        let result = Propose::decode_validated(&propose.encode_to_vec());
        assert!(matches!(result, Err(ProtocolError::InvalidField { message: "Propose", .. })));
    }

    #[test]
    fn missing_public_key_is_rejected() {
        let mut propose = sample_propose();
        propose.public_key.clear();

        let result = Propose::decode_validated(&propose.encode_to_vec());
        assert!(matches!(result, Err(ProtocolError::InvalidField { .. })));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = Propose::decode_validated(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(ProtocolError::Decode { message: "Propose", .. })));
    }

    #[test]
    fn exchange_without_signature_is_rejected() {
        let exchange = Exchange { epubkey: vec![4, 1, 2], signature: vec![] };
        let result = Exchange::decode_validated(&exchange.encode_to_vec());
        assert!(matches!(result, Err(ProtocolError::InvalidField { message: "Exchange", .. })));
    }

    #[test]
    fn unknown_key_type_is_rejected() {
        let key = PublicKeyProto { key_type: 42, data: vec![1, 2, 3] };
        let result = PublicKeyProto::decode_validated(&key.encode_to_vec());
        assert_eq!(result, Err(ProtocolError::UnknownKeyType(42)));
    }

    #[test]
    fn rsa_key_type_survives_default_encoding() {
        // RSA is tag 0, which protobuf omits on the wire
        let key = PublicKeyProto::new(KeyType::Rsa, vec![0x30, 0x82]);
        let decoded = PublicKeyProto::decode_validated(&key.encode_to_vec()).unwrap();
        assert_eq!(decoded.kind().unwrap(), KeyType::Rsa);
        assert_eq!(decoded.data, vec![0x30, 0x82]);
    }
}
