//! Long-term identity keys.
//!
//! Identity keys are a tagged sum over key algorithms. Sign and verify
//! dispatch on the tag; algorithms without an implementation fail with
//! [`CryptoError::UnsupportedKeyType`] instead of pretending to succeed.
//!
//! | Key type  | Serialized form      | Signature                 |
//! |-----------|----------------------|---------------------------|
//! | RSA       | SPKI DER             | PKCS#1 v1.5 over SHA-256  |
//! | Ed25519   | raw 32 bytes         | Ed25519                   |
//! | Secp256k1 | carried, not parsed  | unsupported               |
//! | ECDSA     | carried, not parsed  | unsupported               |

use std::fmt;

use ed25519_dalek::{SigningKey as Ed25519SigningKey, VerifyingKey as Ed25519VerifyingKey};
use prost::Message;
use rand_core::{CryptoRngCore, OsRng};
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15,
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey},
    signature::{SignatureEncoding, Signer, Verifier},
};
use secio_proto::{KeyType, PublicKeyProto};
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Multihash code for SHA-256.
const MULTIHASH_SHA2_256: u8 = 0x12;

/// Public half of an identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA public key
    Rsa(RsaPublicKey),
    /// Ed25519 public key
    Ed25519(Ed25519VerifyingKey),
    /// Key of a known type this build cannot use, kept as raw bytes
    Unsupported {
        /// Key type tag
        kind: KeyType,
        /// Raw key bytes as received
        data: Vec<u8>,
    },
}

impl PublicKey {
    /// Key type tag.
    pub fn kind(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::Unsupported { kind, .. } => *kind,
        }
    }

    /// Serialize as a protobuf `PublicKey { Type, Data }`.
    pub fn to_protobuf(&self) -> Result<Vec<u8>, CryptoError> {
        let data = match self {
            Self::Rsa(key) => key
                .to_public_key_der()
                .map_err(|e| CryptoError::KeyOperation(e.to_string()))?
                .as_bytes()
                .to_vec(),
            Self::Ed25519(key) => key.to_bytes().to_vec(),
            Self::Unsupported { data, .. } => data.clone(),
        };
        Ok(PublicKeyProto::new(self.kind(), data).encode_to_vec())
    }

    /// Parse a protobuf `PublicKey` received from a peer.
    pub fn from_protobuf(bytes: &[u8]) -> Result<Self, CryptoError> {
        let proto = PublicKeyProto::decode_validated(bytes)?;
        let kind = proto.kind()?;

        match kind {
            KeyType::Rsa => RsaPublicKey::from_public_key_der(&proto.data)
                .map(Self::Rsa)
                .map_err(|e| CryptoError::InvalidPublicKey { reason: e.to_string() }),
            KeyType::Ed25519 => {
                let raw: [u8; 32] = proto.data.as_slice().try_into().map_err(|_| {
                    CryptoError::InvalidPublicKey {
                        reason: format!("Ed25519 key is {} bytes, expected 32", proto.data.len()),
                    }
                })?;
                Ed25519VerifyingKey::from_bytes(&raw)
                    .map(Self::Ed25519)
                    .map_err(|e| CryptoError::InvalidPublicKey { reason: e.to_string() })
            },
            KeyType::Secp256k1 | KeyType::Ecdsa => Ok(Self::Unsupported { kind, data: proto.data }),
        }
    }

    /// Verify `signature` over `message`.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if the signature is malformed or does not verify
    /// - `UnsupportedKeyType` for key types without an implementation
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Rsa(key) => {
                let verifier = pkcs1v15::VerifyingKey::<Sha256>::new(key.clone());
                let signature = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| CryptoError::InvalidSignature)?;
                verifier.verify(message, &signature).map_err(|_| CryptoError::InvalidSignature)
            },
            Self::Ed25519(key) => {
                let signature = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|_| CryptoError::InvalidSignature)?;
                key.verify_strict(message, &signature).map_err(|_| CryptoError::InvalidSignature)
            },
            Self::Unsupported { kind, .. } => Err(CryptoError::UnsupportedKeyType(*kind)),
        }
    }
}

/// Private half of an identity key.
///
/// Owned by the caller and only borrowed by the handshake for signing.
#[derive(Clone)]
pub enum PrivateKey {
    /// RSA private key
    Rsa(Box<RsaPrivateKey>),
    /// Ed25519 signing key
    Ed25519(Box<Ed25519SigningKey>),
    /// Key of a known type this build cannot sign with
    Unsupported {
        /// Key type tag
        kind: KeyType,
        /// Public key bytes advertised for this identity
        public: Vec<u8>,
    },
}

impl PrivateKey {
    /// Fresh Ed25519 key from the OS RNG.
    pub fn generate_ed25519() -> Self {
        Self::Ed25519(Box::new(Ed25519SigningKey::generate(&mut OsRng)))
    }

    /// Ed25519 key from a 32-byte secret seed.
    pub fn ed25519_from_bytes(secret: &[u8; 32]) -> Self {
        Self::Ed25519(Box::new(Ed25519SigningKey::from_bytes(secret)))
    }

    /// Fresh RSA key of `bits` modulus size from the OS RNG.
    pub fn generate_rsa(bits: usize) -> Result<Self, CryptoError> {
        Self::generate_rsa_with(&mut OsRng, bits)
    }

    /// Fresh RSA key from a caller-supplied RNG (seeded in tests).
    pub fn generate_rsa_with(rng: &mut impl CryptoRngCore, bits: usize) -> Result<Self, CryptoError> {
        RsaPrivateKey::new(rng, bits)
            .map(|key| Self::Rsa(Box::new(key)))
            .map_err(|e| CryptoError::KeyOperation(e.to_string()))
    }

    /// RSA key from PKCS#1 DER (`RSA PRIVATE KEY`).
    pub fn rsa_from_pkcs1_der(der: &[u8]) -> Result<Self, CryptoError> {
        RsaPrivateKey::from_pkcs1_der(der)
            .map(|key| Self::Rsa(Box::new(key)))
            .map_err(|e| CryptoError::KeyOperation(e.to_string()))
    }

    /// RSA key from PKCS#8 DER (`PRIVATE KEY`).
    pub fn rsa_from_pkcs8_der(der: &[u8]) -> Result<Self, CryptoError> {
        RsaPrivateKey::from_pkcs8_der(der)
            .map(|key| Self::Rsa(Box::new(key)))
            .map_err(|e| CryptoError::KeyOperation(e.to_string()))
    }

    /// Key type tag.
    pub fn kind(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::Unsupported { kind, .. } => *kind,
        }
    }

    /// Matching public key.
    pub fn public(&self) -> PublicKey {
        match self {
            Self::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            Self::Unsupported { kind, public } => PublicKey::Unsupported { kind: *kind, data: public.clone() },
        }
    }

    /// Sign `message`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedKeyType` for key types without an implementation
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Rsa(key) => {
                let signer = pkcs1v15::SigningKey::<Sha256>::new(key.as_ref().clone());
                signer
                    .try_sign(message)
                    .map(|signature| signature.to_vec())
                    .map_err(|e| CryptoError::KeyOperation(e.to_string()))
            },
            Self::Ed25519(key) => Ok(ed25519_dalek::Signer::sign(key.as_ref(), message).to_bytes().to_vec()),
            Self::Unsupported { kind, .. } => Err(CryptoError::UnsupportedKeyType(*kind)),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("kind", &self.kind()).finish_non_exhaustive()
    }
}

/// Peer fingerprint: SHA-256 multihash of the serialized public key.
///
/// Identifies a peer in logs and to the application. It is not an
/// authentication result by itself; the handshake signature is.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId([u8; 34]);

impl PeerId {
    /// Fingerprint of a protobuf-serialized public key.
    pub fn from_public_key_bytes(serialized: &[u8]) -> Self {
        let digest = Sha256::digest(serialized);
        let mut bytes = [0u8; 34];
        bytes[0] = MULTIHASH_SHA2_256;
        bytes[1] = 32;
        bytes[2..].copy_from_slice(&digest);
        Self(bytes)
    }

    /// Fingerprint of a public key.
    pub fn from_public_key(key: &PublicKey) -> Result<Self, CryptoError> {
        Ok(Self::from_public_key_bytes(&key.to_protobuf()?))
    }

    /// Raw multihash bytes.
    pub fn as_bytes(&self) -> &[u8; 34] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    use super::*;

    fn ed25519(seed: u8) -> PrivateKey {
        PrivateKey::ed25519_from_bytes(&[seed; 32])
    }

    fn rsa() -> PrivateKey {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let Ok(key) = PrivateKey::generate_rsa_with(&mut rng, 1024) else { panic!("rsa keygen") };
        key
    }

    #[test]
    fn ed25519_sign_verify() {
        let key = ed25519(1);
        let Ok(signature) = key.sign(b"transcript") else { panic!("sign") };
        assert_eq!(signature.len(), 64);
        assert_eq!(key.public().verify(b"transcript", &signature), Ok(()));
        assert_eq!(key.public().verify(b"transcripT", &signature), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn rsa_sign_verify() {
        let key = rsa();
        let Ok(signature) = key.sign(b"transcript") else { panic!("sign") };
        assert_eq!(signature.len(), 128);
        assert_eq!(key.public().verify(b"transcript", &signature), Ok(()));

        let mut tampered = signature.clone();
        tampered[10] ^= 0x01;
        assert_eq!(key.public().verify(b"transcript", &tampered), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let Ok(signature) = ed25519(1).sign(b"msg") else { panic!("sign") };
        assert_eq!(ed25519(2).public().verify(b"msg", &signature), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn malformed_signature_is_rejected() {
        assert_eq!(ed25519(1).public().verify(b"msg", &[0u8; 10]), Err(CryptoError::InvalidSignature));
        assert_eq!(rsa().public().verify(b"msg", &[]), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn public_key_protobuf_round_trip() {
        for key in [ed25519(3), rsa()] {
            let public = key.public();
            let Ok(bytes) = public.to_protobuf() else { panic!("encode") };
            assert_eq!(PublicKey::from_protobuf(&bytes), Ok(public));
        }
    }

    #[test]
    fn ed25519_protobuf_layout() {
        let Ok(bytes) = ed25519(4).public().to_protobuf() else { panic!("encode") };
        // field 1 varint = 1, field 2 length-delimited 32 bytes
        assert_eq!(&bytes[..4], &[0x08, 0x01, 0x12, 0x20]);
        assert_eq!(bytes.len(), 36);
    }

    #[test]
    fn unsupported_types_are_carried_but_unusable() {
        let proto = PublicKeyProto::new(KeyType::Secp256k1, vec![2; 33]).encode_to_vec();
        let Ok(public) = PublicKey::from_protobuf(&proto) else { panic!("decode") };

        assert_eq!(public.kind(), KeyType::Secp256k1);
        assert_eq!(public.verify(b"m", &[0; 64]), Err(CryptoError::UnsupportedKeyType(KeyType::Secp256k1)));
        assert_eq!(public.to_protobuf(), Ok(proto));

        let private = PrivateKey::Unsupported { kind: KeyType::Ecdsa, public: vec![1; 65] };
        assert_eq!(private.sign(b"m"), Err(CryptoError::UnsupportedKeyType(KeyType::Ecdsa)));
    }

    #[test]
    fn bad_key_bytes_are_rejected() {
        let short = PublicKeyProto::new(KeyType::Ed25519, vec![1; 31]).encode_to_vec();
        assert!(matches!(PublicKey::from_protobuf(&short), Err(CryptoError::InvalidPublicKey { .. })));

        let junk_rsa = PublicKeyProto::new(KeyType::Rsa, vec![0x30, 0x01, 0x00]).encode_to_vec();
        assert!(matches!(PublicKey::from_protobuf(&junk_rsa), Err(CryptoError::InvalidPublicKey { .. })));

        let unknown = PublicKeyProto { key_type: 9, data: vec![1] }.encode_to_vec();
        assert!(matches!(PublicKey::from_protobuf(&unknown), Err(CryptoError::InvalidPublicKey { .. })));
    }

    #[test]
    fn peer_id_is_sha256_multihash() {
        let Ok(bytes) = ed25519(5).public().to_protobuf() else { panic!("encode") };
        let id = PeerId::from_public_key_bytes(&bytes);

        assert_eq!(id.as_bytes()[..2], [0x12, 0x20]);
        assert_eq!(&id.as_bytes()[2..], Sha256::digest(&bytes).as_slice());
        assert_eq!(id.to_string().len(), 68);
        assert!(id.to_string().starts_with("1220"));
    }

    #[test]
    fn peer_id_renders_as_lowercase_hex() {
        let id = PeerId::from_public_key_bytes(b"");
        assert_eq!(
            id.to_string(),
            "1220e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(format!("{id:?}"), format!("PeerId({id})"));
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let rendered = format!("{:?}", ed25519(6));
        assert!(rendered.contains("Ed25519"));
        assert!(!rendered.contains("06"));
    }
}
