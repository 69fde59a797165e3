//! Ephemeral ECDH key agreement.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::{CryptoRngCore, OsRng};
use zeroize::Zeroizing;

use crate::{
    catalog::{Algorithm, Curve},
    error::CryptoError,
};

enum Secret {
    P256(p256::ecdh::EphemeralSecret),
    P384(p384::ecdh::EphemeralSecret),
    P521(p521::ecdh::EphemeralSecret),
}

/// Single-use key pair on the negotiated curve.
///
/// [`agree`](Self::agree) consumes the pair so the secret cannot be reused
/// for a second exchange.
pub struct EphemeralKeyPair {
    curve: Curve,
    secret: Secret,
    public: Vec<u8>,
}

impl EphemeralKeyPair {
    /// Generate a key pair from the OS RNG.
    pub fn generate(curve: Curve) -> Self {
        Self::generate_with(curve, &mut OsRng)
    }

    /// Generate a key pair from a caller-supplied RNG.
    pub fn generate_with(curve: Curve, rng: &mut impl CryptoRngCore) -> Self {
        let (secret, public) = match curve {
            Curve::P256 => {
                let secret = p256::ecdh::EphemeralSecret::random(rng);
                let public = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
                (Secret::P256(secret), public)
            },
            Curve::P384 => {
                let secret = p384::ecdh::EphemeralSecret::random(rng);
                let public = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
                (Secret::P384(secret), public)
            },
            Curve::P521 => {
                let secret = p521::ecdh::EphemeralSecret::random(rng);
                let public = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
                (Secret::P521(secret), public)
            },
        };
        Self { curve, secret, public }
    }

    /// Curve this pair lives on.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Uncompressed SEC1 encoding of the public point.
    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    /// Derive the shared secret with the peer's SEC1-encoded public point.
    ///
    /// # Errors
    ///
    /// - `InvalidEphemeralKey` if the peer's bytes are not a valid point on
    ///   this curve
    pub fn agree(self, peer_public: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let invalid = || CryptoError::InvalidEphemeralKey { curve: self.curve.name() };

        let shared = match &self.secret {
            Secret::P256(secret) => {
                let peer = p256::PublicKey::from_sec1_bytes(peer_public).map_err(|_| invalid())?;
                secret.diffie_hellman(&peer).raw_secret_bytes().to_vec()
            },
            Secret::P384(secret) => {
                let peer = p384::PublicKey::from_sec1_bytes(peer_public).map_err(|_| invalid())?;
                secret.diffie_hellman(&peer).raw_secret_bytes().to_vec()
            },
            Secret::P521(secret) => {
                let peer = p521::PublicKey::from_sec1_bytes(peer_public).map_err(|_| invalid())?;
                secret.diffie_hellman(&peer).raw_secret_bytes().to_vec()
            },
        };
        Ok(Zeroizing::new(shared))
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKeyPair").field("curve", &self.curve).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sides_derive_same_secret() {
        for &curve in Curve::ALL {
            let alice = EphemeralKeyPair::generate(curve);
            let bob = EphemeralKeyPair::generate(curve);
            let alice_pub = alice.public_key().to_vec();
            let bob_pub = bob.public_key().to_vec();

            let Ok(a) = alice.agree(&bob_pub) else { panic!("agree failed on {curve:?}") };
            let Ok(b) = bob.agree(&alice_pub) else { panic!("agree failed on {curve:?}") };
            assert_eq!(*a, *b);
        }
    }

    #[test]
    fn public_points_are_uncompressed() {
        let expected = [(Curve::P256, 65), (Curve::P384, 97), (Curve::P521, 133)];
        for (curve, len) in expected {
            let pair = EphemeralKeyPair::generate(curve);
            assert_eq!(pair.public_key().len(), len);
            assert_eq!(pair.public_key()[0], 0x04);
        }
    }

    #[test]
    fn secret_length_matches_field_size() {
        let expected = [(Curve::P256, 32), (Curve::P384, 48), (Curve::P521, 66)];
        for (curve, len) in expected {
            let a = EphemeralKeyPair::generate(curve);
            let b = EphemeralKeyPair::generate(curve);
            let Ok(secret) = a.agree(b.public_key()) else { panic!("agree failed") };
            assert_eq!(secret.len(), len);
        }
    }

    #[test]
    fn rejects_point_from_other_curve() {
        let p256 = EphemeralKeyPair::generate(Curve::P256);
        let p384 = EphemeralKeyPair::generate(Curve::P384);

        let result = p384.agree(p256.public_key());
        assert_eq!(result.err(), Some(CryptoError::InvalidEphemeralKey { curve: "P-384" }));
    }

    #[test]
    fn rejects_garbage_point() {
        let pair = EphemeralKeyPair::generate(Curve::P256);
        let mut garbage = vec![0x04];
        garbage.extend_from_slice(&[0xAB; 64]);

        assert!(matches!(pair.agree(&garbage), Err(CryptoError::InvalidEphemeralKey { .. })));
    }
}
