//! Deterministic identity keys.

use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use secio_crypto::PrivateKey;

/// RSA modulus size for test identities. Small enough to generate quickly.
pub const TEST_RSA_BITS: usize = 1024;

/// Ed25519 identity whose secret is `seed` repeated.
pub fn ed25519_identity(seed: u8) -> PrivateKey {
    PrivateKey::ed25519_from_bytes(&[seed; 32])
}

/// RSA identity generated from a seeded ChaCha stream.
///
/// # Panics
///
/// Panics if key generation fails, which only happens for invalid sizes.
#[allow(clippy::panic)]
pub fn rsa_identity(seed: u64) -> PrivateKey {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match PrivateKey::generate_rsa_with(&mut rng, TEST_RSA_BITS) {
        Ok(key) => key,
        Err(e) => panic!("test RSA key generation failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use secio_crypto::PeerId;

    use super::*;

    #[test]
    fn fixtures_are_deterministic() {
        let peer = |key: &PrivateKey| PeerId::from_public_key(&key.public()).ok();

        assert_eq!(peer(&ed25519_identity(1)), peer(&ed25519_identity(1)));
        assert_ne!(peer(&ed25519_identity(1)), peer(&ed25519_identity(2)));
        assert_eq!(peer(&rsa_identity(3)), peer(&rsa_identity(3)));
    }
}
