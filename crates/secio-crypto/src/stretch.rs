//! Key stretching.
//!
//! The ECDH secret is expanded with an HMAC chain over the seed
//! `"key expansion"` into two key bundles, one per direction:
//!
//! ```text
//! A(0) = HMAC(secret, seed)
//! out  = HMAC(secret, A(0) || seed) || HMAC(secret, A(1) || seed) || ...
//! A(i) = HMAC(secret, A(i-1))
//! ```
//!
//! The output is `2 * (iv + cipher_key + 20)` bytes, split into halves `k1`
//! and `k2`, each laid out as `iv | cipher_key | mac_key`. The peer whose
//! order is not `Less` sends with `k1`; the other sends with `k2`. Both
//! peers compute the same halves and assign them mirror-wise.

use std::cmp::Ordering;

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::catalog::{CipherKind, HashKind};

/// MAC key length in bytes, independent of the negotiated hash.
pub const MAC_KEY_SIZE: usize = 20;

const SEED: &[u8] = b"key expansion";

/// Keys for one direction of the channel.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyBundle {
    /// Initial counter block
    pub iv: Vec<u8>,
    /// Cipher key
    pub cipher_key: Vec<u8>,
    /// HMAC key
    pub mac_key: Vec<u8>,
}

impl std::fmt::Debug for KeyBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyBundle")
            .field("iv_len", &self.iv.len())
            .field("cipher_key_len", &self.cipher_key.len())
            .field("mac_key_len", &self.mac_key.len())
            .finish()
    }
}

/// Both directions' keys as seen by one peer.
#[derive(Debug, Clone)]
pub struct StretchedKeys {
    /// Keys for frames this peer writes
    pub outbound: KeyBundle,
    /// Keys for frames this peer reads
    pub inbound: KeyBundle,
}

/// Expand `secret` into directional key bundles.
pub fn stretch_keys(cipher: CipherKind, hash: HashKind, secret: &[u8], order: Ordering) -> StretchedKeys {
    let half = cipher.iv_size() + cipher.key_size() + MAC_KEY_SIZE;
    let material = expand(hash, secret, 2 * half);
    let (first, second) = material.split_at(half);

    let k1 = split_bundle(cipher, first);
    let k2 = split_bundle(cipher, second);

    match order {
        Ordering::Less => StretchedKeys { outbound: k2, inbound: k1 },
        Ordering::Equal | Ordering::Greater => StretchedKeys { outbound: k1, inbound: k2 },
    }
}

/// HMAC over the concatenation of `parts`.
pub fn hmac(hash: HashKind, key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    match hash {
        HashKind::Sha256 => mac_parts::<Hmac<Sha256>>(key, parts),
        HashKind::Sha512 => mac_parts::<Hmac<Sha512>>(key, parts),
    }
}

fn mac_parts<M: Mac + hmac::digest::KeyInit>(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let Ok(mut mac) = <M as hmac::digest::KeyInit>::new_from_slice(key) else {
        unreachable!("HMAC accepts keys of any length")
    };
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

fn expand(hash: HashKind, secret: &[u8], len: usize) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(len));
    let mut a = Zeroizing::new(hmac(hash, secret, &[SEED]));

    while out.len() < len {
        let block = Zeroizing::new(hmac(hash, secret, &[&a, SEED]));
        let take = block.len().min(len - out.len());
        out.extend_from_slice(&block[..take]);
        a = Zeroizing::new(hmac(hash, secret, &[&a]));
    }
    out
}

fn split_bundle(cipher: CipherKind, half: &[u8]) -> KeyBundle {
    let (iv, rest) = half.split_at(cipher.iv_size());
    let (cipher_key, mac_key) = rest.split_at(cipher.key_size());
    KeyBundle { iv: iv.to_vec(), cipher_key: cipher_key.to_vec(), mac_key: mac_key.to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Algorithm;

    #[test]
    fn bundle_sizes_follow_cipher() {
        for &cipher in CipherKind::ALL {
            for &hash in HashKind::ALL {
                let keys = stretch_keys(cipher, hash, &[7u8; 32], Ordering::Greater);
                for bundle in [&keys.outbound, &keys.inbound] {
                    assert_eq!(bundle.iv.len(), cipher.iv_size());
                    assert_eq!(bundle.cipher_key.len(), cipher.key_size());
                    assert_eq!(bundle.mac_key.len(), MAC_KEY_SIZE);
                }
            }
        }
    }

    #[test]
    fn opposite_orders_mirror_bundles() {
        let secret = [0x42u8; 48];
        let a = stretch_keys(CipherKind::Aes128, HashKind::Sha256, &secret, Ordering::Greater);
        let b = stretch_keys(CipherKind::Aes128, HashKind::Sha256, &secret, Ordering::Less);

        assert_eq!(a.outbound, b.inbound);
        assert_eq!(a.inbound, b.outbound);
        assert_ne!(a.outbound, a.inbound);
    }

    #[test]
    fn different_secrets_give_different_keys() {
        let a = stretch_keys(CipherKind::Aes256, HashKind::Sha512, &[1u8; 32], Ordering::Greater);
        let b = stretch_keys(CipherKind::Aes256, HashKind::Sha512, &[2u8; 32], Ordering::Greater);
        assert_ne!(a.outbound, b.outbound);
    }

    #[test]
    fn expansion_prefix_is_stable_across_lengths() {
        let short = expand(HashKind::Sha256, b"secret", 40);
        let long = expand(HashKind::Sha256, b"secret", 104);
        assert_eq!(&short[..], &long[..40]);
    }

    #[test]
    fn expansion_first_block_matches_chain() {
        let a0 = hmac(HashKind::Sha256, b"secret", &[SEED]);
        let block = hmac(HashKind::Sha256, b"secret", &[&a0, SEED]);
        let out = expand(HashKind::Sha256, b"secret", 32);
        assert_eq!(&out[..], &block[..]);
    }

    #[test]
    fn hmac_parts_equal_concatenation() {
        let joined = hmac(HashKind::Sha512, b"k", &[b"hello world"]);
        let split = hmac(HashKind::Sha512, b"k", &[b"hello", b" ", b"world"]);
        assert_eq!(joined, split);
        assert_eq!(joined.len(), HashKind::Sha512.output_size());
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let keys = stretch_keys(CipherKind::Aes128, HashKind::Sha256, &[9u8; 32], Ordering::Greater);
        let rendered = format!("{:?}", keys.outbound);
        assert!(rendered.contains("cipher_key_len: 16"));
        assert!(!rendered.contains(&format!("{:?}", keys.outbound.cipher_key)));
    }
}
