//! Algorithm catalog.
//!
//! The supported algorithms are closed enums; their wire names are the
//! tokens used in negotiation lists. A [`Catalog`] is the ordered subset a
//! node offers, rendered to comma-separated strings for its Propose.

use std::fmt;

/// A negotiable algorithm family.
pub trait Algorithm: Copy + Eq + fmt::Debug + Sized + 'static {
    /// Category name used in error messages ("exchange", "cipher", "hash").
    const CATEGORY: &'static str;

    /// Every supported algorithm, in default preference order.
    const ALL: &'static [Self];

    /// Wire token for this algorithm.
    fn name(self) -> &'static str;

    /// Parse a wire token. Matching is exact and case-sensitive.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|alg| alg.name() == name)
    }
}

/// Elliptic curve for the ephemeral key exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
}

impl Algorithm for Curve {
    const CATEGORY: &'static str = "exchange";
    const ALL: &'static [Self] = &[Self::P256, Self::P384, Self::P521];

    fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }
}

/// Symmetric cipher for the secure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    /// AES with a 256-bit key, CTR mode
    Aes256,
    /// AES with a 128-bit key, CTR mode
    Aes128,
    /// Blowfish with a 256-bit key, CTR mode
    Blowfish,
}

impl CipherKind {
    /// Cipher key length in bytes.
    pub const fn key_size(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes256 | Self::Blowfish => 32,
        }
    }

    /// IV (initial counter block) length in bytes.
    pub const fn iv_size(self) -> usize {
        match self {
            Self::Aes128 | Self::Aes256 => 16,
            Self::Blowfish => 8,
        }
    }
}

impl Algorithm for CipherKind {
    const CATEGORY: &'static str = "cipher";
    const ALL: &'static [Self] = &[Self::Aes256, Self::Aes128, Self::Blowfish];

    fn name(self) -> &'static str {
        match self {
            Self::Aes256 => "AES-256",
            Self::Aes128 => "AES-128",
            Self::Blowfish => "Blowfish",
        }
    }
}

/// Hash used for key stretching and frame MACs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl HashKind {
    /// Digest (and therefore MAC tag) length in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl Algorithm for HashKind {
    const CATEGORY: &'static str = "hash";
    const ALL: &'static [Self] = &[Self::Sha256, Self::Sha512];

    fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// The ordered algorithm lists a node offers.
///
/// Immutable once built and shared read-only across sessions. Tests inject
/// restricted catalogs to force particular negotiation outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    curves: Vec<Curve>,
    ciphers: Vec<CipherKind>,
    hashes: Vec<HashKind>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self { curves: Curve::ALL.to_vec(), ciphers: CipherKind::ALL.to_vec(), hashes: HashKind::ALL.to_vec() }
    }
}

impl Catalog {
    /// Build a catalog from explicit preference lists, most preferred first.
    pub fn new(curves: &[Curve], ciphers: &[CipherKind], hashes: &[HashKind]) -> Self {
        Self { curves: curves.to_vec(), ciphers: ciphers.to_vec(), hashes: hashes.to_vec() }
    }

    /// Offered curves, most preferred first.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Offered ciphers, most preferred first.
    pub fn ciphers(&self) -> &[CipherKind] {
        &self.ciphers
    }

    /// Offered hashes, most preferred first.
    pub fn hashes(&self) -> &[HashKind] {
        &self.hashes
    }

    /// Comma-separated exchange list for a Propose.
    pub fn exchanges_list(&self) -> String {
        join_names(&self.curves)
    }

    /// Comma-separated cipher list for a Propose.
    pub fn ciphers_list(&self) -> String {
        join_names(&self.ciphers)
    }

    /// Comma-separated hash list for a Propose.
    pub fn hashes_list(&self) -> String {
        join_names(&self.hashes)
    }
}

fn join_names<A: Algorithm>(algorithms: &[A]) -> String {
    algorithms.iter().map(|alg| alg.name()).collect::<Vec<_>>().join(",")
}
