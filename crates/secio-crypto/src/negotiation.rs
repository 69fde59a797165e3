//! Role ordering and algorithm selection.
//!
//! Both peers must reach the same decisions from the same two proposals
//! without another round trip. Each side hashes `public_key ‖ nonce` of both
//! Proposes and compares the digests; the comparison decides whose
//! preference list leads. Because the comparison is taken from the opposite
//! perspective on the other peer, the two peers see opposite signs and
//! therefore agree on the same leader.

use std::cmp::Ordering;

use secio_proto::Propose;
use sha2::{Digest, Sha256};

use crate::{
    catalog::{Algorithm, CipherKind, Curve, HashKind},
    error::CryptoError,
};

/// Ordered algorithm tokens parsed from a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NegotiationList(Vec<String>);

impl NegotiationList {
    /// Split on `,`, keeping order and interior empty tokens. Trailing empty
    /// segments are dropped, so `""` is the empty list.
    pub fn parse(list: &str) -> Self {
        let mut tokens: Vec<String> = list.split(',').map(str::to_owned).collect();
        while tokens.last().is_some_and(String::is_empty) {
            tokens.pop();
        }
        Self(tokens)
    }

    /// First (most preferred) token.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Tokens in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse a comma-separated negotiation list.
pub fn parse_list(list: &str) -> NegotiationList {
    NegotiationList::parse(list)
}

/// Commitment hash of one proposal: `SHA256(public_key ‖ nonce)`.
pub fn order_hash(public_key: &[u8], nonce: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(public_key);
    hasher.update(nonce);
    hasher.finalize().into()
}

/// Unsigned byte-wise lexicographic comparison; the first differing byte
/// decides.
pub fn compare_hashes(a: &[u8; 32], b: &[u8; 32]) -> Ordering {
    a.cmp(b)
}

/// Role ordering as seen from the local side.
///
/// `Greater` means the local list leads, `Less` means the remote list leads,
/// `Equal` is the degenerate tie (identical key and nonce on both sides).
pub fn proposal_order(local: &Propose, remote: &Propose) -> Ordering {
    let local_hash = order_hash(&local.public_key, &local.rand);
    let remote_hash = order_hash(&remote.public_key, &remote.rand);
    compare_hashes(&remote_hash, &local_hash)
}

/// Pick one algorithm token from two preference lists.
///
/// On a tie the local list's first entry wins without looking at the remote
/// list. Otherwise the leading list is walked in order and the first entry
/// that also appears anywhere in the following list is chosen. `None` means
/// the lists share nothing.
pub fn select_best(order: Ordering, local: &str, remote: &str) -> Option<String> {
    let local = NegotiationList::parse(local);

    let (lead, follow) = match order {
        Ordering::Equal => return local.first().map(str::to_owned),
        Ordering::Greater => (local, NegotiationList::parse(remote)),
        Ordering::Less => (NegotiationList::parse(remote), local),
    };

    lead.iter().find(|token| follow.contains(token)).map(str::to_owned)
}

/// Select and parse one algorithm of family `A`.
pub fn negotiate<A: Algorithm>(order: Ordering, local: &str, remote: &str) -> Result<A, CryptoError> {
    select_best(order, local, remote).as_deref().and_then(A::from_name).ok_or_else(|| {
        CryptoError::NoCommonAlgorithm {
            category: A::CATEGORY,
            local: local.to_owned(),
            remote: remote.to_owned(),
        }
    })
}

/// Algorithms agreed for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    /// Ephemeral key exchange curve
    pub curve: Curve,
    /// Channel cipher
    pub cipher: CipherKind,
    /// Stretching and MAC hash
    pub hash: HashKind,
}

impl Parameters {
    /// Run the selector once per category over the two proposals' lists.
    pub fn negotiate(order: Ordering, local: &Propose, remote: &Propose) -> Result<Self, CryptoError> {
        Ok(Self {
            curve: negotiate(order, &local.exchanges, &remote.exchanges)?,
            cipher: negotiate(order, &local.ciphers, &remote.ciphers)?,
            hash: negotiate(order, &local.hashes, &remote.hashes)?,
        })
    }
}
