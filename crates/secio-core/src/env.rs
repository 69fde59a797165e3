//! Environment abstraction for deterministic testing.
//!
//! Decouples the handshake from the OS RNG so simulation runs produce the
//! same nonces for the same seed. Ephemeral keys and signatures still draw
//! from the OS RNG inside `secio-crypto`.

use secio_proto::NONCE_SIZE;

/// Source of handshake randomness.
///
/// # Invariants
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Given the same seed, a simulated environment yields the same bytes
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Fresh 16-byte Propose nonce.
    fn random_nonce(&self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random_bytes(&mut nonce);
        nonce
    }
}

/// Production environment backed by the OS RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. A node without working randomness would
/// reuse nonces and cannot run the handshake securely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}
