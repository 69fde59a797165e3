//! Handshake configuration.

use std::time::Duration;

use secio_crypto::Catalog;
use secio_proto::DEFAULT_MAX_FRAME_SIZE;

/// Default deadline for a whole handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared read-only by every handshake a node runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecioConfig {
    /// Algorithms offered in the Propose, most preferred first
    pub catalog: Catalog,
    /// Deadline for the whole handshake; `None` waits indefinitely
    pub handshake_timeout: Option<Duration>,
    /// Largest length-prefixed frame a stream transport accepts
    pub max_frame_size: usize,
}

impl Default for SecioConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            handshake_timeout: Some(DEFAULT_HANDSHAKE_TIMEOUT),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl SecioConfig {
    /// Default settings with a different catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog, ..Self::default() }
    }
}
