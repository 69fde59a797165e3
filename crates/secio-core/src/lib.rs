//! Secio secure-channel handshake.
//!
//! Two peers that share nothing but a transport run [`handshake`] against
//! each other and come out with a [`SecureSession`]: an encrypted,
//! MAC-protected channel bound to the peer's long-term identity key.
//!
//! # Architecture
//!
//! - [`handshake`]: the staged protocol (propose, negotiate, exchange,
//!   stretch, confirm)
//! - [`session`]: per-direction cipher state for application traffic
//! - [`transport`]: the whole-message [`Transport`] trait and a
//!   length-prefixed [`StreamTransport`] over tokio streams
//! - [`env`]: the [`Environment`] randomness seam for deterministic tests
//! - [`config`]: algorithm catalog, deadline, and frame limit
//!
//! # Example
//!
//! ```no_run
//! use secio_core::{SecioConfig, StreamTransport, SystemEnv, handshake};
//! use secio_crypto::PrivateKey;
//!
//! # async fn run(stream: tokio::net::TcpStream) -> Result<(), secio_core::SecioError> {
//! let config = SecioConfig::default();
//! let identity = PrivateKey::generate_ed25519();
//! let transport = StreamTransport::new(stream, config.max_frame_size);
//!
//! let mut session = handshake(transport, &identity, &SystemEnv::new(), &config).await?;
//! session.write(b"hello").await?;
//! let reply = session.read().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod env;
pub mod error;
pub mod handshake;
pub mod session;
pub mod transport;

pub use config::{DEFAULT_HANDSHAKE_TIMEOUT, SecioConfig};
pub use env::{Environment, SystemEnv};
pub use error::{SecioError, TransportError};
pub use handshake::{PendingSession, handshake, negotiate};
pub use session::SecureSession;
pub use transport::{StreamTransport, Transport};
