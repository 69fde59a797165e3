//! Secio echo node.
//!
//! A listener accepts TCP connections, runs the secio handshake on each,
//! and echoes every decrypted message back. A dialer connects, sends one
//! message, and returns the echoed reply.

#![forbid(unsafe_code)]

use std::{io, sync::Arc};

use clap::ValueEnum;
use secio_core::{SecioConfig, SecioError, StreamTransport, SystemEnv, TransportError, handshake};
use secio_crypto::{CryptoError, PrivateKey};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// RSA modulus size for generated node identities.
pub const RSA_IDENTITY_BITS: usize = 2048;

/// Identity key algorithm for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdentityKind {
    /// Ed25519
    Ed25519,
    /// RSA-2048
    Rsa,
}

impl IdentityKind {
    /// Fresh identity of this kind.
    pub fn generate(self) -> Result<PrivateKey, CryptoError> {
        match self {
            Self::Ed25519 => Ok(PrivateKey::generate_ed25519()),
            Self::Rsa => PrivateKey::generate_rsa(RSA_IDENTITY_BITS),
        }
    }
}

/// Accept connections forever, echoing over a secure session per peer.
///
/// Handshake and session failures are logged and end only that
/// connection.
pub async fn serve(listener: TcpListener, identity: Arc<PrivateKey>, config: Arc<SecioConfig>) -> io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let identity = Arc::clone(&identity);
        let config = Arc::clone(&config);

        tokio::spawn(async move {
            tracing::info!(%addr, "connection accepted");
            match serve_connection(stream, &identity, &config).await {
                Ok(echoed) => tracing::info!(%addr, echoed, "connection closed"),
                Err(e) => tracing::warn!(%addr, error = %e, "connection failed"),
            }
        });
    }
}

/// Run the handshake on one stream and echo until the peer hangs up.
///
/// Returns the number of messages echoed.
pub async fn serve_connection(
    stream: TcpStream,
    identity: &PrivateKey,
    config: &SecioConfig,
) -> Result<usize, SecioError> {
    let transport = StreamTransport::new(stream, config.max_frame_size);
    let mut session = handshake(transport, identity, &SystemEnv::new(), config).await?;
    tracing::info!(peer = %session.remote_peer(), params = ?session.parameters(), "secure session established");

    let mut echoed = 0;
    loop {
        let message = match session.read().await {
            Ok(message) => message,
            Err(SecioError::TransportFailure(TransportError::Closed)) => return Ok(echoed),
            Err(e) => return Err(e),
        };
        session.write(&message).await?;
        echoed += 1;
    }
}

/// Connect, handshake, send `message`, and return the echoed reply.
pub async fn dial(
    addr: impl ToSocketAddrs,
    identity: &PrivateKey,
    config: &SecioConfig,
    message: &[u8],
) -> Result<Vec<u8>, SecioError> {
    let stream = TcpStream::connect(addr).await.map_err(TransportError::Io)?;
    let transport = StreamTransport::new(stream, config.max_frame_size);

    let mut session = handshake(transport, identity, &SystemEnv::new(), config).await?;
    tracing::info!(peer = %session.remote_peer(), params = ?session.parameters(), "secure session established");

    session.write(message).await?;
    session.read().await
}
