//! Secio over turmoil's simulated TCP.
//!
//! Wraps turmoil streams in [`StreamTransport`] so the handshake runs over
//! the same framing a real TCP deployment uses, with turmoil controlling
//! delivery.

use secio_core::{
    Environment, SecioConfig, SecioError, SecureSession, StreamTransport, TransportError, handshake,
};
use secio_crypto::PrivateKey;
use turmoil::net::{TcpListener, TcpStream};

/// Secure session over a simulated TCP stream.
pub type SimSession = SecureSession<StreamTransport<TcpStream>>;

/// Accept one connection on `bind` and run the handshake as listener.
pub async fn accept_one<E: Environment>(
    bind: &str,
    identity: &PrivateKey,
    env: &E,
    config: &SecioConfig,
) -> Result<SimSession, SecioError> {
    let listener = TcpListener::bind(bind).await.map_err(TransportError::Io)?;
    let (stream, peer) = listener.accept().await.map_err(TransportError::Io)?;
    tracing::debug!(%peer, "accepted simulated connection");

    handshake(StreamTransport::new(stream, config.max_frame_size), identity, env, config).await
}

/// Connect to `addr` and run the handshake as dialer.
pub async fn dial<E: Environment>(
    addr: &str,
    identity: &PrivateKey,
    env: &E,
    config: &SecioConfig,
) -> Result<SimSession, SecioError> {
    let stream = TcpStream::connect(addr).await.map_err(TransportError::Io)?;
    handshake(StreamTransport::new(stream, config.max_frame_size), identity, env, config).await
}
