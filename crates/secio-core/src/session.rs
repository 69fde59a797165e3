//! Encrypted session over a confirmed handshake.

use secio_crypto::{CipherState, Parameters, PeerId, PublicKey};

use crate::{
    error::SecioError,
    transport::{Transport, receive_message, send_message},
};

/// An authenticated, encrypted channel to one peer.
///
/// Owned exclusively by the connection that ran the handshake. Each
/// direction has its own cipher and MAC state; frames must be read in the
/// order they were written. The first fatal error closes the session and
/// every later call returns [`SecioError::SessionClosed`].
pub struct SecureSession<T> {
    transport: T,
    outbound: CipherState,
    inbound: CipherState,
    parameters: Parameters,
    remote_key: PublicKey,
    remote_peer: PeerId,
    closed: bool,
}

impl<T: Transport> SecureSession<T> {
    pub(crate) fn new(
        transport: T,
        outbound: CipherState,
        inbound: CipherState,
        parameters: Parameters,
        remote_key: PublicKey,
        remote_peer: PeerId,
    ) -> Self {
        Self { transport, outbound, inbound, parameters, remote_key, remote_peer, closed: false }
    }

    /// Encrypt, MAC, and send `plaintext`. Returns the plaintext length.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after an earlier fatal error
    /// - `TransportFailure` if the send fails (closes the session)
    pub async fn write(&mut self, plaintext: &[u8]) -> Result<usize, SecioError> {
        if self.closed {
            return Err(SecioError::SessionClosed);
        }

        let result = async {
            let frame = self.outbound.seal(plaintext)?;
            send_message(&mut self.transport, &frame).await
        }
        .await;

        match result {
            Ok(_) => Ok(plaintext.len()),
            Err(err) => Err(self.close(err)),
        }
    }

    /// Receive, verify, and decrypt the next frame.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after an earlier fatal error
    /// - `TamperedOrCorrupted` if the MAC does not verify (closes the session)
    /// - `TransportFailure` if the receive fails (closes the session)
    pub async fn read(&mut self) -> Result<Vec<u8>, SecioError> {
        if self.closed {
            return Err(SecioError::SessionClosed);
        }

        let result = async {
            let frame = receive_message(&mut self.transport).await?;
            Ok::<_, SecioError>(self.inbound.open(&frame)?)
        }
        .await;

        result.map_err(|err| self.close(err))
    }

    /// Negotiated algorithms.
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Peer's identity key, as authenticated by the Exchange signature.
    pub fn remote_public_key(&self) -> &PublicKey {
        &self.remote_key
    }

    /// Fingerprint of the peer's identity key.
    pub fn remote_peer(&self) -> PeerId {
        self.remote_peer
    }

    /// True once a fatal error has closed the session.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, err: SecioError) -> SecioError {
        tracing::warn!(peer = %self.remote_peer, error = %err, "closing secure session");
        self.closed = true;
        err
    }
}

impl<T> std::fmt::Debug for SecureSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureSession")
            .field("parameters", &self.parameters)
            .field("remote_peer", &self.remote_peer)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
