//! The secio handshake.
//!
//! ```text
//! propose   --> "/secio/1.0.0\n" ‖ Propose        (both sides, then read)
//! order     --> SHA256(key ‖ nonce) comparison   (no I/O)
//! select    --> curve, cipher, hash              (no I/O)
//! exchange  --> Exchange { epubkey, signature }  (both sides, then read)
//! stretch   --> k1 | k2 assigned by order        (no I/O)
//! confirm   --> encrypted nonce echo             (both sides, then read)
//! ```
//!
//! Every I/O round writes before it reads, so two peers running the
//! handshake against each other never wait on one another. Any failure
//! drops all partial state; nothing from an aborted attempt is reused.

mod exchange;
mod propose;

use secio_crypto::{
    Algorithm, CipherState, Parameters, PeerId, PrivateKey, PublicKey, StretchedKeys, stretch_keys,
};
use secio_proto::NONCE_SIZE;

use crate::{
    config::SecioConfig,
    env::Environment,
    error::{SecioError, TransportError},
    session::SecureSession,
    transport::Transport,
};

/// Run the full handshake over `transport` and return a confirmed session.
///
/// The whole exchange runs under `config.handshake_timeout` when set.
///
/// # Errors
///
/// Any [`SecioError`] from the taxonomy; the transport is dropped with the
/// partial session on failure.
pub async fn handshake<T: Transport, E: Environment>(
    transport: T,
    identity: &PrivateKey,
    env: &E,
    config: &SecioConfig,
) -> Result<SecureSession<T>, SecioError> {
    let attempt = async { negotiate(transport, identity, env, config).await?.confirm().await };

    let result = match config.handshake_timeout {
        Some(limit) => match tokio::time::timeout(limit, attempt).await {
            Ok(result) => result,
            Err(_) => Err(SecioError::Timeout { elapsed: limit }),
        },
        None => attempt.await,
    };

    if let Err(err) = &result {
        tracing::warn!(error = %err, "secio handshake failed");
    }
    result
}

/// Run every stage up to key stretching, stopping before confirmation.
///
/// Callers that need to inspect the derived keys before traffic flows use
/// this with [`PendingSession::confirm`]. [`handshake`] is the two combined
/// under a deadline.
pub async fn negotiate<T: Transport, E: Environment>(
    mut transport: T,
    identity: &PrivateKey,
    env: &E,
    config: &SecioConfig,
) -> Result<PendingSession<T>, SecioError> {
    let proposals = propose::exchange_proposals(&mut transport, identity, env, &config.catalog).await?;
    let negotiated = exchange::exchange_ephemeral(&mut transport, identity, &proposals).await?;

    let keys = stretch_keys(
        negotiated.parameters.cipher,
        negotiated.parameters.hash,
        &negotiated.shared_secret,
        negotiated.order,
    );
    tracing::debug!(peer = %proposals.remote_peer, "keys stretched");

    let Ok(remote_nonce) = <[u8; NONCE_SIZE]>::try_from(proposals.remote.rand.as_slice()) else {
        unreachable!("invariant: Propose::decode_validated enforces a {NONCE_SIZE}-byte nonce")
    };

    Ok(PendingSession {
        transport,
        parameters: negotiated.parameters,
        keys,
        local_nonce: proposals.local_nonce,
        remote_nonce,
        remote_key: proposals.remote_key,
        remote_peer: proposals.remote_peer,
    })
}

/// Keys are derived but the peer has not yet proven it holds them.
pub struct PendingSession<T> {
    transport: T,
    parameters: Parameters,
    keys: StretchedKeys,
    local_nonce: [u8; NONCE_SIZE],
    remote_nonce: [u8; NONCE_SIZE],
    remote_key: PublicKey,
    remote_peer: PeerId,
}

impl<T: Transport> PendingSession<T> {
    /// Negotiated algorithms.
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Fingerprint of the peer's identity key.
    pub fn remote_peer(&self) -> PeerId {
        self.remote_peer
    }

    /// Directional keys as derived by this side.
    pub fn keys(&self) -> &StretchedKeys {
        &self.keys
    }

    /// Mutable access to the derived keys.
    ///
    /// Any change makes confirmation fail; exists for fault injection.
    pub fn keys_mut(&mut self) -> &mut StretchedKeys {
        &mut self.keys
    }

    /// Install the cipher states and run the encrypted nonce echo.
    ///
    /// Writes the peer's nonce and expects this side's nonce back. Only a
    /// peer that derived the mirror key bundles can produce it.
    ///
    /// # Errors
    ///
    /// - `HandshakeConfirmationFailed` if the echo fails to authenticate,
    ///   does not match, or the peer closes before echoing
    /// - `TransportFailure` if the transport fails underneath
    pub async fn confirm(self) -> Result<SecureSession<T>, SecioError> {
        let Parameters { cipher, hash, .. } = self.parameters;
        let outbound = CipherState::new(cipher, hash, &self.keys.outbound)?;
        let inbound = CipherState::new(cipher, hash, &self.keys.inbound)?;

        let mut session = SecureSession::new(
            self.transport,
            outbound,
            inbound,
            self.parameters,
            self.remote_key,
            self.remote_peer,
        );

        session.write(&self.remote_nonce).await.map_err(confirmation_error)?;
        let echoed = session.read().await.map_err(confirmation_error)?;

        if echoed.as_slice() != self.local_nonce.as_slice() {
            return Err(SecioError::HandshakeConfirmationFailed {
                reason: "peer echoed a different nonce".to_string(),
            });
        }

        tracing::debug!(
            peer = %session.remote_peer(),
            curve = self.parameters.curve.name(),
            cipher = cipher.name(),
            hash = hash.name(),
            "secure session confirmed"
        );
        Ok(session)
    }
}

impl<T> std::fmt::Debug for PendingSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSession")
            .field("parameters", &self.parameters)
            .field("remote_peer", &self.remote_peer)
            .finish_non_exhaustive()
    }
}

fn confirmation_error(err: SecioError) -> SecioError {
    match err {
        SecioError::TamperedOrCorrupted => {
            SecioError::HandshakeConfirmationFailed { reason: "echo failed authentication".to_string() }
        },
        SecioError::TransportFailure(TransportError::Closed | TransportError::Empty { .. }) => {
            SecioError::HandshakeConfirmationFailed { reason: "peer closed before echoing the nonce".to_string() }
        },
        other => other,
    }
}
