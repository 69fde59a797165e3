//! First round: swap Propose messages behind the protocol line.

use prost::Message;
use secio_crypto::{Catalog, PeerId, PrivateKey, PublicKey};
use secio_proto::{NONCE_SIZE, Propose, split_protocol_line, with_protocol_line};

use crate::{
    env::Environment,
    error::SecioError,
    transport::{Transport, receive_message, send_message},
};

/// Both proposals, kept as the exact bytes that went over the wire.
///
/// The encoded bytes are the transcript material for the Exchange
/// signature; the decoded structs are only read for negotiation.
pub(crate) struct Proposals {
    pub local: Propose,
    pub local_bytes: Vec<u8>,
    pub remote: Propose,
    pub remote_bytes: Vec<u8>,
    pub local_nonce: [u8; NONCE_SIZE],
    pub remote_key: PublicKey,
    pub remote_peer: PeerId,
}

pub(crate) async fn exchange_proposals<T: Transport, E: Environment>(
    transport: &mut T,
    identity: &PrivateKey,
    env: &E,
    catalog: &Catalog,
) -> Result<Proposals, SecioError> {
    let local_nonce = env.random_nonce();
    let local = Propose {
        rand: local_nonce.to_vec(),
        public_key: identity.public().to_protobuf()?,
        exchanges: catalog.exchanges_list(),
        ciphers: catalog.ciphers_list(),
        hashes: catalog.hashes_list(),
    };
    let local_bytes = local.encode_to_vec();

    send_message(transport, &with_protocol_line(&local_bytes)).await?;
    let response = receive_message(transport).await?;

    let (_line, body) = split_protocol_line(&response)?;
    let remote = Propose::decode_validated(body)?;
    let remote_bytes = body.to_vec();

    let remote_key = PublicKey::from_protobuf(&remote.public_key)?;
    let remote_peer = PeerId::from_public_key_bytes(&remote.public_key);

    tracing::debug!(
        peer = %remote_peer,
        key_type = ?remote_key.kind(),
        exchanges = %remote.exchanges,
        ciphers = %remote.ciphers,
        hashes = %remote.hashes,
        "proposals exchanged"
    );

    Ok(Proposals { local, local_bytes, remote, remote_bytes, local_nonce, remote_key, remote_peer })
}
