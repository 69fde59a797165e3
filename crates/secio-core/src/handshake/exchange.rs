//! Second round: negotiate, then swap signed ephemeral keys.

use std::cmp::Ordering;

use prost::Message;
use secio_crypto::{Algorithm, EphemeralKeyPair, Parameters, PrivateKey, proposal_order};
use secio_proto::Exchange;
use zeroize::Zeroizing;

use super::propose::Proposals;
use crate::{
    error::SecioError,
    transport::{Transport, receive_message, send_message},
};

/// Outcome of the ephemeral exchange.
pub(crate) struct Negotiated {
    pub parameters: Parameters,
    pub order: Ordering,
    pub shared_secret: Zeroizing<Vec<u8>>,
}

pub(crate) async fn exchange_ephemeral<T: Transport>(
    transport: &mut T,
    identity: &PrivateKey,
    proposals: &Proposals,
) -> Result<Negotiated, SecioError> {
    let order = proposal_order(&proposals.local, &proposals.remote);
    let parameters = Parameters::negotiate(order, &proposals.local, &proposals.remote)?;

    tracing::debug!(
        peer = %proposals.remote_peer,
        ?order,
        curve = parameters.curve.name(),
        cipher = parameters.cipher.name(),
        hash = parameters.hash.name(),
        "parameters selected"
    );

    let ephemeral = EphemeralKeyPair::generate(parameters.curve);

    let signed = signed_transcript(proposals, ephemeral.public_key());
    let local_exchange =
        Exchange { epubkey: ephemeral.public_key().to_vec(), signature: identity.sign(&signed)? };

    send_message(transport, &local_exchange.encode_to_vec()).await?;
    let response = receive_message(transport).await?;
    let remote_exchange = Exchange::decode_validated(&response)?;

    let expected = expected_transcript(proposals, &remote_exchange.epubkey);
    proposals.remote_key.verify(&expected, &remote_exchange.signature)?;

    tracing::debug!(peer = %proposals.remote_peer, "exchange signature verified");

    let shared_secret = ephemeral.agree(&remote_exchange.epubkey)?;
    Ok(Negotiated { parameters, order, shared_secret })
}

/// Bytes this side signs: peer Propose, own Propose, own ephemeral key.
fn signed_transcript(proposals: &Proposals, own_epubkey: &[u8]) -> Vec<u8> {
    transcript(&proposals.remote_bytes, &proposals.local_bytes, own_epubkey)
}

/// Bytes the peer must have signed, seen from this side.
fn expected_transcript(proposals: &Proposals, peer_epubkey: &[u8]) -> Vec<u8> {
    transcript(&proposals.local_bytes, &proposals.remote_bytes, peer_epubkey)
}

fn transcript(first: &[u8], second: &[u8], epubkey: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(first.len() + second.len() + epubkey.len());
    out.extend_from_slice(first);
    out.extend_from_slice(second);
    out.extend_from_slice(epubkey);
    out
}
