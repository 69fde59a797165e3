//! Message transport consumed by the handshake and session.
//!
//! A transport moves whole messages: one `send` is delivered as one
//! `receive` on the other side. How messages are delimited is the
//! transport's business; [`StreamTransport`] uses a 4-byte big-endian length
//! prefix over any tokio byte stream.

use std::future::Future;

use bytes::{Bytes, BytesMut};
use secio_proto::{LENGTH_PREFIX_SIZE, decode_frame_len, encode_frame};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{SecioError, TransportError};

/// Whole-message send and receive.
///
/// Implementations need not be cancellation safe: a handshake that times
/// out discards its transport state along with everything else.
pub trait Transport: Send {
    /// Send one message, returning the number of payload bytes written.
    fn send(&mut self, message: &[u8]) -> impl Future<Output = Result<usize, TransportError>> + Send;

    /// Receive the next message.
    fn receive(&mut self) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}

/// Length-prefixed messages over a byte stream (TCP, turmoil, duplex pipes).
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: S,
    max_frame_size: usize,
    write_buf: BytesMut,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a stream, rejecting frames above `max_frame_size`.
    pub fn new(stream: S, max_frame_size: usize) -> Self {
        Self { stream, max_frame_size, write_buf: BytesMut::new() }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: &[u8]) -> Result<usize, TransportError> {
        self.write_buf.clear();
        encode_frame(message, self.max_frame_size, &mut self.write_buf)?;

        self.stream.write_all(&self.write_buf).await?;
        self.stream.flush().await?;
        Ok(message.len())
    }

    async fn receive(&mut self) -> Result<Bytes, TransportError> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        if let Err(e) = self.stream.read_exact(&mut prefix).await {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => TransportError::Closed,
                _ => TransportError::Io(e),
            });
        }

        let len = decode_frame_len(prefix, self.max_frame_size)?;
        let mut payload = vec![0u8; len];
        self.stream.read_exact(&mut payload).await?;
        Ok(Bytes::from(payload))
    }
}

/// Send a message, treating a zero-byte write as fatal.
pub(crate) async fn send_message<T: Transport>(transport: &mut T, message: &[u8]) -> Result<usize, SecioError> {
    let written = transport.send(message).await?;
    if written == 0 {
        return Err(TransportError::Empty { operation: "send" }.into());
    }
    Ok(written)
}

/// Receive a message, treating an empty receive as fatal.
pub(crate) async fn receive_message<T: Transport>(transport: &mut T) -> Result<Bytes, SecioError> {
    let message = transport.receive().await?;
    if message.is_empty() {
        return Err(TransportError::Empty { operation: "receive" }.into());
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use secio_proto::ProtocolError;

    use super::*;

    #[tokio::test]
    async fn stream_transport_delivers_whole_messages() {
        let (a, b) = tokio::io::duplex(64);
        let mut left = StreamTransport::new(a, 1024);
        let mut right = StreamTransport::new(b, 1024);

        let sender = tokio::spawn(async move {
            for msg in [&b"one"[..], b"two two", &[0xAB; 300]] {
                let Ok(n) = left.send(msg).await else { panic!("send") };
                assert_eq!(n, msg.len());
            }
        });

        assert_eq!(right.receive().await.ok().as_deref(), Some(&b"one"[..]));
        assert_eq!(right.receive().await.ok().as_deref(), Some(&b"two two"[..]));
        assert_eq!(right.receive().await.ok().map(|m| m.len()), Some(300));
        assert!(sender.await.is_ok());
    }

    #[tokio::test]
    async fn oversized_inbound_frame_is_rejected() {
        let (mut a, b) = tokio::io::duplex(64);
        let mut right = StreamTransport::new(b, 16);

        let Ok(()) = a.write_all(&1000u32.to_be_bytes()).await else { panic!("write") };

        assert!(matches!(
            right.receive().await,
            Err(TransportError::Framing(ProtocolError::FrameTooLarge { size: 1000, max: 16 }))
        ));
    }

    #[tokio::test]
    async fn oversized_outbound_frame_is_rejected() {
        let (a, _b) = tokio::io::duplex(64);
        let mut left = StreamTransport::new(a, 16);

        assert!(matches!(left.send(&[0u8; 17]).await, Err(TransportError::Framing(_))));
    }

    #[tokio::test]
    async fn closed_stream_reports_closed() {
        let (a, b) = tokio::io::duplex(64);
        drop(a);
        let mut right = StreamTransport::new(b, 16);

        assert!(matches!(right.receive().await, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn empty_receive_is_fatal() {
        let (a, b) = tokio::io::duplex(64);
        let mut left = StreamTransport::new(a, 16);
        let mut right = StreamTransport::new(b, 16);

        let Ok(_) = left.send(&[]).await else { panic!("send") };
        assert!(matches!(
            receive_message(&mut right).await,
            Err(SecioError::TransportFailure(TransportError::Empty { operation: "receive" }))
        ));
    }
}
