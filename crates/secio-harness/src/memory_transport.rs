//! In-process transport pairs.

use bytes::Bytes;
use secio_core::{Transport, TransportError};
use tokio::sync::mpsc;

/// Rewrites an outgoing message in flight.
///
/// Called with the zero-based index of the message on this endpoint
/// (0 = Propose, 1 = Exchange, 2 = confirmation echo, then application
/// frames) and the bytes about to be delivered.
pub type TamperHook = Box<dyn FnMut(usize, &mut Vec<u8>) + Send>;

/// One end of an unbounded in-memory message pipe.
///
/// Sends never block, so two peers that both write before reading make
/// progress without a scheduler in between.
pub struct MemoryTransport {
    tx: mpsc::UnboundedSender<Bytes>,
    rx: mpsc::UnboundedReceiver<Bytes>,
    sent: usize,
    tamper: Option<TamperHook>,
}

impl MemoryTransport {
    /// Two connected endpoints.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self { tx: a_tx, rx: a_rx, sent: 0, tamper: None },
            Self { tx: b_tx, rx: b_rx, sent: 0, tamper: None },
        )
    }

    /// Install a hook that rewrites messages this endpoint sends.
    #[must_use]
    pub fn with_tamper(mut self, hook: impl FnMut(usize, &mut Vec<u8>) + Send + 'static) -> Self {
        self.tamper = Some(Box::new(hook));
        self
    }

    /// Number of messages sent so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Transport for MemoryTransport {
    async fn send(&mut self, message: &[u8]) -> Result<usize, TransportError> {
        let index = self.sent;
        self.sent += 1;

        let mut bytes = message.to_vec();
        if let Some(hook) = self.tamper.as_mut() {
            hook(index, &mut bytes);
        }

        self.tx.send(Bytes::from(bytes)).map_err(|_| TransportError::Closed)?;
        Ok(message.len())
    }

    async fn receive(&mut self) -> Result<Bytes, TransportError> {
        self.rx.recv().await.ok_or(TransportError::Closed)
    }
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("sent", &self.sent)
            .field("tampered", &self.tamper.is_some())
            .finish_non_exhaustive()
    }
}
