//! Outbound send capability of a connection.
//!
//! An [`Outbound`] is the handle the relay uses to push payloads to one peer.
//! The matching [`OutboundReceiver`] is drained by that peer's writer task.
//! Delivery never blocks: a full bounded queue is reported as
//! [`DeliveryError::Full`] and the caller decides what to do with the peer.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Notify, mpsc};

use super::{error::DeliveryError, value_object::Payload};

enum Sender {
    Bounded(mpsc::Sender<Payload>),
    Unbounded(mpsc::UnboundedSender<Payload>),
}

struct Inner {
    sender: Sender,
    closed: AtomicBool,
    notify: Notify,
}

/// Cloneable handle for sending payloads to one connection.
#[derive(Clone)]
pub struct Outbound {
    inner: Arc<Inner>,
}

/// Receiving half, owned by the connection's writer task.
pub enum OutboundReceiver {
    Bounded(mpsc::Receiver<Payload>),
    Unbounded(mpsc::UnboundedReceiver<Payload>),
}

/// Create an outbound channel.
///
/// `capacity` of `None` gives an unbounded queue; `Some(n)` bounds it to `n`
/// pending payloads (a zero capacity is raised to 1).
pub fn channel(capacity: Option<usize>) -> (Outbound, OutboundReceiver) {
    let (sender, receiver) = match capacity {
        Some(capacity) => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (Sender::Bounded(tx), OutboundReceiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (Sender::Unbounded(tx), OutboundReceiver::Unbounded(rx))
        }
    };

    let outbound = Outbound {
        inner: Arc::new(Inner {
            sender,
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }),
    };
    (outbound, receiver)
}

impl Outbound {
    /// Queue a payload without waiting.
    pub fn deliver(&self, payload: Payload) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }

        match &self.inner.sender {
            Sender::Bounded(tx) => tx.try_send(payload).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
                mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            }),
            Sender::Unbounded(tx) => tx.send(payload).map_err(|_| DeliveryError::Closed),
        }
    }

    /// Whether the connection still accepts payloads.
    pub fn is_open(&self) -> bool {
        if self.inner.closed.load(Ordering::Acquire) {
            return false;
        }
        match &self.inner.sender {
            Sender::Bounded(tx) => !tx.is_closed(),
            Sender::Unbounded(tx) => !tx.is_closed(),
        }
    }

    /// Mark the connection closed and wake whoever waits on [`Outbound::closed`].
    ///
    /// Payloads already queued are not delivered afterwards.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Resolves once [`Outbound::close`] has been called.
    pub async fn closed(&self) {
        loop {
            // Register before checking the flag so a concurrent close() is not missed.
            let notified = self.inner.notify.notified();
            if self.inner.closed.load(Ordering::Acquire) {
                return;
            }
            notified.await;
        }
    }
}

impl OutboundReceiver {
    /// Receive the next queued payload, `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Payload> {
        match self {
            OutboundReceiver::Bounded(rx) => rx.recv().await,
            OutboundReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}
