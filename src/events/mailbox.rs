//! # Ordered single-consumer event mailbox.
//!
//! [`Mailbox`] is a thin wrapper around [`tokio::sync::mpsc::unbounded_channel`]
//! that connects every producer (supervisors, one-shot runners, input adapters)
//! to the control loop.
//!
//! ## Architecture
//! ```text
//! Producers (many):                      Consumer (one):
//!   ProcessSupervisor ──┐
//!   one-shot runner   ──┼──► MailboxSender ──► Mailbox::get ──► control loop
//!   ButtonSource      ──┘     (unbounded)
//! ```
//!
//! ## Rules
//! - **Non-blocking put**: `put()` never waits; the queue is unbounded.
//! - **FIFO**: events are delivered in the order they were enqueued.
//! - **Lossless**: nothing is dropped or coalesced while the consumer is alive.
//! - **Suspending get**: `get()` waits until an event is available.

use tokio::sync::mpsc;

use super::event::Event;

/// Creates a connected sender/mailbox pair.
pub fn mailbox() -> (MailboxSender, Mailbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MailboxSender { tx }, Mailbox { rx })
}

/// Producer side of the mailbox.
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone, Debug)]
pub struct MailboxSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl MailboxSender {
    /// Enqueues an event without blocking.
    ///
    /// Returns `false` if the consumer is gone (the event is discarded).
    pub fn put(&self, ev: Event) -> bool {
        self.tx.send(ev).is_ok()
    }

    /// True once the consuming [`Mailbox`] has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the mailbox. Owned by the control loop.
#[derive(Debug)]
pub struct Mailbox {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Mailbox {
    /// Waits for the next event.
    ///
    /// Returns `None` only when every sender has been dropped and the queue is drained.
    pub async fn get(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Takes the next event if one is already queued.
    pub fn try_get(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when no event is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
