//! Runtime events: types and the ordered mailbox.
//!
//! This module groups the event **data model** and the **mailbox** that
//! serializes events from all producers for the control loop.
//!
//! ## Contents
//! - [`Event`], [`Button`] event classification and payloads
//! - [`Mailbox`], [`MailboxSender`] thin wrapper over `tokio::sync::mpsc` (unbounded)
//!
//! ## Quick reference
//! - **Producers**: `ProcessSupervisor`, `core::oneshot`, `ButtonSource` implementations.
//! - **Consumer**: `Controller::run` (the only reader).

mod event;
mod mailbox;

pub use event::{Button, Event};
pub use mailbox::{Mailbox, MailboxSender, mailbox};
