//! # The single daemon slot.
//!
//! Holds at most one [`SupervisorHandle`]. Replacing the occupant is always
//! cancel → await → spawn, so two supervised children never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::DaemonConfig;
use crate::core::{ProcessSupervisor, SupervisorExit, SupervisorHandle};
use crate::events::MailboxSender;

/// Observable state of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SlotStatus {
    /// Nothing was ever started.
    Empty,
    /// The supervisor for `index` is retrying or waiting on its child.
    Running { index: usize },
    /// The supervisor for `index` stopped on its own (exited or gave up).
    Finished { index: usize },
}

#[derive(Debug, Default)]
pub(super) struct DaemonSlot {
    current: Option<SupervisorHandle>,
}

impl DaemonSlot {
    pub(super) fn status(&self) -> SlotStatus {
        match &self.current {
            None => SlotStatus::Empty,
            Some(h) if h.is_finished() => SlotStatus::Finished { index: h.index() },
            Some(h) => SlotStatus::Running { index: h.index() },
        }
    }

    /// Cancels the occupant (if any) and waits until its child is gone.
    pub(super) async fn stop(&mut self) -> Option<SupervisorExit> {
        let handle = self.current.take()?;
        let index = handle.index();
        let exit = handle.cancel_and_wait().await;
        match exit {
            SupervisorExit::Faulted => error!(index, "supervisor faulted"),
            _ => info!(index, ?exit, "supervisor stopped"),
        }
        Some(exit)
    }

    /// Stops the occupant, then starts supervising `config` as row `index`.
    pub(super) async fn replace(
        &mut self,
        index: usize,
        config: &DaemonConfig,
        mailbox: &MailboxSender,
        grace: Option<Duration>,
        parent: &CancellationToken,
    ) {
        self.stop().await;

        let supervisor = ProcessSupervisor::new(Arc::new(config.clone()), mailbox.clone(), grace);
        info!(index, program = %config.name(), "supervising");
        self.current = Some(SupervisorHandle::spawn(index, supervisor, mailbox.clone(), parent));
    }
}
