//! # SupervisorHandle: owned, cancellable supervisor task.
//!
//! The handle owns the [`JoinHandle`] and the [`CancellationToken`] of one
//! spawned [`ProcessSupervisor`]. The control loop keeps at most one handle
//! alive and replaces it with cancel → join → spawn, which is what keeps a
//! single supervised child running at any time.
//!
//! ## Rules
//! - Cancellation is never fire-and-forget: [`SupervisorHandle::cancel_and_wait`]
//!   returns only after the supervisor (and therefore its child) has finished.
//! - A panic inside the supervisor is caught at the task boundary, logged and
//!   reported as `Failed`.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::core::supervisor::{ProcessSupervisor, SupervisorExit};
use crate::events::{Event, MailboxSender};

/// Handle to the running supervisor of one menu row.
#[derive(Debug)]
pub struct SupervisorHandle {
    index: usize,
    cancel: CancellationToken,
    join: JoinHandle<SupervisorExit>,
}

impl SupervisorHandle {
    /// Spawns `supervisor` for menu row `index`.
    ///
    /// The supervisor receives a child of `parent`, so cancelling the parent
    /// (process shutdown) reaches it as well.
    pub fn spawn(
        index: usize,
        supervisor: ProcessSupervisor,
        mailbox: MailboxSender,
        parent: &CancellationToken,
    ) -> Self {
        let cancel = parent.child_token();
        let token = cancel.clone();
        let name = supervisor.config().name().to_string();

        let join = tokio::spawn(contain_panic(name, supervisor.run(token), mailbox));

        Self {
            index,
            cancel,
            join,
        }
    }

    /// Menu row this supervisor belongs to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True once the supervisor has stopped on its own (exited, gave up or faulted).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancels the supervisor and waits for it to stop.
    ///
    /// When this returns, the supervised child has exited and been reaped.
    pub async fn cancel_and_wait(self) -> SupervisorExit {
        self.cancel.cancel();
        match self.join.await {
            Ok(exit) => exit,
            Err(join_err) => {
                error!(index = self.index, error = %join_err, "supervisor task aborted");
                SupervisorExit::Faulted
            }
        }
    }
}

/// Awaits `run`, turning a panic into one `Failed` and [`SupervisorExit::Faulted`].
async fn contain_panic<F>(name: String, run: F, mailbox: MailboxSender) -> SupervisorExit
where
    F: Future<Output = SupervisorExit>,
{
    match AssertUnwindSafe(run).catch_unwind().await {
        Ok(exit) => exit,
        Err(payload) => {
            let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            error!(program = %name, panic = %info, "unexpected failure");
            mailbox.put(Event::Failed);
            SupervisorExit::Faulted
        }
    }
}
