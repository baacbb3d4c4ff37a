//! # Run a single attempt of a supervised program.
//!
//! Spawns the program once, waits for it (or for cancellation) and publishes
//! lifecycle events to the [`MailboxSender`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   spawn ─► Started ─► wait ─► exit 0       ─► Exited(0)   ─► Ok(Exited)
//!
//! Failure:
//!   spawn ─► Started ─► wait ─► exit != 0    ─► Failed      ─► Ok(Failed)
//!   spawn error                              ─► Failed      ─► Err(Spawn)
//!   spawn ─► Started ─► wait error           ─► Failed      ─► Err(Wait)
//!
//! Cancellation:
//!   spawn ─► Started ─► token cancelled ─► SIGTERM ─► (grace) ─► SIGKILL ─► reap ─► Ok(Cancelled)
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal event per attempt, except on cancellation (none).
//! - On cancellation the child is **reaped** before this function returns.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::config::ProgramConfig;
use crate::error::ProcessError;
use crate::events::{Event, MailboxSender};

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptOutcome {
    /// Exit code 0.
    Exited,
    /// Nonzero exit code, or killed by a signal (`None`).
    Failed(Option<i32>),
    /// Cancelled while the child was running; the child has been reaped.
    Cancelled,
}

/// Executes a single attempt of `program`, publishing lifecycle events to `mailbox`.
///
/// ### Cancellation semantics
/// - `token` is observed only while waiting on the child.
/// - A cancelled attempt terminates the child via [`terminate`] and publishes nothing.
///
/// ### Errors
/// - [`ProcessError::Spawn`] if the binary cannot be started (a `Failed` event is published).
/// - [`ProcessError::Wait`] / [`ProcessError::Terminate`] for unexpected faults on a live child.
pub(crate) async fn run_once(
    program: &ProgramConfig,
    mailbox: &MailboxSender,
    token: &CancellationToken,
    grace: Option<Duration>,
) -> Result<AttemptOutcome, ProcessError> {
    let mut child = match program.command().spawn() {
        Ok(child) => child,
        Err(source) => {
            mailbox.put(Event::Failed);
            return Err(ProcessError::Spawn {
                program: program.name().to_string(),
                source,
            });
        }
    };
    mailbox.put(Event::Started);

    let status = tokio::select! {
        biased;
        _ = token.cancelled() => {
            terminate(program.name(), &mut child, grace).await?;
            return Ok(AttemptOutcome::Cancelled);
        }
        status = child.wait() => status,
    };

    match status {
        Ok(status) if status.success() => {
            mailbox.put(Event::Exited(status.code().unwrap_or(0)));
            Ok(AttemptOutcome::Exited)
        }
        Ok(status) => {
            mailbox.put(Event::Failed);
            Ok(AttemptOutcome::Failed(status.code()))
        }
        Err(source) => {
            mailbox.put(Event::Failed);
            Err(ProcessError::Wait {
                program: program.name().to_string(),
                source,
            })
        }
    }
}

/// Terminates a live child and waits until it has actually exited.
///
/// ### Flow
/// 1. Send SIGTERM (unix) or kill (elsewhere)
/// 2. Wait up to `grace` for the child to exit (`None` = wait forever)
/// 3. On timeout, escalate to SIGKILL and wait again
pub(crate) async fn terminate(
    name: &str,
    child: &mut Child,
    grace: Option<Duration>,
) -> Result<ExitStatus, ProcessError> {
    let fault = |source| ProcessError::Terminate {
        program: name.to_string(),
        source,
    };

    error!(program = %name, "terminating");
    request_stop(child).map_err(fault)?;

    let status = match grace {
        Some(grace) => match time::timeout(grace, child.wait()).await {
            Ok(status) => status,
            Err(_elapsed) => {
                warn!(program = %name, ?grace, "did not stop after SIGTERM; killing");
                child.start_kill().map_err(fault)?;
                child.wait().await
            }
        },
        None => child.wait().await,
    }
    .map_err(fault)?;

    error!(program = %name, code = ?status.code(), "terminated");
    Ok(status)
}

#[cfg(unix)]
fn request_stop(child: &mut Child) -> std::io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        // already reaped
        return Ok(());
    };
    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(std::io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
fn request_stop(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::mailbox;

    fn sh(script: &str) -> ProgramConfig {
        ProgramConfig::new("script", "/bin/sh", ["-c", script])
    }

    #[tokio::test]
    async fn zero_exit_publishes_started_then_exited() {
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();

        let outcome = run_once(&sh("exit 0"), &tx, &token, None).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::Exited);
        assert_eq!(rx.try_get(), Some(Event::Started));
        assert_eq!(rx.try_get(), Some(Event::Exited(0)));
        assert_eq!(rx.try_get(), None);
    }

    #[tokio::test]
    async fn nonzero_exit_publishes_failed() {
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();

        let outcome = run_once(&sh("exit 3"), &tx, &token, None).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::Failed(Some(3)));
        assert_eq!(rx.try_get(), Some(Event::Started));
        assert_eq!(rx.try_get(), Some(Event::Failed));
        assert_eq!(rx.try_get(), None);
    }

    #[tokio::test]
    async fn spawn_error_publishes_failed_without_started() {
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();
        let missing = ProgramConfig::new("ghost", "/nonexistent/tasker-test-binary", Vec::<String>::new());

        let err = run_once(&missing, &tx, &token, None).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(rx.try_get(), Some(Event::Failed));
        assert_eq!(rx.try_get(), None);
    }

    #[tokio::test]
    async fn sigkill_after_grace_when_sigterm_is_ignored() {
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();

        let program = sh("trap '' TERM; while :; do sleep 1; done");
        let attempt = run_once(&program, &tx, &token, Some(Duration::from_millis(200)));
        let cancel = async {
            time::sleep(Duration::from_millis(200)).await;
            token.cancel();
        };
        let (outcome, ()) = tokio::join!(attempt, cancel);

        assert_eq!(outcome.unwrap(), AttemptOutcome::Cancelled);
        assert_eq!(rx.try_get(), Some(Event::Started));
        assert_eq!(rx.try_get(), None);
    }
}
