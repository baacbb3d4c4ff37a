//! # One-shot task runner.
//!
//! Runs a program once to completion, captures its standard output and reports
//! a single [`Event::TaskFinished`]. No retries and no cancellation handling:
//! one-shots are short auxiliary actions that run next to the supervised daemon.
//!
//! ```text
//! spawn (stdout piped) ─► wait_with_output ─► TaskFinished { code, output }
//! spawn error          ─────────────────────► TaskFinished { code: None, output: "" }
//! ```

use std::process::Stdio;

use tokio::task::{AbortHandle, JoinSet};
use tracing::{info, warn};

use crate::config::ProgramConfig;
use crate::error::ProcessError;
use crate::events::{Event, MailboxSender};

/// Runs `program` once and publishes its result.
///
/// Failures never escape: they are reported as a `TaskFinished` without a code
/// and the error is returned only for the caller's logging.
pub async fn run_task(program: &ProgramConfig, mailbox: &MailboxSender) -> Result<(), ProcessError> {
    let name = program.name();
    info!(program = %name, "starting task");

    let result = async {
        let child = program
            .command()
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: name.to_string(),
                source,
            })?;
        child
            .wait_with_output()
            .await
            .map_err(|source| ProcessError::Wait {
                program: name.to_string(),
                source,
            })
    }
    .await;

    match result {
        Ok(output) => {
            let code = output.status.code();
            info!(program = %name, ?code, bytes = output.stdout.len(), "task exited");
            mailbox.put(Event::TaskFinished {
                code,
                output: String::from_utf8_lossy(&output.stdout).into_owned(),
            });
            Ok(())
        }
        Err(e) => {
            warn!(program = %name, error = %e, label = e.as_label(), "task failed");
            mailbox.put(Event::TaskFinished {
                code: None,
                output: String::new(),
            });
            Err(e)
        }
    }
}

/// Spawns [`run_task`] into `tasks` (fire-and-forget).
///
/// Aborting the set drops the running future, and with it the child (`kill_on_drop`).
pub fn spawn_task(tasks: &mut JoinSet<()>, program: ProgramConfig, mailbox: MailboxSender) -> AbortHandle {
    tasks.spawn(async move {
        let _ = run_task(&program, &mailbox).await;
    })
}
