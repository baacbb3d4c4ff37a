//! # ProcessSupervisor: single-program retry loop.
//!
//! Supervises one [`DaemonConfig`] with:
//! - bounded attempts per [`RetryPolicy`](crate::RetryPolicy),
//! - a constant pause after each failed attempt,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## Architecture
//! ```text
//! SupervisorHandle::spawn ──► ProcessSupervisor::run()
//!
//! loop {
//!   ├─► attempt += 1
//!   ├─► run_once() ─► spawn ─► Started ─► wait
//!   │       ├─ exit 0          ─► Exited      ─► stop (SupervisorExit::Exited)
//!   │       ├─ exit != 0       ─► Failed      ─┐
//!   │       ├─ binary missing  ─► Failed      ─┤
//!   │       ├─ other spawn err ─► Failed      ─► stop (SupervisorExit::Faulted)
//!   │       ├─ wait error      ─► Failed      ─► stop (SupervisorExit::Faulted)
//!   │       └─ cancelled       ─► (nothing)   ─► stop (SupervisorExit::Cancelled)
//!   │                                          ▼
//!   └─► budget left? ── yes ─► sleep(delay) (cancellable) ─► next attempt
//!                     └ no  ─► stop (SupervisorExit::GaveUp)
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; one live child per supervisor at most.
//! - The failure event of the last attempt is the terminal `Failed`; no sleep follows it.
//! - With a zero attempt budget a single `Failed` is published and nothing is spawned.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::core::runner::{AttemptOutcome, run_once};
use crate::events::{Event, MailboxSender};

/// Why a supervisor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The program exited with code 0.
    Exited,
    /// Every attempt failed.
    GaveUp,
    /// Cancelled; the live child (if any) has been terminated and reaped.
    Cancelled,
    /// Unexpected internal fault (reported as `Failed`).
    Faulted,
}

/// Supervises execution of a single program with bounded retries.
pub struct ProcessSupervisor {
    config: Arc<DaemonConfig>,
    mailbox: MailboxSender,
    grace: Option<Duration>,
}

impl ProcessSupervisor {
    /// Creates a new supervisor.
    ///
    /// `grace` bounds the wait after SIGTERM on cancellation (`None` = no bound).
    pub fn new(config: Arc<DaemonConfig>, mailbox: MailboxSender, grace: Option<Duration>) -> Self {
        Self {
            config,
            mailbox,
            grace,
        }
    }

    /// The supervised program.
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Runs attempts until success, retry exhaustion, a fault or cancellation.
    ///
    /// ### Cancellation semantics
    /// `token` is observed at suspension points only:
    /// - while waiting on the child (the child is terminated and reaped),
    /// - during the retry pause (the pause is aborted).
    ///
    /// No lifecycle event is published on the cancellation path.
    pub async fn run(self, token: CancellationToken) -> SupervisorExit {
        let name = self.config.name();
        let policy = self.config.retry_policy();

        if policy.attempts() == 0 {
            info!(program = %name, "no attempts allowed; giving up");
            self.mailbox.put(Event::Failed);
            return SupervisorExit::GaveUp;
        }

        let mut attempt: u32 = 0;
        loop {
            if token.is_cancelled() {
                return SupervisorExit::Cancelled;
            }

            attempt += 1;
            info!(program = %name, attempt, "starting");

            match run_once(&self.config.program, &self.mailbox, &token, self.grace).await {
                Ok(AttemptOutcome::Exited) => {
                    info!(program = %name, code = 0, "exited");
                    return SupervisorExit::Exited;
                }
                Ok(AttemptOutcome::Cancelled) => return SupervisorExit::Cancelled,
                Ok(AttemptOutcome::Failed(code)) => {
                    info!(program = %name, ?code, attempt, "exited with failure");
                }
                Err(e) if e.is_retryable() => {
                    warn!(program = %name, attempt, error = %e, label = e.as_label(), "attempt failed");
                }
                Err(e) => {
                    error!(program = %name, attempt, error = %e, label = e.as_label(), "unexpected failure");
                    return SupervisorExit::Faulted;
                }
            }

            let Some(delay) = policy.delay_after(attempt) else {
                info!(program = %name, attempts = attempt, "gave up");
                return SupervisorExit::GaveUp;
            };

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => return SupervisorExit::Cancelled,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::*;
    use crate::config::ProgramConfig;
    use crate::events::{Mailbox, mailbox};

    fn daemon(script: &str, retry_count: u32) -> Arc<DaemonConfig> {
        Arc::new(
            DaemonConfig::new(ProgramConfig::new("script", "/bin/sh", ["-c", script]))
                .with_retry(retry_count, Duration::ZERO),
        )
    }

    fn drain(rx: &mut Mailbox) -> Vec<Event> {
        std::iter::from_fn(|| rx.try_get()).collect()
    }

    fn count(events: &[Event], wanted: &Event) -> usize {
        events.iter().filter(|e| *e == wanted).count()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[tokio::test]
    async fn always_failing_program_is_bounded(#[case] retry_count: u32) {
        let (tx, mut rx) = mailbox();
        let sup = ProcessSupervisor::new(daemon("exit 1", retry_count), tx, None);

        let exit = sup.run(CancellationToken::new()).await;

        assert_eq!(exit, SupervisorExit::GaveUp);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 2 * retry_count as usize);
        assert_eq!(count(&events, &Event::Started), retry_count as usize);
        assert_eq!(count(&events, &Event::Failed), retry_count as usize);
        for pair in events.chunks(2) {
            assert_eq!(pair, [Event::Started, Event::Failed]);
        }
    }

    #[tokio::test]
    async fn success_stops_retries() {
        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("attempts");
        // fails twice, succeeds on the third launch
        let script = format!(
            "n=$(cat {c} 2>/dev/null || echo 0); n=$((n+1)); echo $n > {c}; [ $n -ge 3 ]",
            c = counter.display()
        );
        let (tx, mut rx) = mailbox();
        let sup = ProcessSupervisor::new(daemon(&script, 5), tx, None);

        let exit = sup.run(CancellationToken::new()).await;

        assert_eq!(exit, SupervisorExit::Exited);
        assert_eq!(
            drain(&mut rx),
            [
                Event::Started,
                Event::Failed,
                Event::Started,
                Event::Failed,
                Event::Started,
                Event::Exited(0),
            ]
        );
        assert_eq!(std::fs::read_to_string(&counter).unwrap().trim(), "3");
    }

    #[tokio::test]
    async fn spawn_failures_consume_the_budget() {
        let (tx, mut rx) = mailbox();
        let config = Arc::new(
            DaemonConfig::new(ProgramConfig::new(
                "ghost",
                Path::new("/nonexistent/tasker-test-binary"),
                Vec::<String>::new(),
            ))
            .with_retry(3, Duration::ZERO),
        );

        let exit = ProcessSupervisor::new(config, tx, None)
            .run(CancellationToken::new())
            .await;

        assert_eq!(exit, SupervisorExit::GaveUp);
        assert_eq!(drain(&mut rx), [Event::Failed, Event::Failed, Event::Failed]);
    }

    #[tokio::test]
    async fn unexpected_spawn_error_faults_after_one_failure() {
        let (tx, mut rx) = mailbox();
        // a NUL byte in an argument is rejected before exec
        let config = Arc::new(
            DaemonConfig::new(ProgramConfig::new("script", "/bin/sh", ["-c", "exit 0\0bad"]))
                .with_retry(3, Duration::from_secs(60)),
        );

        let exit = time::timeout(
            Duration::from_secs(5),
            ProcessSupervisor::new(config, tx, None).run(CancellationToken::new()),
        )
        .await
        .unwrap();

        assert_eq!(exit, SupervisorExit::Faulted);
        assert_eq!(drain(&mut rx), [Event::Failed]);
    }

    #[tokio::test]
    async fn zero_budget_reports_failure_without_spawning() {
        let (tx, mut rx) = mailbox();
        let sup = ProcessSupervisor::new(daemon("exit 0", 0), tx, None);

        assert_eq!(sup.run(CancellationToken::new()).await, SupervisorExit::GaveUp);
        assert_eq!(drain(&mut rx), [Event::Failed]);
    }

    #[tokio::test]
    async fn cancellation_during_pause_stops_quietly() {
        let (tx, mut rx) = mailbox();
        let config = Arc::new(
            DaemonConfig::new(ProgramConfig::new("script", "/bin/sh", ["-c", "exit 1"]))
                .with_retry(3, Duration::from_secs(60)),
        );
        let token = CancellationToken::new();
        let run = tokio::spawn(ProcessSupervisor::new(config, tx, None).run(token.clone()));

        // first attempt fails, supervisor then sleeps for a minute
        let mut seen = Vec::new();
        while seen.len() < 2 {
            seen.push(rx.get().await.unwrap());
        }
        token.cancel();

        assert_eq!(run.await.unwrap(), SupervisorExit::Cancelled);
        assert_eq!(seen, [Event::Started, Event::Failed]);
        assert_eq!(rx.try_get(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_terminates_the_live_child() {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let (tx, mut rx) = mailbox();
        let token = CancellationToken::new();
        let run = tokio::spawn(ProcessSupervisor::new(daemon(&script, 5), tx, None).run(token.clone()));

        assert_eq!(rx.get().await, Some(Event::Started));
        let pid = loop {
            match std::fs::read_to_string(&pid_file) {
                Ok(s) if s.ends_with('\n') => break s.trim().parse::<i32>().unwrap(),
                _ => time::sleep(Duration::from_millis(10)).await,
            }
        };
        assert_eq!(kill(Pid::from_raw(pid), None), Ok(()));

        token.cancel();
        assert_eq!(run.await.unwrap(), SupervisorExit::Cancelled);

        assert_eq!(kill(Pid::from_raw(pid), None), Err(Errno::ESRCH));
        assert_eq!(rx.try_get(), None);
    }
}
