//! Runtime core: child process lifecycle.
//!
//! This module owns everything that touches child processes. Failures are
//! contained here and leave only as mailbox events.
//!
//! Internal modules:
//! - [`runner`]: executes one attempt with cancellation, termination and event publishing;
//! - [`supervisor`]: [`ProcessSupervisor`] bounded retry loop for one program;
//! - [`handle`]: [`SupervisorHandle`] spawn / cancel-and-wait for one supervisor;
//! - [`oneshot`]: one-shot task runner with captured stdout;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod handle;
mod oneshot;
mod runner;
mod shutdown;
mod supervisor;

pub use handle::SupervisorHandle;
pub use oneshot::{run_task, spawn_task};
pub use shutdown::{cancel_on_signal, wait_for_shutdown_signal};
pub use supervisor::{ProcessSupervisor, SupervisorExit};
