//! # tasker
//!
//! **Tasker** is a single-focus process launcher for small devices with a
//! screen and two buttons.
//!
//! A configured list of programs is shown as a scrollable menu. Exactly one
//! of them runs as a supervised *daemon* (bounded retries with a constant
//! delay); pressing *select* can fire the highlighted program as a one-shot
//! task or make it the new daemon. Everything that happens (process lifecycle,
//! task results, button presses) flows through one ordered mailbox into a
//! single control loop, which updates an immutable menu state and re-renders.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//!  │ ButtonSource │   │ProcessSupervisor │   │ one-shot task│
//!  │ (gpio / tty) │   │  (retry loop)    │   │ (stdout cap.)│
//!  └──────┬───────┘   └────────┬─────────┘   └──────┬───────┘
//!         │ ButtonPressed      │ Started/Exited/    │ TaskFinished
//!         │                    │ Failed             │
//!         ▼                    ▼                    ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                 Mailbox (unbounded FIFO)                  │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               ▼
//!                    ┌──────────────────────┐
//!                    │ Controller (1 reader)│──► DaemonSlot: cancel → await → spawn
//!                    └──────────┬───────────┘
//!                               ▼
//!                  UiState ──► render ──► Frame ──► Display
//! ```
//!
//! ### Lifecycle of one daemon
//! ```text
//! ProcessSupervisor::run()
//!
//! loop {
//!   ├─► attempt += 1
//!   ├─► spawn ──► Started ──► wait (cancellable)
//!   │       ├─ exit 0      ─► Exited ─► stop
//!   │       ├─ exit != 0   ─► Failed ─┐
//!   │       ├─ no binary   ─► Failed ─┤
//!   │       ├─ other fault ─► Failed ─► stop
//!   │       └─ cancelled   ─► SIGTERM, grace, SIGKILL, reap ─► stop (no event)
//!   │                                  ▼
//!   └─► attempts left? ─ yes ─► sleep(retry_delay) (cancellable) ─► continue
//!                      └ no  ─► stop (the last Failed is terminal)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Bounded retry loop with cooperative cancellation.               | [`ProcessSupervisor`], [`SupervisorHandle`] |
//! | **Tasks**         | One-shot runs with captured stdout.                             | [`run_task`]                                |
//! | **Events**        | Closed event enum and the ordered mailbox.                      | [`Event`], [`Mailbox`]                      |
//! | **Menu**          | Immutable state machine and pure draw projection.               | [`UiState`], [`render`], [`Styles`]         |
//! | **Adapters**      | Display / input seams with GPIO and terminal backends.          | [`Display`], [`ButtonSource`], [`Backend`]  |
//! | **Configuration** | Program list loader and runtime knobs.                          | [`load_programs`], [`Config`]               |
//! | **Errors**        | Typed errors with stable log labels.                            | [`ProcessError`], [`RuntimeError`]          |
//!
//! ## Example
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use tasker::{Backend, Config, load_programs};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let programs = load_programs("launcher.json")?;
//!     let cfg = Config::default();
//!     let (mut display, buttons) = Backend::Terminal.build(&cfg);
//!
//!     let token = CancellationToken::new();
//!     tokio::spawn(tasker::cancel_on_signal(token.clone()));
//!
//!     let state = tasker::run(programs, cfg, display.as_mut(), buttons, token).await?;
//!     println!("last selection: {:?}", state.selected_index());
//!     Ok(())
//! }
//! ```
mod adapters;
mod config;
mod controller;
mod core;
mod error;
mod events;
mod policies;
mod ui;

// ---- Public re-exports ----

pub use adapters::{
    Backend, ButtonSource, Display, DisplaySession, GpioButtons, GpioConfig, GpioDisplay, KeyAction, SysfsGpio,
    TerminalButtons, TerminalDisplay, map_key,
};
pub use config::{
    Config, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, DaemonConfig, ProgramConfig, SelectAction, load_programs,
    parse_programs,
};
pub use controller::{Controller, run};
pub use crate::core::{
    ProcessSupervisor, SupervisorExit, SupervisorHandle, cancel_on_signal, run_task, spawn_task,
    wait_for_shutdown_signal,
};
pub use error::{AdapterError, ConfigError, ProcessError, RuntimeError};
pub use events::{Button, Event, Mailbox, MailboxSender, mailbox};
pub use policies::RetryPolicy;
pub use ui::{DrawCommand, Frame, ProcessHealth, Rgb, Styles, UiState, render};
