//! # Control loop.
//!
//! The [`Controller`] is the only consumer of the mailbox. It owns the menu
//! state and the daemon slot, and turns every event into a state transition
//! followed by a re-render.
//!
//! ## Architecture
//! ```text
//! ButtonSource ───────┐
//! ProcessSupervisor ──┼──► Mailbox ──► Controller::dispatch ──► UiState ──► render ──► Display
//! one-shot tasks ─────┘                     │
//!                                           └─► DaemonSlot (cancel → await → spawn)
//! ```
//!
//! ## Dispatch
//! ```text
//! ButtonPressed(Select)  on_press_select, then per SelectAction:
//!                          Task   → one-shot run, or restart the daemon slot if it has ended
//!                          Switch → replace the daemon with the selected row
//! ButtonPressed(Next)    on_press_next (the daemon keeps running)
//! Started / Exited / Failed / TaskFinished → matching UiState transition
//! ```
//!
//! ## Rules
//! - Event N+1 is not taken before event N is fully handled, including an awaited cancellation.
//! - At most one supervised child is alive at a time.
//! - Shutdown stops the daemon, aborts one-shots, then powers the display off.

mod core;
mod slot;

pub use self::core::{Controller, run};
