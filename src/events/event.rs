//! # Events consumed by the control loop.
//!
//! [`Event`] is a closed sum type; every producer emits exactly one family of
//! variants and the control loop dispatches on them with an exhaustive `match`.
//!
//! | Variant          | Producer                 |
//! |------------------|--------------------------|
//! | `Started`        | process supervisor       |
//! | `Exited`         | process supervisor       |
//! | `Failed`         | process supervisor       |
//! | `TaskFinished`   | one-shot task runner     |
//! | `ButtonPressed`  | input adapter            |
//!
//! ## Example
//! ```rust
//! use tasker::{Button, Event};
//!
//! let ev = Event::ButtonPressed(Button::try_from(1).unwrap());
//! assert_eq!(ev, Event::ButtonPressed(Button::Next));
//! assert_eq!(ev.as_label(), "button_pressed");
//! ```

use std::fmt;

/// One of the two physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Button 0: select the row under the cursor.
    Select,
    /// Button 1: move the cursor to the next row.
    Next,
}

impl Button {
    /// Hardware id of the button (0 or 1).
    pub fn id(self) -> u8 {
        match self {
            Button::Select => 0,
            Button::Next => 1,
        }
    }
}

impl TryFrom<u8> for Button {
    type Error = u8;

    /// Maps a hardware id to a button; unknown ids are returned as the error.
    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Button::Select),
            1 => Ok(Button::Next),
            other => Err(other),
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Select => f.write_str("select"),
            Button::Next => f.write_str("next"),
        }
    }
}

/// Message delivered through the [`Mailbox`](crate::Mailbox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The supervised program was spawned.
    Started,
    /// The supervised program exited with code 0.
    Exited(i32),
    /// An attempt failed (nonzero exit, spawn failure, fault) or supervision gave up.
    Failed,
    /// A one-shot task completed.
    TaskFinished {
        /// Exit code; `None` when killed by a signal or never spawned.
        code: Option<i32>,
        /// Captured standard output (lossy UTF-8).
        output: String,
    },
    /// A button was pressed.
    ButtonPressed(Button),
}

impl Event {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Event::Started => "app_started",
            Event::Exited(_) => "app_exited",
            Event::Failed => "app_failed",
            Event::TaskFinished { .. } => "task_finished",
            Event::ButtonPressed(_) => "button_pressed",
        }
    }

    /// True for events emitted by the process supervisor.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Event::Started | Event::Exited(_) | Event::Failed)
    }
}
