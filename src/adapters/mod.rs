//! # Display and input backends.
//!
//! The control loop only talks to two seams:
//! - [`Display`]: receives a [`Frame`] after every event and is powered on/off
//!   around the loop through a [`DisplaySession`];
//! - [`ButtonSource`]: a long-running task that turns physical (or virtual)
//!   presses into [`Event::ButtonPressed`](crate::Event::ButtonPressed) mailbox events.
//!
//! ## Backends
//! ```text
//! Backend::Gpio      GpioDisplay (backlight pin)     + GpioButtons (sysfs polling)
//! Backend::Terminal  TerminalDisplay (crossterm)     + TerminalButtons (EventStream)
//! ```
//!
//! ## Rules
//! - A session powers the display off on every exit path, including panics and errors.
//! - A button source stops when its token is cancelled. It may also cancel the
//!   token itself to request process shutdown (terminal `q`).

mod gpio;
mod terminal;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::AdapterError;
use crate::events::MailboxSender;
use crate::ui::Frame;

pub use gpio::{GpioButtons, GpioConfig, GpioDisplay, SysfsGpio};
pub use terminal::{KeyAction, TerminalButtons, TerminalDisplay, map_key};

/// Screen the menu is drawn on.
pub trait Display: Send {
    /// Powers the screen on. Called once when a [`DisplaySession`] is acquired.
    fn power_on(&mut self) -> Result<(), AdapterError>;

    /// Shows a frame.
    fn render(&mut self, frame: &Frame) -> Result<(), AdapterError>;

    /// Powers the screen off. Must not fail; errors are logged by the implementation.
    fn power_off(&mut self);
}

/// Powered-on display, released on drop.
///
/// ```text
/// acquire() ─► power_on ─► render()* ─► drop ─► power_off
/// ```
pub struct DisplaySession<'a> {
    display: &'a mut dyn Display,
}

impl<'a> DisplaySession<'a> {
    /// Powers `display` on for the lifetime of the session.
    pub fn acquire(display: &'a mut dyn Display) -> Result<Self, AdapterError> {
        display.power_on()?;
        debug!("display acquired");
        Ok(Self { display })
    }

    pub fn render(&mut self, frame: &Frame) -> Result<(), AdapterError> {
        self.display.render(frame)
    }
}

impl Drop for DisplaySession<'_> {
    fn drop(&mut self) {
        self.display.power_off();
        debug!("display released");
    }
}

/// Producer of button presses.
#[async_trait]
pub trait ButtonSource: Send {
    /// Publishes presses into `mailbox` until `token` is cancelled.
    async fn run(self: Box<Self>, mailbox: MailboxSender, token: CancellationToken) -> Result<(), AdapterError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Selects the adapter pair used by the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Linux sysfs GPIO buttons and backlight.
    Gpio,
    /// Terminal emulation with keyboard input.
    Terminal,
}

impl Backend {
    pub fn from_virtual_flag(virtual_mode: bool) -> Self {
        if virtual_mode {
            Backend::Terminal
        } else {
            Backend::Gpio
        }
    }

    /// Builds the display and the button source for this backend.
    pub fn build(self, cfg: &Config) -> (Box<dyn Display>, Box<dyn ButtonSource>) {
        match self {
            Backend::Gpio => (
                Box::new(GpioDisplay::new(&cfg.gpio)),
                Box::new(GpioButtons::new(&cfg.gpio)),
            ),
            Backend::Terminal => (
                Box::new(TerminalDisplay::new(cfg.styles.clone())),
                Box::new(TerminalButtons::new()),
            ),
        }
    }
}
