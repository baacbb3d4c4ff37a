//! # Runtime settings.
//!
//! Provides [`Config`] centralized knobs for the control loop, the supervisors
//! and the adapter backends. Program definitions live in
//! [`DaemonConfig`](crate::config::DaemonConfig); this type only covers how the
//! launcher behaves.
//!
//! ## Sentinel values
//! - `terminate_grace = 0s` → wait for a terminated child without escalating to SIGKILL

use std::time::Duration;

use clap::ValueEnum;

use crate::adapters::GpioConfig;
use crate::ui::Styles;

/// What the select button does besides marking the row as selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SelectAction {
    /// Launch a one-shot run of the selected program next to the supervised one.
    ///
    /// If the current supervisor has already ended (exited or gave up), the
    /// selected row is supervised again.
    #[default]
    Task,
    /// Cancel the supervised program and supervise the selected row instead.
    Switch,
}

/// Global configuration for the launcher runtime.
///
/// ## Field semantics
/// - `terminate_grace`: how long a cancelled child gets after SIGTERM before SIGKILL (`0s` = forever)
/// - `select_action`: behaviour of the select button
/// - `styles`: screen geometry and colors used for the menu projection
/// - `gpio`: pins and sysfs root for the hardware backend
#[derive(Clone, Debug)]
pub struct Config {
    /// Bounded wait after SIGTERM before the child is killed.
    pub terminate_grace: Duration,
    /// Behaviour of the select button.
    pub select_action: SelectAction,
    /// Menu geometry and colors.
    pub styles: Styles,
    /// Hardware backend settings.
    pub gpio: GpioConfig,
}

impl Config {
    /// Returns the terminate grace as an `Option`.
    ///
    /// - `None` → wait for the child indefinitely
    /// - `Some(d)` → escalate to SIGKILL after `d`
    #[inline]
    pub fn terminate_grace(&self) -> Option<Duration> {
        if self.terminate_grace == Duration::ZERO {
            None
        } else {
            Some(self.terminate_grace)
        }
    }

    /// Number of menu rows that fit on the screen.
    #[inline]
    pub fn num_visible_lines(&self) -> usize {
        self.styles.num_lines()
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `terminate_grace = 5s`
    /// - `select_action = SelectAction::Task`
    /// - `styles = Styles::default()` (240x240, 24px font)
    /// - `gpio = GpioConfig::default()` (buttons on 23/24, backlight on 22)
    fn default() -> Self {
        Self {
            terminate_grace: Duration::from_secs(5),
            select_action: SelectAction::default(),
            styles: Styles::default(),
            gpio: GpioConfig::default(),
        }
    }
}
