//! Configuration: launchable programs and runtime settings.
//!
//! ## Contents
//! - [`ProgramConfig`] / [`DaemonConfig`] program descriptions (one menu row per daemon)
//! - [`load_programs`] / [`parse_programs`] JSON loading
//! - [`Config`] runtime knobs (termination grace, select action, styles, GPIO)

mod file;
mod program;
mod runtime;

pub use file::{load_programs, parse_programs};
pub use program::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, DaemonConfig, ProgramConfig};
pub use runtime::{Config, SelectAction};
