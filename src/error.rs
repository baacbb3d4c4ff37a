//! Error types used by the tasker runtime, its supervisors and adapters.
//!
//! This module defines four error enums:
//!
//! - [`ConfigError`] problems loading the program list.
//! - [`ProcessError`] failures while spawning, waiting on or terminating a child.
//! - [`AdapterError`] display and input backend failures.
//! - [`RuntimeError`] errors that abort startup of the control loop.
//!
//! Every type provides `as_label` (stable snake_case label for logs) and
//! [`ProcessError::is_retryable`] decides whether a failure counts against the
//! retry budget or ends supervision.

use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced while loading program configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the expected shape.
    #[error("malformed config {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The menu needs at least one program.
    #[error("config {path} declares no programs")]
    Empty {
        /// Path that was parsed.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "config_read",
            ConfigError::Parse { .. } => "config_parse",
            ConfigError::Empty { .. } => "config_empty",
        }
    }
}

/// # Errors produced by supervised and one-shot child processes.
///
/// A binary that is missing or cannot be executed is an expected failure and
/// is retried. Any other spawn error, and anything that goes wrong with an
/// already running child, is an unexpected fault and ends supervision.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The binary could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Display name of the program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a live child failed.
    #[error("failed to wait on {program}: {source}")]
    Wait {
        /// Display name of the program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The child could not be signalled or killed.
    #[error("failed to terminate {program}: {source}")]
    Terminate {
        /// Display name of the program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tasker::ProcessError;
    ///
    /// let err = ProcessError::Spawn {
    ///     program: "clock".into(),
    ///     source: std::io::Error::from(std::io::ErrorKind::NotFound),
    /// };
    /// assert_eq!(err.as_label(), "process_spawn");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessError::Spawn { .. } => "process_spawn",
            ProcessError::Wait { .. } => "process_wait",
            ProcessError::Terminate { .. } => "process_terminate",
        }
    }

    /// Indicates whether the failure consumes one attempt and allows a retry.
    ///
    /// Returns `true` only for a [`ProcessError::Spawn`] caused by a missing
    /// binary, a permission error or an unknown executable format.
    ///
    /// # Example
    /// ```
    /// use tasker::ProcessError;
    ///
    /// let spawn = ProcessError::Spawn {
    ///     program: "clock".into(),
    ///     source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    /// };
    /// assert!(spawn.is_retryable());
    ///
    /// let nul = ProcessError::Spawn {
    ///     program: "clock".into(),
    ///     source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
    /// };
    /// assert!(!nul.is_retryable());
    ///
    /// let wait = ProcessError::Wait {
    ///     program: "clock".into(),
    ///     source: std::io::Error::other("lost child"),
    /// };
    /// assert!(!wait.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            ProcessError::Spawn { source, .. } => is_launch_failure(source),
            ProcessError::Wait { .. } | ProcessError::Terminate { .. } => false,
        }
    }
}

fn is_launch_failure(err: &std::io::Error) -> bool {
    match err.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => true,
        _ => is_exec_format_error(err),
    }
}

#[cfg(unix)]
fn is_exec_format_error(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(nix::errno::Errno::ENOEXEC as i32)
}

#[cfg(not(unix))]
fn is_exec_format_error(_err: &std::io::Error) -> bool {
    false
}

/// # Errors produced by display and input backends.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Powering the display on failed.
    #[error("display power-on failed: {0}")]
    PowerOn(#[source] std::io::Error),

    /// Pushing a frame to the display failed.
    #[error("render failed: {0}")]
    Render(#[source] std::io::Error),

    /// The input backend failed while reading buttons.
    #[error("input backend failed: {0}")]
    Input(#[source] std::io::Error),
}

impl AdapterError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AdapterError::PowerOn(_) => "display_power_on",
            AdapterError::Render(_) => "display_render",
            AdapterError::Input(_) => "input_backend",
        }
    }
}

/// # Errors that abort the control loop.
///
/// Process failures never show up here: they are contained by the supervisor
/// and surface only as mailbox events.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Program configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A display or input backend could not be brought up.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Config(e) => e.as_label(),
            RuntimeError::Adapter(e) => e.as_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_forwards_labels() {
        let err: RuntimeError = ConfigError::Empty {
            path: PathBuf::from("menu.json"),
        }
        .into();
        assert_eq!(err.as_label(), "config_empty");
        assert_eq!(err.to_string(), "config menu.json declares no programs");

        let err: RuntimeError =
            AdapterError::PowerOn(std::io::Error::from(std::io::ErrorKind::NotFound)).into();
        assert_eq!(err.as_label(), "display_power_on");
    }

    fn spawn_error(source: std::io::Error) -> ProcessError {
        ProcessError::Spawn {
            program: "clock".into(),
            source,
        }
    }

    #[test]
    fn only_launch_failures_are_retryable() {
        use std::io::{Error, ErrorKind};

        assert!(spawn_error(Error::from(ErrorKind::NotFound)).is_retryable());
        assert!(spawn_error(Error::from(ErrorKind::PermissionDenied)).is_retryable());
        #[cfg(unix)]
        assert!(spawn_error(Error::from_raw_os_error(nix::errno::Errno::ENOEXEC as i32)).is_retryable());

        assert!(!spawn_error(Error::from(ErrorKind::InvalidInput)).is_retryable());
        #[cfg(unix)]
        assert!(!spawn_error(Error::from_raw_os_error(nix::errno::Errno::EMFILE as i32)).is_retryable());
        assert!(
            !ProcessError::Terminate {
                program: "clock".into(),
                source: Error::other("gone"),
            }
            .is_retryable()
        );
    }
}
