//! # Launchable program descriptions.
//!
//! [`ProgramConfig`] names a binary and its arguments. [`DaemonConfig`] wraps a
//! `ProgramConfig` (composition, the JSON keys are flattened) and adds the retry
//! knobs used by the supervisor. One `DaemonConfig` is one menu row.
//!
//! ## JSON shape
//! ```text
//! {
//!   "display_name": "Clock",
//!   "binary": "/usr/bin/clock",
//!   "args": ["--24h"],          // optional, default []
//!   "retry_count": 5,           // optional, default 5
//!   "retry_delay": 2            // optional, seconds (float), default 2
//! }
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Deserializer, de};
use tokio::process::Command;

use crate::policies::RetryPolicy;

/// Default number of attempts per selection.
pub const DEFAULT_RETRY_COUNT: u32 = 5;
/// Default pause between a failed attempt and the next one.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// A program that can be launched: display name, binary and ordered arguments.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProgramConfig {
    /// Text shown in the menu row.
    pub display_name: String,
    /// Binary to execute (resolved through `PATH` when not absolute).
    pub binary: PathBuf,
    /// Arguments passed to the binary, in order.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProgramConfig {
    /// Creates a program description.
    pub fn new(
        display_name: impl Into<String>,
        binary: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            binary: binary.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.display_name
    }

    /// Returns the binary path.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Builds a command for one launch of this program.
    ///
    /// stdin is detached and the child is killed if its handle is dropped,
    /// so an abandoned attempt never leaves an orphan behind.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// A supervised menu entry: a [`ProgramConfig`] plus its retry policy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DaemonConfig {
    /// What to launch.
    #[serde(flatten)]
    pub program: ProgramConfig,
    /// Maximum number of attempts per selection.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Pause after a failed attempt.
    #[serde(
        default = "default_retry_delay",
        deserialize_with = "deserialize_seconds"
    )]
    pub retry_delay: Duration,
}

impl DaemonConfig {
    /// Creates a daemon entry with the default retry policy.
    pub fn new(program: ProgramConfig) -> Self {
        Self {
            program,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        self.program.name()
    }

    /// Returns the retry policy derived from `retry_count` / `retry_delay`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, self.retry_delay)
    }
}

fn default_retry_count() -> u32 {
    DEFAULT_RETRY_COUNT
}

fn default_retry_delay() -> Duration {
    DEFAULT_RETRY_DELAY
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Float(secs),
            &"a finite, non-negative number of seconds",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daemon_defaults_apply() {
        let cfg: DaemonConfig =
            serde_json::from_str(r#"{"display_name": "Clock", "binary": "clock"}"#).unwrap();

        assert_eq!(cfg.name(), "Clock");
        assert_eq!(cfg.program.binary(), Path::new("clock"));
        assert!(cfg.program.args.is_empty());
        assert_eq!(cfg.retry_count, 5);
        assert_eq!(cfg.retry_delay, Duration::from_secs(2));
    }

    #[test]
    fn fractional_retry_delay() {
        let cfg: DaemonConfig = serde_json::from_str(
            r#"{"display_name": "Radio", "binary": "radio", "args": ["-q"], "retry_count": 0, "retry_delay": 0.25}"#,
        )
        .unwrap();

        assert_eq!(cfg.program.args, vec!["-q".to_string()]);
        assert_eq!(cfg.retry_policy().attempts(), 0);
        assert_eq!(cfg.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn negative_retry_delay_is_rejected() {
        let res: Result<DaemonConfig, _> = serde_json::from_str(
            r#"{"display_name": "Radio", "binary": "radio", "retry_delay": -1}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn missing_binary_is_rejected() {
        let res: Result<DaemonConfig, _> = serde_json::from_str(r#"{"display_name": "Radio"}"#);
        assert!(res.is_err());
    }
}
