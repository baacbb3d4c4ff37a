//! # Loading the program list from disk.
//!
//! Two JSON shapes are accepted:
//! ```text
//! {"mutex_daemons": [ DaemonConfig, ... ]}   // menu file, other keys ignored
//! [ DaemonConfig, ... ]                       // flat list
//! ```
//! The list is loaded once, before the control loop starts, and is read-only
//! afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::config::DaemonConfig;
use crate::error::ConfigError;

#[derive(Deserialize)]
struct MenuFile {
    mutex_daemons: Vec<DaemonConfig>,
}

/// Decodes whichever shape the top-level value has.
///
/// The shape is chosen from the first token so that a bad entry is reported
/// with serde's own message and position.
fn decode(json: &str) -> serde_json::Result<Vec<DaemonConfig>> {
    match json.trim_start().as_bytes().first() {
        Some(b'[') => serde_json::from_str(json),
        _ => serde_json::from_str::<MenuFile>(json).map(|menu| menu.mutex_daemons),
    }
}

/// Parses a program list from a JSON string.
///
/// `origin` is only used for error messages.
pub fn parse_programs(json: &str, origin: &Path) -> Result<Vec<DaemonConfig>, ConfigError> {
    let programs = decode(json).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    if programs.is_empty() {
        return Err(ConfigError::Empty {
            path: origin.to_path_buf(),
        });
    }
    Ok(programs)
}

/// Reads and parses the program list at `path`.
pub fn load_programs(path: impl AsRef<Path>) -> Result<Vec<DaemonConfig>, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_programs(&json, path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn loads_menu_shape_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "mutex_daemons": [
                    {{"display_name": "Clock", "binary": "/usr/bin/clock", "args": ["--24h"]}},
                    {{"display_name": "Radio", "binary": "radio", "retry_count": 1, "retry_delay": 0}}
                ],
                "tasks": []
            }}"#
        )
        .unwrap();

        let programs = load_programs(file.path()).unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].name(), "Clock");
        assert_eq!(programs[0].program.args, vec!["--24h".to_string()]);
        assert_eq!(programs[1].retry_count, 1);
        assert_eq!(programs[1].retry_delay, Duration::ZERO);
    }

    #[test]
    fn accepts_flat_list() {
        let programs = parse_programs(
            r#"[{"display_name": "A", "binary": "a"}, {"display_name": "B", "binary": "b"}]"#,
            Path::new("inline.json"),
        )
        .unwrap();
        let names: Vec<_> = programs.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn empty_list_is_an_error() {
        let err = parse_programs(r#"{"mutex_daemons": []}"#, Path::new("menu.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_empty");

        let err = parse_programs("[]", Path::new("menu.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_empty");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_programs("{not json", Path::new("menu.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
    }

    #[test]
    fn bad_entry_is_reported_precisely() {
        let json = r#"{"mutex_daemons": [
            {"display_name": "A", "binary": "a"},
            {"display_name": "B", "binary": "b", "retry_count": "many"}
        ]}"#;
        let err = parse_programs(json, Path::new("menu.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
        let msg = err.to_string();
        assert!(msg.contains("invalid type: string \"many\""), "{msg}");
        assert!(msg.contains("line 3"), "{msg}");
        assert!(!msg.contains("untagged"), "{msg}");

        let err = parse_programs(r#"[{"display_name": "A"}]"#, Path::new("menu.json")).unwrap_err();
        assert!(err.to_string().contains("missing field `binary`"), "{err}");
    }

    #[test]
    fn object_without_program_list_is_an_error() {
        let err = parse_programs(r#"{"tasks": []}"#, Path::new("menu.json")).unwrap_err();
        assert!(err.to_string().contains("missing field `mutex_daemons`"), "{err}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_programs(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.as_label(), "config_read");
    }
}
