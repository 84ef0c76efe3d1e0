use litecode::config::{Config, ConfigError, LineSource, MAX_READ_CHUNK_SIZE};
use std::fs;
use tempfile::TempDir;

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.session.interpreter, "/bin/sh");
    assert_eq!(config.session.read_chunk_size, 256);
    assert_eq!(config.session.line_source, LineSource::InputLine);
    assert_eq!(config.session.teardown_grace_ms, 500);
    assert_eq!(config.run.interpreter, "python3");
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
    assert_eq!(config.frontend.poll_interval_ms, 50);
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("litecode/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validation_rejects_chunk_size_bounds() {
    let mut config = Config::default();
    config.session.read_chunk_size = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    config.session.read_chunk_size = MAX_READ_CHUNK_SIZE;
    assert!(config.validate().is_ok());

    config.session.read_chunk_size = MAX_READ_CHUNK_SIZE + 1;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_blank_interpreters() {
    let mut config = Config::default();
    config.session.interpreter = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.run.interpreter = String::new();
    assert!(config.validate().is_err());
}

/// Partial files keep defaults for everything they leave out.
#[test]
fn test_load_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[session]
interpreter = "/bin/bash"
line_source = "last_line"

[run]
interpreter = "python3.12"

[logging]
file = "/tmp/litecode.log"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.session.interpreter, "/bin/bash");
    assert_eq!(config.session.line_source, LineSource::LastLine);
    assert_eq!(config.session.read_chunk_size, 256);
    assert_eq!(config.run.interpreter, "python3.12");
    assert_eq!(config.logging.level, "info");
    assert_eq!(
        config.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/litecode.log"))
    );
}

#[test]
fn test_load_reports_parse_and_validation_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    fs::write(&path, "[session\n").unwrap();
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::write(&path, "[session]\nline_source = \"sideways\"\n").unwrap();
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::write(&path, "[session]\nread_chunk_size = 0\n").unwrap();
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}
