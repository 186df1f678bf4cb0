// Config loading tests - AppConfig::load against real files and the process
// environment.

use deskmd_core::config::{AppConfig, ConfigError};
use deskmd_core::constants::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_MAX_STEPS, MODEL_ENV};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("client.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

/// Run `test` with the oracle variables set to `values` and restore them after.
fn with_oracle_env(values: &[(&str, Option<&str>)], test: impl FnOnce()) {
    let keys = [API_KEY_ENV, MODEL_ENV, BASE_URL_ENV];
    let saved: Vec<(&str, Option<String>)> = keys
        .iter()
        .map(|key| (*key, std::env::var(key).ok()))
        .collect();
    for key in keys {
        let value = values
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| *value);
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    test();

    for (key, value) in saved {
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/client.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn returns_parse_error_for_unknown_keys() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[oracle]
modle = "typo"
"#,
    );

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn rejects_zero_max_steps() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[agent]
max_steps = 0
"#,
    );

    let result = AppConfig::load(Some(&path));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidMaxSteps { value: 0 })
    ));
}

#[test]
#[serial]
fn loads_every_section() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[oracle]
api_key = "sk-file"
model = "qwen-turbo"
base_url = "http://127.0.0.1:8080/v1/"
timeout_secs = 5

[server]
command = "/usr/local/bin/deskmd-server"
args = ["--dir", "/srv/notes"]

[server.env]
RUST_LOG = "debug"

[agent]
max_steps = 4
tool_timeout_secs = 30
"#,
    );

    with_oracle_env(&[], || {
        let config = AppConfig::load(Some(&path)).expect("config loads");

        assert_eq!(config.oracle.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.oracle.model, "qwen-turbo");
        assert_eq!(config.oracle.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.oracle.timeout, Duration::from_secs(5));
        assert_eq!(
            config.server.command,
            PathBuf::from("/usr/local/bin/deskmd-server")
        );
        assert_eq!(config.server.args, vec!["--dir", "/srv/notes"]);
        assert_eq!(
            config.server.env.get("RUST_LOG").map(String::as_str),
            Some("debug")
        );
        assert_eq!(config.agent.max_steps, 4);
        assert_eq!(config.agent.tool_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.require_credential().expect("credential"), "sk-file");
    });
}

#[test]
#[serial]
fn environment_overrides_the_file() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[oracle]
api_key = "sk-file"
model = "qwen-turbo"
"#,
    );

    with_oracle_env(
        &[
            (API_KEY_ENV, Some("sk-env")),
            (MODEL_ENV, Some("qwen-max")),
            (BASE_URL_ENV, Some("http://localhost:1234/v1")),
        ],
        || {
            let config = AppConfig::load(Some(&path)).expect("config loads");
            assert_eq!(config.oracle.api_key.as_deref(), Some("sk-env"));
            assert_eq!(config.oracle.model, "qwen-max");
            assert_eq!(config.oracle.base_url, "http://localhost:1234/v1");
        },
    );
}

#[test]
#[serial]
fn missing_credential_is_reported_by_variable_name() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[agent]\nmax_steps = 2\n");

    with_oracle_env(&[], || {
        let config = AppConfig::load(Some(&path)).expect("config loads");
        assert_eq!(config.agent.max_steps, 2);

        let err = config.require_credential().expect_err("no key");
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
        assert!(err.user_message().contains(API_KEY_ENV));
    });
}

#[test]
#[serial]
fn empty_file_uses_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    with_oracle_env(&[], || {
        let config = AppConfig::load(Some(&path)).expect("config loads");
        assert_eq!(config.agent.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.agent.tool_timeout, None);
        assert!(config.oracle.api_key.is_none());
    });
}
