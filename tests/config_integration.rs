use daily_diet_api::config::{AppConfig, LogFormat};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const ARGS: [&str; 1] = ["daily-diet-api"];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    // SAFETY: every test touching the environment is #[serial].
    unsafe {
        env::remove_var("DIET_SERVER__PORT");
        env::remove_var("DIET_PERSISTENCE__PROVIDER");
        env::remove_var("DIET_LOGGING__FORMAT");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("DATABASE_PROVIDER");
        env::remove_var("RATE_LIMIT_ENABLED");
        env::remove_var("TIMEOUT_DISABLED");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(ARGS).expect("defaults should load");
    assert_eq!(config.server.port, 3333);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.persistence.provider, "sqlite");
    assert_eq!(config.session.cookie_name, "sessionId");
    assert_eq!(config.session.max_age_days, 7);
    assert!(config.resilience.rate_limit_enabled);
    assert!(!config.resilience.timeout_disabled);
    assert_eq!(config.logging.format, LogFormat::Compact);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    // SAFETY: serial test.
    unsafe {
        env::set_var("DIET_SERVER__PORT", "9090");
        env::set_var("DIET_LOGGING__FORMAT", "json");
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.logging.format, LogFormat::Json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    // SAFETY: serial test.
    unsafe {
        env::set_var("DIET_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        "daily-diet-api",
        "--port",
        "4444",
        "--database-provider",
        "postgres",
        "--rate-limit-enabled",
        "false",
    ])
    .expect("Failed to load config");
    assert_eq!(config.server.port, 4444);
    assert_eq!(config.persistence.provider, "postgres");
    assert!(!config.resilience.rate_limit_enabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(
        file,
        r#"
server:
  port: 7070
persistence:
  database_url: "sqlite::memory:"
session:
  cookie_name: diet_session
"#
    )
    .expect("Failed to write temp config");

    // SAFETY: serial test.
    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.persistence.database_url, "sqlite::memory:");
    assert_eq!(config.session.cookie_name, "diet_session");
    // Untouched keys keep their defaults.
    assert_eq!(config.persistence.provider, "sqlite");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args(ARGS);

    fs::remove_file(cwd_path).unwrap();

    assert_eq!(config.expect("Failed to load config").server.port, 6060);
}

#[test]
#[serial]
fn test_invalid_value_is_an_error() {
    clear_env_vars();
    // SAFETY: serial test.
    unsafe {
        env::set_var("DIET_LOGGING__FORMAT", "xml");
    }

    assert!(AppConfig::load_from_args(ARGS).is_err());

    clear_env_vars();
}
