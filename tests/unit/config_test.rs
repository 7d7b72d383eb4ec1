//! Unit tests for config module

use tempfile::TempDir;
use turtle::config::ConnectionConfig;
use turtle::Config;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert_eq!(config.connection.connect_timeout_ms, 20_000);
    assert_eq!(config.connection.read_timeout_ms, 250);
    assert_eq!(config.connection.write_timeout_ms, 10_000);
    assert_eq!(config.codec.read_buffer_size, 1000);
    assert_eq!(config.codec.text_buffer_size, 1000);
    assert_eq!(config.codec.max_subnegotiation, 8192);
    assert_eq!(config.log.level, "warn");
}

#[test]
fn config_serialization_roundtrip() {
    let mut config = Config::default();
    config.codec.text_buffer_size = 64;
    config.log.level = "turtle=debug".to_string();
    let toml_str = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn missing_sections_use_defaults() {
    let toml_str = r#"
[codec]
read_buffer_size = 16
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.codec.read_buffer_size, 16);
    assert_eq!(config.codec.text_buffer_size, 1000);
    assert_eq!(config.connection, ConnectionConfig::default());
    assert_eq!(config.log.level, "warn");
}

#[test]
fn empty_file_is_default() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn validate_rejects_bad_values() {
    let mut config = Config::default();
    config.codec.max_subnegotiation = 3;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.codec.read_buffer_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.connection.connect_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.connection.write_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.log.level = " ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn save_and_load_roundtrip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.connection.read_timeout_ms = 100;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn load_missing_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let loaded = Config::load_from(&temp.path().join("absent.toml")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn load_rejects_invalid_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[codec]\ntext_buffer_size = 2\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}

#[test]
fn load_rejects_malformed_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[codec\n").unwrap();

    assert!(Config::load_from(&path).is_err());
}

#[test]
fn config_path_ends_with_turtle_dir() {
    let path = Config::config_path().unwrap();
    assert!(path.ends_with(".config/turtle/config.toml"));
}
