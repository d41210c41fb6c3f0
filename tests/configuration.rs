//! Tests for configuration loading

use nutriplan::Config;
use temp_dir::TempDir;

#[test]
fn test_config_loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("nutriplan.toml");
    std::fs::write(
        &path,
        r#"
[database]
url = "sqlite:from-file.db"
max_connections = 3

[observability]
log_level = "debug"
json = true

[tracking]
timezone = "Europe/Paris"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_str().unwrap().to_string())).unwrap();

    assert_eq!(config.database.max_connections, 3);
    assert!(config.observability.json);
    assert_eq!(config.tracking.timezone, "Europe/Paris");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.child("missing.toml");

    let config = Config::load(Some(missing.to_str().unwrap().to_string())).unwrap();

    assert!(!config.database.url.is_empty());
    assert_eq!(config.tracking.timezone, "UTC");
    assert!(!config.observability.json);
}
