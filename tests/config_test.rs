//! Loading, overlaying and installing the configuration.

use std::io::Write;
use std::sync::Arc;

use cloudinv::config::{configure, configured, AppConfiguration, DEFAULT_API_NAME};
use cloudinv::error::ConfigError;
use serial_test::serial;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
    "CLOUDINV_REGION",
    "CLOUDINV_USER_POOL_ID",
    "CLOUDINV_CLIENT_ID",
    "CLOUDINV_API_NAME",
    "CLOUDINV_API_URL",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_file_then_env_overlay() {
    clear_env();
    let file = config_file(
        r#"{
            "auth": { "region": "us-east-1", "userPoolId": "us-east-1_Pool" },
            "api": { "endpoints": [
                { "name": "inventory", "endpoint": "https://file.example.com/prod" },
                { "name": "reports", "endpoint": "https://reports.example.com" }
            ] }
        }"#,
    );
    std::env::set_var("CLOUDINV_API_URL", "https://env.example.com/stage");
    std::env::set_var("CLOUDINV_CLIENT_ID", "env-client");

    let config = AppConfiguration::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.auth.region, "us-east-1");
    assert_eq!(config.auth.user_pool_id, "us-east-1_Pool");
    assert_eq!(config.auth.user_pool_web_client_id, "env-client");
    assert_eq!(config.api.endpoints[0].name, "inventory");
    assert_eq!(config.api.endpoints[0].endpoint, "https://env.example.com/stage");
    assert_eq!(config.api.endpoints[1].endpoint, "https://reports.example.com");
    assert_eq!(config.primary_endpoint().map(|e| e.name.as_str()), Some("inventory"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let err = AppConfiguration::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::Unreadable { .. }));
}

#[test]
#[serial]
fn test_invalid_file_is_an_error() {
    clear_env();
    let file = config_file("{ not json");
    assert!(matches!(
        AppConfiguration::load(Some(file.path())),
        Err(ConfigError::Unreadable { .. })
    ));
}

#[test]
#[serial]
fn test_env_can_break_validation() {
    clear_env();
    let file = config_file("{}");
    std::env::set_var("CLOUDINV_API_URL", "not-a-url");

    let config = AppConfiguration::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.api.endpoints[0].name, DEFAULT_API_NAME);
    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidUrl {
            name: DEFAULT_API_NAME.to_string(),
            url: "not-a-url".to_string(),
        })
    );
}

#[test]
fn test_configure_installs_once() {
    let first = Arc::new(AppConfiguration::default());
    let mut other = AppConfiguration::default();
    other.auth.region = "eu-west-1".to_string();

    assert!(configure(Arc::clone(&first)));
    assert!(!configure(Arc::new(other)));

    let installed = configured().unwrap();
    assert!(Arc::ptr_eq(&installed, &first));
    assert_eq!(installed.auth.region, "ap-southeast-2");
}
