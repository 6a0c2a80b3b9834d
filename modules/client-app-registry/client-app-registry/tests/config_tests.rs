//! Tests for layered configuration loading

use std::io::Write;
use std::time::Duration;

use client_app_registry::ClientAppRegistryConfig;
use tracing::Level;

const ENV_KEYS: [&str; 3] = [
    "CLIENT_APP_REGISTRY__CATALOG__BASE_URL",
    "CLIENT_APP_REGISTRY__CATALOG__AUTH_TOKEN",
    "CLIENT_APP_REGISTRY__CATALOG__TIMEOUT_SECS",
];

fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_over_defaults() {
    let file = yaml_file(
        r#"
catalog:
  base_url: https://core.example.com/syncope/rest
  auth_token: yaml-token
  bootstrap_retry_interval_ms: 250
logging:
  default:
    console_level: debug
    file_level: "off"
"#,
    );

    temp_env::with_vars_unset(ENV_KEYS, || {
        let config = ClientAppRegistryConfig::load_layered(file.path()).unwrap();

        assert_eq!(config.catalog.base_url, "https://core.example.com/syncope/rest");
        assert_eq!(config.catalog.auth_token.as_deref(), Some("yaml-token"));
        assert_eq!(
            config.catalog.bootstrap_retry_interval(),
            Duration::from_millis(250)
        );
        // Untouched keys keep their defaults.
        assert_eq!(config.catalog.timeout(), Duration::from_secs(30));

        let default = &config.logging["default"];
        assert_eq!(default.console_level, Some(Level::DEBUG));
        assert_eq!(default.file_level, None);
    });
}

#[test]
fn test_env_overrides_yaml() {
    let file = yaml_file(
        r"
catalog:
  base_url: https://from-yaml.example.com
  timeout_secs: 10
",
    );

    temp_env::with_vars(
        [
            (
                "CLIENT_APP_REGISTRY__CATALOG__BASE_URL",
                Some("https://from-env.example.com"),
            ),
            ("CLIENT_APP_REGISTRY__CATALOG__AUTH_TOKEN", Some("env-token")),
            ("CLIENT_APP_REGISTRY__CATALOG__TIMEOUT_SECS", None),
        ],
        || {
            let config = ClientAppRegistryConfig::load_layered(file.path()).unwrap();

            assert_eq!(config.catalog.base_url, "https://from-env.example.com");
            assert_eq!(config.catalog.auth_token.as_deref(), Some("env-token"));
            assert_eq!(config.catalog.timeout(), Duration::from_secs(10));
        },
    );
}

#[test]
fn test_unknown_key_is_rejected() {
    let file = yaml_file(
        r"
catalog:
  base_uri: https://typo.example.com
",
    );

    temp_env::with_vars_unset(ENV_KEYS, || {
        assert!(ClientAppRegistryConfig::load_layered(file.path()).is_err());
    });
}

#[test]
fn test_load_or_default_without_file() {
    temp_env::with_vars(
        [
            ("CLIENT_APP_REGISTRY__CATALOG__BASE_URL", None),
            ("CLIENT_APP_REGISTRY__CATALOG__AUTH_TOKEN", None),
            ("CLIENT_APP_REGISTRY__CATALOG__TIMEOUT_SECS", Some("12")),
        ],
        || {
            let config = ClientAppRegistryConfig::load_or_default(None).unwrap();

            assert_eq!(
                config.catalog.base_url,
                ClientAppRegistryConfig::default().catalog.base_url
            );
            assert_eq!(config.catalog.timeout(), Duration::from_secs(12));
            assert!(config.logging.contains_key("default"));
        },
    );
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let err = ClientAppRegistryConfig::load_or_default(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
