// Configuration loading and parsing (dashboard.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub remote: RemoteConfig,
    pub credentials: CredentialsConfig,
    pub db_path: String,
    pub page_size: usize,
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    remote: RemoteConfig,
    storage: StorageSection,
    fetch: FetchSection,
}

/// The `[remote]` table: where the player table and identity provider live.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FetchSection {
    page_size: usize,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// Optional sign-in credentials. When absent, the session starts signed out.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- dashboard.toml (required) ---
    let dashboard_path = config_dir.join("dashboard.toml");
    let dashboard_text = read_file(&dashboard_path)?;
    let dashboard_file: DashboardFile =
        toml::from_str(&dashboard_text).map_err(|e| ConfigError::ParseError {
            path: dashboard_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        remote: dashboard_file.remote,
        credentials,
        db_path: dashboard_file.storage.path,
        page_size: dashboard_file.fetch.page_size,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.remote.url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "remote.url".into(),
            message: format!("must start with http:// or https://, got `{url}`"),
        });
    }

    if config.remote.anon_key.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "remote.anon_key".into(),
            message: "must not be empty".into(),
        });
    }

    if config.db_path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "storage.path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "fetch.page_size".into(),
            message: "must be > 0".into(),
        });
    }

    // Credentials are all-or-nothing: an email without a password (or the
    // reverse) is a config mistake, not a partial sign-in.
    match (&config.credentials.email, &config.credentials.password) {
        (Some(_), None) => {
            return Err(ConfigError::ValidationError {
                field: "credentials.password".into(),
                message: "email is set but password is missing".into(),
            });
        }
        (None, Some(_)) => {
            return Err(ConfigError::ValidationError {
                field: "credentials.email".into(),
                message: "password is set but email is missing".into(),
            });
        }
        _ => {}
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_DASHBOARD: &str = r#"
[remote]
url = "https://example.supabase.co"
anon_key = "anon-key"

[storage]
path = "dashboard.db"

[fetch]
page_size = 20
"#;

    /// Helper: creates a temp config dir with the given dashboard.toml
    /// content, returning the base dir.
    fn setup(name: &str, dashboard_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("dashboard_config_test_{name}"));
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("dashboard.toml"), dashboard_toml).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config() {
        let tmp = setup("valid", VALID_DASHBOARD);

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.remote.url, "https://example.supabase.co");
        assert_eq!(config.remote.anon_key, "anon-key");
        assert_eq!(config.db_path, "dashboard.db");
        assert_eq!(config.page_size, 20);
        assert!(config.credentials.email.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_login() {
        let tmp = setup("with_creds", VALID_DASHBOARD);
        fs::write(
            tmp.join("config/credentials.toml"),
            "email = \"fan@example.com\"\npassword = \"hunter2\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(config.credentials.email.as_deref(), Some("fan@example.com"));
        assert_eq!(config.credentials.password.as_deref(), Some("hunter2"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_email_without_password() {
        let tmp = setup("half_creds", VALID_DASHBOARD);
        fs::write(
            tmp.join("config/credentials.toml"),
            "email = \"fan@example.com\"\n",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "credentials.password");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_http_url() {
        let bad = VALID_DASHBOARD.replace("https://example.supabase.co", "example.supabase.co");
        let tmp = setup("bad_url", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "remote.url");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_anon_key() {
        let bad = VALID_DASHBOARD.replace("anon-key", "");
        let tmp = setup("empty_key", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "remote.anon_key");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_page_size() {
        let bad = VALID_DASHBOARD.replace("page_size = 20", "page_size = 0");
        let tmp = setup("zero_page", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "fetch.page_size");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_dashboard_toml() {
        let tmp = std::env::temp_dir().join("dashboard_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = setup("invalid_toml", "this is not valid [[[ toml");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("dashboard.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("dashboard_config_test_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_DASHBOARD).unwrap();
        // Template file that should NOT be copied
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "email = \"you@example.com\"\npassword = \"...\"\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/dashboard.toml").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("dashboard_config_test_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join("dashboard.toml"), VALID_DASHBOARD).unwrap();

        // Pre-existing config must be preserved
        fs::write(config_dir.join("dashboard.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(config_dir.join("dashboard.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("dashboard_config_test_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
