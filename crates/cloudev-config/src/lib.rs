//! Shared configuration for the cloudev CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `cloudev_core::ClientConfig`. The CLI layers its
//! `GlobalOpts` overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cloudev_core::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_REGION, ServiceEndpoint};

/// Keyring service name; entries are keyed `{profile}/token`.
pub const KEYRING_SERVICE: &str = "cloudev";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the override, else `default_profile`,
    /// else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned()
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named service profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service region (defaults to us-west-2).
    pub region: Option<String>,

    /// Service endpoint URL.
    pub endpoint: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Seconds between status polls while starting a dev environment.
    pub poll_interval: Option<u64>,

    /// Seconds to wait for a dev environment to reach RUNNING.
    pub start_timeout: Option<u64>,

    /// Page size requested from listings.
    pub page_size: Option<i32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "cloudev", "cloudev").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cloudev");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, overlaid with `CLOUDEV_*` environment variables
/// (`__` separates nesting levels, e.g. `CLOUDEV_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLOUDEV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Resolve a bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's token in the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile. CLI flag overrides are applied
/// to the profile beforehand.
pub fn profile_to_client_config(profile: &Profile) -> Result<ClientConfig, ConfigError> {
    let region = profile.region.as_deref().unwrap_or(DEFAULT_REGION);
    let endpoint = profile.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    let endpoint =
        ServiceEndpoint::new(region, endpoint).map_err(|e| ConfigError::Validation {
            field: "endpoint".into(),
            reason: e.to_string(),
        })?;

    if profile.page_size.is_some_and(|n| n <= 0) {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be positive".into(),
        });
    }
    if profile.poll_interval == Some(0) {
        return Err(ConfigError::Validation {
            field: "poll_interval".into(),
            reason: "must be at least one second".into(),
        });
    }

    let defaults = ClientConfig::default();
    Ok(ClientConfig {
        endpoint,
        timeout: profile
            .timeout
            .map_or(defaults.timeout, Duration::from_secs),
        poll_interval: profile
            .poll_interval
            .map_or(defaults.poll_interval, Duration::from_secs),
        start_timeout: profile
            .start_timeout
            .map_or(defaults.start_timeout, Duration::from_secs),
        page_size: profile.page_size,
        ca_cert: profile.ca_cert.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "work"

[defaults]
timeout = 45

[profiles.work]
region = "eu-west-1"
endpoint = "https://devenv.example.com"
token = "plain-token"
start_timeout = 60
page_size = 50
"#;

    #[test]
    fn loads_profiles_from_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.active_profile_name(None), "work");
            assert_eq!(cfg.active_profile_name(Some("other")), "other");
            assert_eq!(cfg.defaults.timeout, 45);

            let profile = cfg.profile("work").unwrap();
            let client = profile_to_client_config(profile).unwrap();
            assert_eq!(client.endpoint.region, "eu-west-1");
            assert_eq!(client.endpoint.url.as_str(), "https://devenv.example.com/");
            assert_eq!(client.start_timeout, Duration::from_secs(60));
            assert_eq!(client.poll_interval, Duration::from_secs(5));
            assert_eq!(client.page_size, Some(50));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("CLOUDEV_DEFAULTS__TIMEOUT", "90");
            jail.set_env("CLOUDEV_DEFAULT_PROFILE", "ci");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.defaults.timeout, 90);
            assert_eq!(cfg.active_profile_name(None), "ci");
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert_eq!(cfg.active_profile_name(None), "default");
            assert!(cfg.profiles.is_empty());
            assert!(matches!(
                cfg.profile("default"),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn token_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("CLOUDEV_TEST_TOKEN", "from-env");
            let profile = Profile {
                token: Some("plain".into()),
                token_env: Some("CLOUDEV_TEST_TOKEN".into()),
                ..Profile::default()
            };
            let token = resolve_token(&profile, "cloudev-config-test-env").unwrap();
            assert_eq!(token.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let profile = Profile {
            token: Some("plain".into()),
            token_env: Some("CLOUDEV_TEST_UNSET_VARIABLE".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "cloudev-config-test-plain").unwrap();
        assert_eq!(token.expose_secret(), "plain");

        let err = resolve_token(&Profile::default(), "cloudev-config-test-none").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn defaults_target_the_global_endpoint() {
        let client = profile_to_client_config(&Profile::default()).unwrap();
        assert_eq!(client.endpoint.region, DEFAULT_REGION);
        assert_eq!(client.endpoint.url.as_str(), "https://codecatalyst.global.api.aws/");
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad_url = Profile {
            endpoint: Some("not a url".into()),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad_url),
            Err(ConfigError::Validation { ref field, .. }) if field == "endpoint"
        ));

        let bad_page = Profile {
            page_size: Some(0),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad_page),
            Err(ConfigError::Validation { ref field, .. }) if field == "page_size"
        ));

        let bad_poll = Profile {
            poll_interval: Some(0),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad_poll),
            Err(ConfigError::Validation { ref field, .. }) if field == "poll_interval"
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                region: Some("us-east-1".into()),
                token_env: Some("MY_TOKEN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.region.as_deref(), Some("us-east-1"));
        assert_eq!(profile.token_env.as_deref(), Some("MY_TOKEN"));
        assert_eq!(profile.token, None);
    }
}
