//! CLI configuration: thin wrapper around `cloudev_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--endpoint, --region, --token, --timeout).

use secrecy::SecretString;

use cloudev_core::Session;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use cloudev_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// The active profile with CLI flag overrides applied.
///
/// An explicitly requested profile must exist; otherwise a missing profile
/// means "use defaults".
pub fn effective_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    let mut profile = match config.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(config),
                name,
            });
        }
        None => Profile::default(),
    };

    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint = Some(endpoint.clone());
    }
    if let Some(ref region) = global.region {
        profile.region = Some(region.clone());
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(config.defaults.timeout));

    Ok((name, profile))
}

/// Build a token-bearing `Session` from the config file, profile, and CLI
/// overrides. The token is not verified here.
pub fn build_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let (name, profile) = effective_profile(global, &cfg)?;

    let client_config = cloudev_config::profile_to_client_config(&profile)?;
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => cloudev_config::resolve_token(&profile, &name)?,
    };

    let session = Session::new(client_config)?;
    session.set_credentials(token, None)?;
    Ok(session)
}
