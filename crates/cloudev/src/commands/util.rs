//! Shared helpers for command handlers.

use std::io::IsTerminal;

use futures_util::StreamExt;
use futures_util::stream;

use cloudev_core::{Batches, DevEnvRepository};

use crate::error::CliError;

/// Drain a batch stream into one list.
pub async fn collect<T: Send + 'static>(batches: Batches<T>) -> Vec<T> {
    batches.flat_map(stream::iter).collect().await
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse `NAME` or `NAME@BRANCH`.
pub fn parse_repository(spec: &str) -> Result<DevEnvRepository, CliError> {
    let (name, branch) = match spec.split_once('@') {
        Some((name, branch)) => (name, Some(branch)),
        None => (spec, None),
    };
    if name.is_empty() || branch.is_some_and(str::is_empty) {
        return Err(CliError::Validation {
            field: "repo".into(),
            reason: format!("expected NAME or NAME@BRANCH, got '{spec}'"),
        });
    }
    Ok(DevEnvRepository {
        name: name.to_owned(),
        branch: branch.map(str::to_owned),
    })
}

/// Render an optional timestamp for tables.
pub fn format_time(time: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repository_with_and_without_branch() {
        let plain = parse_repository("web").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(plain.name, "web");
        assert_eq!(plain.branch, None);

        let pinned = parse_repository("web@feature/x").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(pinned.name, "web");
        assert_eq!(pinned.branch.as_deref(), Some("feature/x"));
    }

    #[test]
    fn rejects_empty_repository_parts() {
        assert!(parse_repository("@main").is_err());
        assert!(parse_repository("web@").is_err());
    }
}
