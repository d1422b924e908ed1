// ── Dev environment domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::resource::{OrgRef, ProjectRef, ProjectScope};

/// Instance type used when a create request does not name one.
pub const DEFAULT_INSTANCE_TYPE: &str = "dev.standard1.small";

/// Persistent storage size (GiB) used when a create request does not name one.
pub const DEFAULT_STORAGE_GIB: i32 = 16;

// ── Status ──────────────────────────────────────────────────────────

/// Remote-reported dev environment status.
///
/// Statuses this crate does not act on are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DevEnvStatus {
    Pending,
    Running,
    Starting,
    Stopping,
    Stopped,
    Failed,
    Deleting,
    Deleted,
    Other(String),
}

impl DevEnvStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Starting => "STARTING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Failed => "FAILED",
            Self::Deleting => "DELETING",
            Self::Deleted => "DELETED",
            Self::Other(s) => s,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<&str> for DevEnvStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "STARTING" => Self::Starting,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "FAILED" => Self::Failed,
            "DELETING" => Self::Deleting,
            "DELETED" => Self::Deleted,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for DevEnvStatus {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl From<DevEnvStatus> for String {
    fn from(status: DevEnvStatus) -> Self {
        match status {
            DevEnvStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DevEnvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Addressing ──────────────────────────────────────────────────────

/// Fully qualified address of one dev environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevEnvironmentId {
    pub org: String,
    pub project: String,
    pub id: String,
}

impl DevEnvironmentId {
    pub fn new(scope: &ProjectScope, id: impl Into<String>) -> Self {
        Self {
            org: scope.org.clone(),
            project: scope.project.clone(),
            id: id.into(),
        }
    }

    pub fn project_scope(&self) -> ProjectScope {
        ProjectScope::new(self.org.clone(), self.project.clone())
    }
}

impl fmt::Display for DevEnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org, self.project, self.id)
    }
}

// ── Records ─────────────────────────────────────────────────────────

/// Runtime specifier (IDE) attached to a dev environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ide {
    pub name: String,
    pub runtime: Option<String>,
}

impl Ide {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: None,
        }
    }
}

/// A repository cloned into a dev environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevEnvRepository {
    pub name: String,
    pub branch: Option<String>,
}

/// A dev environment as last reported by the service.
///
/// `status` is only true at the instant the record was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevEnvironment {
    pub id: String,
    pub org: OrgRef,
    pub project: ProjectRef,
    pub alias: Option<String>,
    pub status: DevEnvStatus,
    pub status_reason: Option<String>,
    pub creator_id: Option<String>,
    pub instance_type: Option<String>,
    pub inactivity_timeout_minutes: Option<i32>,
    pub storage_gib: Option<i32>,
    pub repositories: Vec<DevEnvRepository>,
    pub ides: Vec<Ide>,
    pub last_updated_time: Option<DateTime<Utc>>,
}

impl DevEnvironment {
    pub fn target(&self) -> DevEnvironmentId {
        DevEnvironmentId {
            org: self.org.name.clone(),
            project: self.project.name.clone(),
            id: self.id.clone(),
        }
    }

    /// Alias when set, otherwise the id.
    pub fn name(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.id)
    }
}

// ── Requests ────────────────────────────────────────────────────────

/// Parameters for creating a dev environment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDevEnvironment {
    pub project: ProjectScope,
    /// At least one is required.
    pub ides: Vec<Ide>,
    pub instance_type: String,
    pub storage_gib: i32,
    pub repositories: Vec<DevEnvRepository>,
    pub alias: Option<String>,
    pub inactivity_timeout_minutes: Option<i32>,
}

impl NewDevEnvironment {
    pub fn new(project: ProjectScope, ides: Vec<Ide>) -> Self {
        Self {
            project,
            ides,
            instance_type: DEFAULT_INSTANCE_TYPE.to_owned(),
            storage_gib: DEFAULT_STORAGE_GIB,
            repositories: Vec::new(),
            alias: None,
            inactivity_timeout_minutes: None,
        }
    }
}

/// Changes to apply to an existing dev environment. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevEnvironmentUpdate {
    pub alias: Option<String>,
    pub ides: Option<Vec<Ide>>,
    pub instance_type: Option<String>,
    pub inactivity_timeout_minutes: Option<i32>,
}

impl DevEnvironmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.alias.is_none()
            && self.ides.is_none()
            && self.instance_type.is_none()
            && self.inactivity_timeout_minutes.is_none()
    }
}

/// Result of a start or stop command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevEnvTransition {
    pub id: String,
    pub status: Option<DevEnvStatus>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_parses_known_and_unknown() {
        assert_eq!(DevEnvStatus::from("RUNNING"), DevEnvStatus::Running);
        assert_eq!(
            DevEnvStatus::from("HIBERNATING".to_owned()),
            DevEnvStatus::Other("HIBERNATING".into())
        );
        assert_eq!(DevEnvStatus::Other("X".into()).to_string(), "X");
    }

    #[test]
    fn status_serde_uses_wire_strings() {
        let json = serde_json::to_string(&DevEnvStatus::Stopping).unwrap();
        assert_eq!(json, "\"STOPPING\"");
        let back: DevEnvStatus = serde_json::from_str("\"STOPPED\"").unwrap();
        assert_eq!(back, DevEnvStatus::Stopped);
    }

    #[test]
    fn name_prefers_alias() {
        let mut env = DevEnvironment {
            id: "env-1".into(),
            org: OrgRef::new("acme"),
            project: ProjectRef::new("rocket"),
            alias: Some(String::new()),
            status: DevEnvStatus::Running,
            status_reason: None,
            creator_id: None,
            instance_type: None,
            inactivity_timeout_minutes: None,
            storage_gib: None,
            repositories: Vec::new(),
            ides: Vec::new(),
            last_updated_time: None,
        };
        assert_eq!(env.name(), "env-1");
        env.alias = Some("scratch".into());
        assert_eq!(env.name(), "scratch");
        assert_eq!(env.target().to_string(), "acme/rocket/env-1");
    }
}
