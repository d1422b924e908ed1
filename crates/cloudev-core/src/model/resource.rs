// ── Resource hierarchy ──
//
// Organizations own projects; projects own source repositories and dev
// environments; repositories own branches. Children point back at their
// parents by name, never by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use super::dev_env::DevEnvironment;

/// Name used for a resource the service returned without one.
pub const UNKNOWN_NAME: &str = "unknown";

/// The closed set of resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Org,
    Project,
    Repo,
    Branch,
    Env,
}

// ── Parent references ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub name: String,
}

impl OrgRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProjectRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl RepoRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ── Scopes ──────────────────────────────────────────────────────────

/// Addresses a project: everything listed beneath it is scoped by this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectScope {
    pub org: String,
    pub project: String,
}

/// Addresses a source repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoScope {
    pub org: String,
    pub project: String,
    pub repo: String,
}

impl ProjectScope {
    pub fn new(org: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            project: project.into(),
        }
    }

    pub fn repo(&self, repo: impl Into<String>) -> RepoScope {
        RepoScope {
            org: self.org.clone(),
            project: self.project.clone(),
            repo: repo.into(),
        }
    }
}

impl RepoScope {
    pub fn project_scope(&self) -> ProjectScope {
        ProjectScope::new(self.org.clone(), self.project.clone())
    }
}

impl fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.project)
    }
}

impl fmt::Display for RepoScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org, self.project, self.repo)
    }
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub org: OrgRef,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl Project {
    pub fn scope(&self) -> ProjectScope {
        ProjectScope::new(self.org.name.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: String,
    pub name: String,
    pub org: OrgRef,
    pub project: ProjectRef,
    pub description: Option<String>,
    pub last_updated_time: Option<DateTime<Utc>>,
}

impl Repo {
    pub fn scope(&self) -> RepoScope {
        RepoScope {
            org: self.org.name.clone(),
            project: self.project.name.clone(),
            repo: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Full ref, e.g. `refs/heads/main`.
    pub id: String,
    pub name: String,
    pub org: OrgRef,
    pub project: ProjectRef,
    pub repo: RepoRef,
    pub head_commit_id: Option<String>,
    pub last_updated_time: Option<DateTime<Utc>>,
}

// ── Resource ────────────────────────────────────────────────────────

/// Any listable resource, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    Org(Org),
    Project(Project),
    Repo(Repo),
    Branch(Branch),
    Env(DevEnvironment),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Org(_) => ResourceKind::Org,
            Self::Project(_) => ResourceKind::Project,
            Self::Repo(_) => ResourceKind::Repo,
            Self::Branch(_) => ResourceKind::Branch,
            Self::Env(_) => ResourceKind::Env,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Org(o) => &o.id,
            Self::Project(p) => &p.id,
            Self::Repo(r) => &r.id,
            Self::Branch(b) => &b.id,
            Self::Env(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Org(o) => &o.name,
            Self::Project(p) => &p.name,
            Self::Repo(r) => &r.name,
            Self::Branch(b) => &b.name,
            Self::Env(e) => e.name(),
        }
    }
}
