// ── API-to-domain type conversions ──
//
// Bridges `cloudev_api::types` summaries into `crate::model` records.
// Summary objects are not guaranteed to carry ids or names: missing ids
// become `""` and missing names become `"unknown"`. Parent references come
// from the scope the listing was issued under.

use cloudev_api::Operation;
use cloudev_api::types::{
    self as wire, BranchSummary, DevEnvironmentSummary, GetUserDetailsResponse,
    OrganizationSummary, ProjectSummary, SourceRepositorySummary,
};

use crate::error::{CoreError, require};
use crate::model::resource::UNKNOWN_NAME;
use crate::model::{
    Branch, DevEnvRepository, DevEnvStatus, DevEnvironment, Ide, Org, OrgRef, Project, ProjectRef,
    ProjectScope, Repo, RepoRef, RepoScope, SUPPORTED_USER_DETAILS_VERSION, UserDetails,
};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

// ── Helpers ────────────────────────────────────────────────────────

fn id_or_empty(id: Option<String>) -> String {
    id.unwrap_or_default()
}

fn name_or_unknown(name: Option<String>) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned())
}

// ── Resources ──────────────────────────────────────────────────────

impl From<OrganizationSummary> for Org {
    fn from(s: OrganizationSummary) -> Self {
        Self {
            id: id_or_empty(s.id),
            name: name_or_unknown(s.name),
            display_name: s.display_name,
            description: s.description,
            region_name: s.region_name,
        }
    }
}

pub(crate) fn project(org: &str, s: ProjectSummary) -> Project {
    Project {
        id: id_or_empty(s.id),
        name: name_or_unknown(s.name),
        org: OrgRef::new(org),
        display_name: s.display_name,
        description: s.description,
    }
}

pub(crate) fn repo(scope: &ProjectScope, s: SourceRepositorySummary) -> Repo {
    Repo {
        id: id_or_empty(s.id),
        name: name_or_unknown(s.name),
        org: OrgRef::new(scope.org.as_str()),
        project: ProjectRef::new(scope.project.as_str()),
        description: s.description,
        last_updated_time: s.last_updated_time.or(s.created_time),
    }
}

pub(crate) fn branch(scope: &RepoScope, s: BranchSummary) -> Branch {
    let name = s.name.or_else(|| {
        s.reference
            .as_deref()
            .map(|r| r.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(r).to_owned())
    });
    Branch {
        id: id_or_empty(s.reference),
        name: name_or_unknown(name),
        org: OrgRef::new(scope.org.as_str()),
        project: ProjectRef::new(scope.project.as_str()),
        repo: RepoRef::new(scope.repo.as_str()),
        head_commit_id: s.head_commit_id,
        last_updated_time: s.last_updated_time,
    }
}

// ── Dev environments ───────────────────────────────────────────────

/// Lenient conversion used for listings: a missing status is kept as an
/// empty `Other` rather than rejected.
pub(crate) fn dev_environment(scope: &ProjectScope, s: DevEnvironmentSummary) -> DevEnvironment {
    DevEnvironment {
        id: id_or_empty(s.id),
        org: OrgRef::new(s.organization_name.unwrap_or_else(|| scope.org.clone())),
        project: ProjectRef::new(s.project_name.unwrap_or_else(|| scope.project.clone())),
        alias: s.alias,
        status: s
            .status
            .map_or_else(|| DevEnvStatus::Other(String::new()), DevEnvStatus::from),
        status_reason: s.status_reason,
        creator_id: s.creator_id,
        instance_type: s.instance_type,
        inactivity_timeout_minutes: s.inactivity_timeout_minutes,
        storage_gib: s.persistent_storage.and_then(|p| p.size_in_gi_b),
        repositories: s
            .repositories
            .unwrap_or_default()
            .into_iter()
            .map(|r| DevEnvRepository {
                name: name_or_unknown(r.repository_name),
                branch: r.branch_name,
            })
            .collect(),
        ides: s
            .ides
            .unwrap_or_default()
            .into_iter()
            .map(|i| Ide {
                name: name_or_unknown(i.name),
                runtime: i.runtime,
            })
            .collect(),
        last_updated_time: s.last_updated_time,
    }
}

/// Strict conversion for a single fetched record: `id` and `status` must be
/// present, since callers act on them.
pub(crate) fn fetched_dev_environment(
    scope: &ProjectScope,
    s: DevEnvironmentSummary,
) -> Result<DevEnvironment, CoreError> {
    require(s.id.as_ref(), Operation::GetDevEnvironment, "id")?;
    require(s.status.as_ref(), Operation::GetDevEnvironment, "status")?;
    Ok(dev_environment(scope, s))
}

impl From<&Ide> for wire::Ide {
    fn from(ide: &Ide) -> Self {
        Self {
            name: Some(ide.name.clone()),
            runtime: ide.runtime.clone(),
        }
    }
}

impl From<&DevEnvRepository> for wire::DevEnvironmentRepository {
    fn from(repo: &DevEnvRepository) -> Self {
        Self {
            repository_name: Some(repo.name.clone()),
            branch_name: repo.branch.clone(),
        }
    }
}

// ── Users ──────────────────────────────────────────────────────────

pub(crate) fn check_user_details_version(details: &UserDetails) -> Result<(), CoreError> {
    if details.version == SUPPORTED_USER_DETAILS_VERSION {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "unsupported user details version {:?} (expected {SUPPORTED_USER_DETAILS_VERSION:?})",
            details.version
        )))
    }
}

pub(crate) fn user_details(resp: GetUserDetailsResponse) -> Result<UserDetails, CoreError> {
    const OP: Operation = Operation::GetUserDetails;
    let details = UserDetails {
        user_id: require(resp.user_id, OP, "userId")?,
        user_name: require(resp.user_name, OP, "userName")?,
        display_name: require(resp.display_name, OP, "displayName")?,
        primary_email: resp.primary_email.and_then(|e| e.email),
        version: require(resp.version, OP, "version")?,
    };
    check_user_details_version(&details)?;
    Ok(details)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cloudev_api::types::{EmailAddress, PersistentStorage};
    use pretty_assertions::assert_eq;

    fn scope() -> ProjectScope {
        ProjectScope::new("acme", "rocket")
    }

    #[test]
    fn missing_id_and_name_get_defaults() {
        let org = Org::from(OrganizationSummary::default());
        assert_eq!(org.id, "");
        assert_eq!(org.name, "unknown");

        let p = project(
            "acme",
            ProjectSummary {
                name: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(p.name, "unknown");
        assert_eq!(p.org.name, "acme");
    }

    #[test]
    fn branch_name_falls_back_to_ref() {
        let b = branch(
            &scope().repo("app"),
            BranchSummary {
                reference: Some("refs/heads/feature/x".into()),
                ..Default::default()
            },
        );
        assert_eq!(b.id, "refs/heads/feature/x");
        assert_eq!(b.name, "feature/x");
        assert_eq!(b.repo.name, "app");
    }

    #[test]
    fn dev_environment_fills_parents_from_scope() {
        let env = dev_environment(
            &scope(),
            DevEnvironmentSummary {
                id: Some("env-1".into()),
                status: Some("STOPPED".into()),
                persistent_storage: Some(PersistentStorage {
                    size_in_gi_b: Some(32),
                }),
                ..Default::default()
            },
        );
        assert_eq!(env.org.name, "acme");
        assert_eq!(env.project.name, "rocket");
        assert_eq!(env.status, DevEnvStatus::Stopped);
        assert_eq!(env.storage_gib, Some(32));
    }

    #[test]
    fn fetched_dev_environment_requires_status() {
        let err = fetched_dev_environment(
            &scope(),
            DevEnvironmentSummary {
                id: Some("env-1".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref message } if message.contains("status")));
    }

    fn details_response(version: &str) -> GetUserDetailsResponse {
        GetUserDetailsResponse {
            user_id: Some("u1".into()),
            user_name: Some("ada".into()),
            display_name: Some("Ada".into()),
            primary_email: Some(EmailAddress {
                email: Some("ada@example.com".into()),
                verified: Some(true),
            }),
            version: Some(version.into()),
        }
    }

    #[test]
    fn user_details_accepts_version_one() {
        let details = user_details(details_response("1")).unwrap();
        assert_eq!(details.user_id, "u1");
        assert_eq!(details.primary_email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn user_details_rejects_other_versions() {
        let err = user_details(details_response("2")).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }
}
