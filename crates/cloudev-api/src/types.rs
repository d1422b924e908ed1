//! Request and response types for the cloud development service API.
//!
//! All types match the JSON documents exchanged with `POST /v1/{Operation}`.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Response fields are optional across the board: the service does not
//! promise to populate summary objects, and required-field checks belong to
//! the caller that knows which fields it needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// A listing request that can be resumed from a continuation token.
pub trait PagedRequest: Clone + Send + Sync + 'static {
    fn set_next_token(&mut self, token: Option<String>);
}

/// One page of a listing.
pub trait PagedResponse {
    type Item;

    /// Continuation token for the next page. Absent or empty means the
    /// listing is complete.
    fn next_token(&self) -> Option<&str>;

    fn into_items(self) -> Vec<Self::Item>;
}

macro_rules! paged {
    ($req:ty => $resp:ty, $item:ty) => {
        impl PagedRequest for $req {
            fn set_next_token(&mut self, token: Option<String>) {
                self.next_token = token;
            }
        }

        impl PagedResponse for $resp {
            type Item = $item;

            fn next_token(&self) -> Option<&str> {
                self.next_token.as_deref().filter(|t| !t.is_empty())
            }

            fn into_items(self) -> Vec<$item> {
                self.items.unwrap_or_default()
            }
        }
    };
}

// ── Session / identity ───────────────────────────────────────────────

/// Response of `VerifySession`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySessionResponse {
    #[serde(default)]
    pub identity: Option<String>,
}

/// `GetUserDetails`: look up by id or by user name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserDetailsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserDetailsResponse {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub primary_email: Option<EmailAddress>,
    /// Schema version of this record; only `"1"` is understood.
    #[serde(default)]
    pub version: Option<String>,
}

// ── Organizations ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrganizationsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

/// Organization overview, from `ListOrganizations` and `GetOrganization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrganizationsResponse {
    #[serde(default)]
    pub items: Option<Vec<OrganizationSummary>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

paged!(ListOrganizationsRequest => ListOrganizationsResponse, OrganizationSummary);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrganizationRequest {
    pub name: String,
}

// ── Projects ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsRequest {
    pub organization_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsResponse {
    #[serde(default)]
    pub items: Option<Vec<ProjectSummary>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

paged!(ListProjectsRequest => ListProjectsResponse, ProjectSummary);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectRequest {
    pub organization_name: String,
    pub name: String,
}

// ── Source repositories ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourceRepositoriesRequest {
    pub organization_name: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRepositorySummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourceRepositoriesResponse {
    #[serde(default)]
    pub items: Option<Vec<SourceRepositorySummary>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

paged!(ListSourceRepositoriesRequest => ListSourceRepositoriesResponse, SourceRepositorySummary);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourceRepositoryBranchesRequest {
    pub organization_name: String,
    pub project_name: String,
    pub source_repository_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    /// Full ref, e.g. `refs/heads/main`.
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_commit_id: Option<String>,
    #[serde(default)]
    pub last_updated_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSourceRepositoryBranchesResponse {
    #[serde(default)]
    pub items: Option<Vec<BranchSummary>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

paged!(ListSourceRepositoryBranchesRequest => ListSourceRepositoryBranchesResponse, BranchSummary);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSourceRepositoryCloneUrlsRequest {
    pub organization_name: String,
    pub project_name: String,
    pub source_repository_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSourceRepositoryCloneUrlsResponse {
    #[serde(default)]
    pub https: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceRepositoryBranchRequest {
    pub organization_name: String,
    pub project_name: String,
    pub source_repository_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_commit_id: Option<String>,
}

/// Response of `CreateSourceRepositoryBranch`; same shape as a listed branch.
pub type CreateSourceRepositoryBranchResponse = BranchSummary;

// ── Dev environments ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevEnvironmentsRequest {
    pub organization_name: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

/// IDE (runtime specifier) attached to a dev environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentStorage {
    #[serde(default)]
    pub size_in_gi_b: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevEnvironmentRepository {
    #[serde(default)]
    pub repository_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

/// Dev environment record, from `ListDevEnvironments` and `GetDevEnvironment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevEnvironmentSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    /// One of `PENDING`, `RUNNING`, `STARTING`, `STOPPING`, `STOPPED`,
    /// `FAILED`, `DELETING`, `DELETED`; anything else passes through.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub inactivity_timeout_minutes: Option<i32>,
    #[serde(default)]
    pub persistent_storage: Option<PersistentStorage>,
    #[serde(default)]
    pub repositories: Option<Vec<DevEnvironmentRepository>>,
    #[serde(default)]
    pub ides: Option<Vec<Ide>>,
    #[serde(default)]
    pub last_updated_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevEnvironmentsResponse {
    #[serde(default)]
    pub items: Option<Vec<DevEnvironmentSummary>>,
    #[serde(default)]
    pub next_token: Option<String>,
}

paged!(ListDevEnvironmentsRequest => ListDevEnvironmentsResponse, DevEnvironmentSummary);

/// Addresses a single dev environment. Used by get, start, stop and delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevEnvironmentRequest {
    pub organization_name: String,
    pub project_name: String,
    pub id: String,
}

pub type GetDevEnvironmentResponse = DevEnvironmentSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevEnvironmentRequest {
    pub organization_name: String,
    pub project_name: String,
    pub ides: Vec<Ide>,
    pub instance_type: String,
    pub persistent_storage: PersistentStorage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<DevEnvironmentRepository>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactivity_timeout_minutes: Option<i32>,
    /// Idempotency token; repeated requests with the same value create once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevEnvironmentResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of `StartDevEnvironment` and `StopDevEnvironment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevEnvironmentTransitionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDevEnvironmentResponse {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevEnvironmentRequest {
    pub organization_name: String,
    pub project_name: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ides: Option<Vec<Ide>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactivity_timeout_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevEnvironmentResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

// ── Access tokens ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessTokenRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessTokenResponse {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub access_token_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub expires_time: Option<DateTime<Utc>>,
}
