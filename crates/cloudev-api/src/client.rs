// Typed client over a `Transport`.
//
// One method per remote operation: encode the request, invoke the
// transport, decode the response. No retries and no field validation at
// this layer; remote errors surface exactly as the transport produced them.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::operation::Operation;
use crate::transport::Transport;
use crate::types::{
    CreateAccessTokenRequest, CreateAccessTokenResponse, CreateDevEnvironmentRequest,
    CreateDevEnvironmentResponse, CreateSourceRepositoryBranchRequest,
    CreateSourceRepositoryBranchResponse, DeleteDevEnvironmentResponse, DevEnvironmentRequest,
    DevEnvironmentTransitionResponse, GetDevEnvironmentResponse, GetOrganizationRequest,
    GetProjectRequest, GetSourceRepositoryCloneUrlsRequest, GetSourceRepositoryCloneUrlsResponse,
    GetUserDetailsRequest, GetUserDetailsResponse, ListDevEnvironmentsRequest,
    ListDevEnvironmentsResponse, ListOrganizationsRequest, ListOrganizationsResponse,
    ListProjectsRequest, ListProjectsResponse, ListSourceRepositoriesRequest,
    ListSourceRepositoriesResponse, ListSourceRepositoryBranchesRequest,
    ListSourceRepositoryBranchesResponse, OrganizationSummary, ProjectSummary,
    UpdateDevEnvironmentRequest, UpdateDevEnvironmentResponse, VerifySessionResponse,
};

/// Async client for the cloud development service.
///
/// Cheaply cloneable; clones share the underlying transport.
pub struct ApiClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The transport this client sends through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<Req, Resp>(&self, operation: Operation, request: &Req) -> Result<Resp, Error>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let params = serde_json::to_value(request).map_err(Error::Encode)?;
        let value = self.transport.invoke(operation, params).await?;
        decode(operation, &value)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Session ──────────────────────────────────────────────────────

    pub async fn verify_session(&self) -> Result<VerifySessionResponse, Error> {
        self.call(Operation::VerifySession, &serde_json::Map::new())
            .await
    }

    pub async fn get_user_details(
        &self,
        request: &GetUserDetailsRequest,
    ) -> Result<GetUserDetailsResponse, Error> {
        self.call(Operation::GetUserDetails, request).await
    }

    // ── Organizations ────────────────────────────────────────────────

    pub async fn list_organizations(
        &self,
        request: &ListOrganizationsRequest,
    ) -> Result<ListOrganizationsResponse, Error> {
        self.call(Operation::ListOrganizations, request).await
    }

    pub async fn get_organization(
        &self,
        request: &GetOrganizationRequest,
    ) -> Result<OrganizationSummary, Error> {
        self.call(Operation::GetOrganization, request).await
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub async fn list_projects(
        &self,
        request: &ListProjectsRequest,
    ) -> Result<ListProjectsResponse, Error> {
        self.call(Operation::ListProjects, request).await
    }

    pub async fn get_project(&self, request: &GetProjectRequest) -> Result<ProjectSummary, Error> {
        self.call(Operation::GetProject, request).await
    }

    // ── Source repositories ──────────────────────────────────────────

    pub async fn list_source_repositories(
        &self,
        request: &ListSourceRepositoriesRequest,
    ) -> Result<ListSourceRepositoriesResponse, Error> {
        self.call(Operation::ListSourceRepositories, request).await
    }

    pub async fn list_source_repository_branches(
        &self,
        request: &ListSourceRepositoryBranchesRequest,
    ) -> Result<ListSourceRepositoryBranchesResponse, Error> {
        self.call(Operation::ListSourceRepositoryBranches, request)
            .await
    }

    pub async fn get_source_repository_clone_urls(
        &self,
        request: &GetSourceRepositoryCloneUrlsRequest,
    ) -> Result<GetSourceRepositoryCloneUrlsResponse, Error> {
        self.call(Operation::GetSourceRepositoryCloneUrls, request)
            .await
    }

    pub async fn create_source_repository_branch(
        &self,
        request: &CreateSourceRepositoryBranchRequest,
    ) -> Result<CreateSourceRepositoryBranchResponse, Error> {
        self.call(Operation::CreateSourceRepositoryBranch, request)
            .await
    }

    // ── Dev environments ─────────────────────────────────────────────

    pub async fn list_dev_environments(
        &self,
        request: &ListDevEnvironmentsRequest,
    ) -> Result<ListDevEnvironmentsResponse, Error> {
        self.call(Operation::ListDevEnvironments, request).await
    }

    pub async fn get_dev_environment(
        &self,
        request: &DevEnvironmentRequest,
    ) -> Result<GetDevEnvironmentResponse, Error> {
        self.call(Operation::GetDevEnvironment, request).await
    }

    pub async fn create_dev_environment(
        &self,
        request: &CreateDevEnvironmentRequest,
    ) -> Result<CreateDevEnvironmentResponse, Error> {
        self.call(Operation::CreateDevEnvironment, request).await
    }

    pub async fn start_dev_environment(
        &self,
        request: &DevEnvironmentRequest,
    ) -> Result<DevEnvironmentTransitionResponse, Error> {
        self.call(Operation::StartDevEnvironment, request).await
    }

    pub async fn stop_dev_environment(
        &self,
        request: &DevEnvironmentRequest,
    ) -> Result<DevEnvironmentTransitionResponse, Error> {
        self.call(Operation::StopDevEnvironment, request).await
    }

    pub async fn delete_dev_environment(
        &self,
        request: &DevEnvironmentRequest,
    ) -> Result<DeleteDevEnvironmentResponse, Error> {
        self.call(Operation::DeleteDevEnvironment, request).await
    }

    pub async fn update_dev_environment(
        &self,
        request: &UpdateDevEnvironmentRequest,
    ) -> Result<UpdateDevEnvironmentResponse, Error> {
        self.call(Operation::UpdateDevEnvironment, request).await
    }

    // ── Access tokens ────────────────────────────────────────────────

    pub async fn create_access_token(
        &self,
        request: &CreateAccessTokenRequest,
    ) -> Result<CreateAccessTokenResponse, Error> {
        self.call(Operation::CreateAccessToken, request).await
    }
}

fn decode<Resp: DeserializeOwned>(operation: Operation, value: &Value) -> Result<Resp, Error> {
    Resp::deserialize(value).map_err(|e| {
        debug!(%operation, error = %e, "response did not match the expected shape");
        Error::Deserialization {
            message: format!("{operation}: {e}"),
            body: value.to_string(),
        }
    })
}
