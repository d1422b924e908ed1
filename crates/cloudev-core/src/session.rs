// ── Session ──
//
// Connection identity plus the authenticated point operations on
// organizations, projects, repositories, dev environments and access
// tokens. The bearer token, the transport bound to it and the user it
// resolved to live together in one `Binding` that is swapped out whole on
// a credential change.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use cloudev_api::types::{
    CreateAccessTokenRequest, CreateDevEnvironmentRequest, CreateSourceRepositoryBranchRequest,
    DevEnvironmentRequest, DevEnvironmentTransitionResponse, GetOrganizationRequest,
    GetProjectRequest, GetSourceRepositoryCloneUrlsRequest, GetUserDetailsRequest,
    OrganizationSummary, PersistentStorage, UpdateDevEnvironmentRequest,
};
use cloudev_api::{ApiClient, HttpTransport, Operation, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::convert;
use crate::error::{CoreError, require};
use crate::model::{
    AccessToken, Branch, DevEnvStatus, DevEnvTransition, DevEnvironment, DevEnvironmentId,
    DevEnvironmentUpdate, Identity, NewDevEnvironment, Org, Project, ProjectScope, RepoScope,
    UserDetails, UserRef,
};

// ── Binding ──────────────────────────────────────────────────────

/// Everything tied to one set of credentials.
struct Binding<T> {
    token: Option<SecretString>,
    api: ApiClient<T>,
    /// Expected principal; checked against every verification.
    user_id: Option<String>,
    /// Resolved once per binding.
    details: Option<UserDetails>,
}

impl<T> Binding<T> {
    fn with_details(&self, user_id: String, details: UserDetails) -> Self {
        Self {
            token: self.token.clone(),
            api: self.api.clone(),
            user_id: Some(user_id),
            details: Some(details),
        }
    }
}

// ── Session ──────────────────────────────────────────────────────

/// An authenticated view of the service.
///
/// Cheaply cloneable; clones share the same credentials. Created
/// disconnected: it becomes connected once it holds a token and has
/// verified the user behind it.
pub struct Session<T = HttpTransport> {
    inner: Arc<SessionInner<T>>,
}

struct SessionInner<T> {
    config: ClientConfig,
    binding: ArcSwap<Binding<T>>,
}

impl<T> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Session<HttpTransport> {
    /// Create a disconnected session over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.transport_config(), None)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a session, bind `token` and verify it.
    pub async fn connect(config: ClientConfig, token: SecretString) -> Result<Self, CoreError> {
        let session = Self::new(config)?;
        session.set_credentials(token, None)?;
        session.verify_session().await?;
        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session over an existing transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let binding = Binding {
            token: None,
            api: ApiClient::new(transport),
            user_id: None,
            details: None,
        };
        Self {
            inner: Arc::new(SessionInner {
                config,
                binding: ArcSwap::from_pointee(binding),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The API client for the current credentials.
    pub(crate) fn api(&self) -> ApiClient<T> {
        self.inner.binding.load().api.clone()
    }

    // ── Credentials ──────────────────────────────────────────────

    pub fn has_token(&self) -> bool {
        self.inner.binding.load().token.is_some()
    }

    /// A token is bound and the user behind it has been resolved.
    pub fn is_connected(&self) -> bool {
        let binding = self.inner.binding.load();
        binding.token.is_some() && binding.details.is_some()
    }

    pub fn user_details(&self) -> Option<UserDetails> {
        self.inner.binding.load().details.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner
            .binding
            .load()
            .details
            .as_ref()
            .map(Identity::from)
    }

    /// Replace the bearer token and rebuild the transport around it.
    ///
    /// `user` names the principal the token is expected to belong to. Full
    /// details are cached as given; a bare id defers resolution to the next
    /// [`verify_session`](Self::verify_session). An empty token leaves the
    /// session without credentials.
    pub fn set_credentials(
        &self,
        token: SecretString,
        user: Option<UserRef>,
    ) -> Result<(), CoreError> {
        let token = Some(token).filter(|t| !t.expose_secret().is_empty());
        let (user_id, details) = match user {
            None => (None, None),
            Some(UserRef::Id(id)) => (Some(id), None),
            Some(UserRef::Details(details)) => {
                convert::check_user_details_version(&details)?;
                (Some(details.user_id.clone()), Some(details))
            }
        };

        let transport = self.api().transport().rebind(token.as_ref())?;
        self.inner.binding.store(Arc::new(Binding {
            token,
            api: ApiClient::new(transport),
            user_id,
            details,
        }));
        debug!("session credentials replaced");
        Ok(())
    }

    // ── Identity ─────────────────────────────────────────────────

    /// Ask the service who the token belongs to, and resolve that user.
    ///
    /// Fails if the answer disagrees with the user the credentials were
    /// bound to. User details are fetched once per set of credentials.
    pub async fn verify_session(&self) -> Result<UserDetails, CoreError> {
        let binding = self.inner.binding.load_full();
        let resp = binding.api.verify_session().await?;
        let identity = require(
            resp.identity.filter(|i| !i.is_empty()),
            Operation::VerifySession,
            "identity",
        )?;

        if let Some(bound) = &binding.user_id {
            if *bound != identity {
                return Err(CoreError::IdentityMismatch {
                    bound: bound.clone(),
                    returned: identity,
                });
            }
        }

        if let Some(details) = &binding.details {
            return Ok(details.clone());
        }

        let details = fetch_user_details(&binding.api, &identity).await?;
        if details.user_id != identity {
            return Err(CoreError::IdentityMismatch {
                bound: identity,
                returned: details.user_id,
            });
        }

        let updated = Arc::new(binding.with_details(identity, details.clone()));
        let previous = self.inner.binding.compare_and_swap(&binding, updated);
        if !Arc::ptr_eq(&previous, &binding) {
            debug!("credentials changed during verification, result not cached");
        }

        info!(user = %details.user_name, "session verified");
        Ok(details)
    }

    /// Look up a user by id.
    pub async fn get_user_details(&self, id: &str) -> Result<UserDetails, CoreError> {
        fetch_user_details(&self.api(), id).await
    }

    // ── Organizations and projects ───────────────────────────────

    pub async fn get_org(&self, name: &str) -> Result<Org, CoreError> {
        let request = GetOrganizationRequest {
            name: name.to_owned(),
        };
        let summary = self.api().get_organization(&request).await?;
        Ok(Org::from(OrganizationSummary {
            name: summary.name.or_else(|| Some(name.to_owned())),
            ..summary
        }))
    }

    pub async fn get_project(&self, scope: &ProjectScope) -> Result<Project, CoreError> {
        let request = GetProjectRequest {
            organization_name: scope.org.clone(),
            name: scope.project.clone(),
        };
        let mut summary = self.api().get_project(&request).await?;
        summary.name.get_or_insert_with(|| scope.project.clone());
        Ok(convert::project(&scope.org, summary))
    }

    // ── Source repositories ──────────────────────────────────────

    /// HTTPS clone URL of a repository.
    pub async fn get_repo_clone_url(&self, scope: &RepoScope) -> Result<Url, CoreError> {
        let request = GetSourceRepositoryCloneUrlsRequest {
            organization_name: scope.org.clone(),
            project_name: scope.project.clone(),
            source_repository_name: scope.repo.clone(),
        };
        let resp = self.api().get_source_repository_clone_urls(&request).await?;
        let https = require(resp.https, Operation::GetSourceRepositoryCloneUrls, "https")?;
        Url::parse(&https)
            .map_err(|e| CoreError::validation(format!("invalid clone URL {https:?}: {e}")))
    }

    pub async fn create_source_branch(
        &self,
        scope: &RepoScope,
        name: &str,
        head_commit_id: Option<&str>,
    ) -> Result<Branch, CoreError> {
        let request = CreateSourceRepositoryBranchRequest {
            organization_name: scope.org.clone(),
            project_name: scope.project.clone(),
            source_repository_name: scope.repo.clone(),
            name: name.to_owned(),
            head_commit_id: head_commit_id.map(str::to_owned),
        };
        let mut summary = self.api().create_source_repository_branch(&request).await?;
        summary.name.get_or_insert_with(|| name.to_owned());
        info!(repo = %scope, branch = name, "created branch");
        Ok(convert::branch(scope, summary))
    }

    // ── Dev environments ─────────────────────────────────────────

    pub async fn get_dev_environment(
        &self,
        target: &DevEnvironmentId,
    ) -> Result<DevEnvironment, CoreError> {
        let summary = self.api().get_dev_environment(&env_request(target)).await?;
        convert::fetched_dev_environment(&target.project_scope(), summary)
    }

    /// Create a dev environment and return its full record.
    pub async fn create_dev_environment(
        &self,
        spec: &NewDevEnvironment,
    ) -> Result<DevEnvironment, CoreError> {
        if spec.ides.is_empty() {
            return Err(CoreError::validation(
                "a dev environment needs at least one IDE",
            ));
        }

        let request = CreateDevEnvironmentRequest {
            organization_name: spec.project.org.clone(),
            project_name: spec.project.project.clone(),
            ides: spec.ides.iter().map(Into::into).collect(),
            instance_type: spec.instance_type.clone(),
            persistent_storage: PersistentStorage {
                size_in_gi_b: Some(spec.storage_gib),
            },
            repositories: spec.repositories.iter().map(Into::into).collect(),
            alias: spec.alias.clone(),
            inactivity_timeout_minutes: spec.inactivity_timeout_minutes,
            client_token: Some(Uuid::new_v4().to_string()),
        };
        let resp = self.api().create_dev_environment(&request).await?;
        let id = require(resp.id, Operation::CreateDevEnvironment, "id")?;
        info!(project = %spec.project, %id, "created dev environment");

        self.get_dev_environment(&DevEnvironmentId::new(&spec.project, id))
            .await
    }

    /// Apply `changes` and return the updated record.
    pub async fn update_dev_environment(
        &self,
        target: &DevEnvironmentId,
        changes: &DevEnvironmentUpdate,
    ) -> Result<DevEnvironment, CoreError> {
        if changes.is_empty() {
            return Err(CoreError::validation("no dev environment changes given"));
        }

        let request = UpdateDevEnvironmentRequest {
            organization_name: target.org.clone(),
            project_name: target.project.clone(),
            id: target.id.clone(),
            alias: changes.alias.clone(),
            ides: changes
                .ides
                .as_ref()
                .map(|ides| ides.iter().map(Into::into).collect()),
            instance_type: changes.instance_type.clone(),
            inactivity_timeout_minutes: changes.inactivity_timeout_minutes,
            client_token: Some(Uuid::new_v4().to_string()),
        };
        let resp = self.api().update_dev_environment(&request).await?;
        require(resp.id, Operation::UpdateDevEnvironment, "id")?;
        self.get_dev_environment(target).await
    }

    pub async fn start_dev_environment(
        &self,
        target: &DevEnvironmentId,
    ) -> Result<DevEnvTransition, CoreError> {
        let resp = self.api().start_dev_environment(&env_request(target)).await?;
        info!(%target, "start requested");
        transition(Operation::StartDevEnvironment, resp)
    }

    pub async fn stop_dev_environment(
        &self,
        target: &DevEnvironmentId,
    ) -> Result<DevEnvTransition, CoreError> {
        let resp = self.api().stop_dev_environment(&env_request(target)).await?;
        info!(%target, "stop requested");
        transition(Operation::StopDevEnvironment, resp)
    }

    /// Delete a dev environment, returning its id.
    pub async fn delete_dev_environment(
        &self,
        target: &DevEnvironmentId,
    ) -> Result<String, CoreError> {
        let resp = self.api().delete_dev_environment(&env_request(target)).await?;
        let id = require(resp.id, Operation::DeleteDevEnvironment, "id")?;
        info!(%target, "deleted dev environment");
        Ok(id)
    }

    // ── Access tokens ────────────────────────────────────────────

    pub async fn create_access_token(
        &self,
        name: &str,
        expires_time: Option<DateTime<Utc>>,
    ) -> Result<AccessToken, CoreError> {
        let request = CreateAccessTokenRequest {
            name: name.to_owned(),
            expires_time,
        };
        let resp = self.api().create_access_token(&request).await?;
        let secret = require(resp.secret, Operation::CreateAccessToken, "secret")?;
        Ok(AccessToken {
            id: resp.access_token_id,
            name: resp.name.unwrap_or_else(|| name.to_owned()),
            secret: SecretString::from(secret),
            expires_time: resp.expires_time.or(expires_time),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────

async fn fetch_user_details<T: Transport>(
    api: &ApiClient<T>,
    id: &str,
) -> Result<UserDetails, CoreError> {
    let request = GetUserDetailsRequest {
        id: Some(id.to_owned()),
        user_name: None,
    };
    let resp = api.get_user_details(&request).await?;
    convert::user_details(resp)
}

fn env_request(target: &DevEnvironmentId) -> DevEnvironmentRequest {
    DevEnvironmentRequest {
        organization_name: target.org.clone(),
        project_name: target.project.clone(),
        id: target.id.clone(),
    }
}

fn transition(
    operation: Operation,
    resp: DevEnvironmentTransitionResponse,
) -> Result<DevEnvTransition, CoreError> {
    Ok(DevEnvTransition {
        id: require(resp.id, operation, "id")?,
        status: resp.status.map(DevEnvStatus::from),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Ide;
    use crate::testing::{FakeTransport, env_record, remote_error, secret, user_record};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn target() -> DevEnvironmentId {
        DevEnvironmentId::new(&ProjectScope::new("acme", "rocket"), "env-1")
    }

    fn identity_fake(identity: &'static str, version: &'static str) -> FakeTransport {
        FakeTransport::new(move |op, params| match op {
            Operation::VerifySession => Ok(json!({ "identity": identity })),
            Operation::GetUserDetails => {
                let id = params["id"].as_str().unwrap_or_default();
                Ok(user_record(id, version))
            }
            other => panic!("unexpected {other}"),
        })
    }

    // ── Identity ─────────────────────────────────────────────────

    #[tokio::test]
    async fn verify_session_caches_user_details() {
        let fake = identity_fake("u1", "1");
        let session = fake.session();
        session.set_credentials(secret("tok"), None).unwrap();
        assert!(!session.is_connected());

        let first = session.verify_session().await.unwrap();
        let second = session.verify_session().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.user_id, "u1");
        assert!(session.is_connected());
        assert_eq!(
            session.identity(),
            Some(Identity {
                id: "u1".into(),
                name: "u1-name".into()
            })
        );
        assert_eq!(fake.count(Operation::VerifySession), 2);
        assert_eq!(fake.count(Operation::GetUserDetails), 1);
    }

    #[tokio::test]
    async fn verify_session_rejects_a_different_principal() {
        let fake = identity_fake("u2", "1");
        let session = fake.session();
        session
            .set_credentials(secret("tok"), Some("u1".into()))
            .unwrap();

        let err = session.verify_session().await.unwrap_err();
        assert!(
            matches!(err, CoreError::IdentityMismatch { ref bound, ref returned } if bound == "u1" && returned == "u2"),
            "unexpected error: {err:?}"
        );
        assert_eq!(fake.count(Operation::GetUserDetails), 0);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn verify_session_requires_identity() {
        let fake = FakeTransport::new(|_, _| Ok(json!({})));
        let session = fake.session();

        let err = session.verify_session().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn unsupported_details_version_leaves_session_disconnected() {
        let fake = identity_fake("u1", "2");
        let session = fake.session();
        session.set_credentials(secret("tok"), None).unwrap();

        let err = session.verify_session().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn given_details_skip_the_lookup() {
        let fake = identity_fake("u1", "1");
        let session = fake.session();
        let details = convert::user_details(serde_json::from_value(user_record("u1", "1")).unwrap())
            .unwrap();

        session
            .set_credentials(secret("tok"), Some(details.clone().into()))
            .unwrap();
        assert!(session.is_connected());

        assert_eq!(session.verify_session().await.unwrap(), details);
        assert_eq!(fake.count(Operation::GetUserDetails), 0);
    }

    #[tokio::test]
    async fn set_credentials_replaces_the_binding() {
        let fake = identity_fake("u1", "1");
        let session = fake.session();
        assert!(!session.has_token());

        session.set_credentials(secret("first"), None).unwrap();
        session.verify_session().await.unwrap();
        assert_eq!(session.api().transport().token(), Some("first"));

        session.set_credentials(secret("second"), None).unwrap();
        assert_eq!(session.api().transport().token(), Some("second"));
        assert!(!session.is_connected(), "details belong to the old token");

        session.set_credentials(secret(""), None).unwrap();
        assert!(!session.has_token());
        assert_eq!(session.api().transport().token(), None);
    }

    // ── Dev environments ─────────────────────────────────────────

    #[tokio::test]
    async fn create_without_ides_fails_before_any_call() {
        let fake = FakeTransport::new(|op, _| panic!("unexpected {op}"));
        let session = fake.session();
        let spec = NewDevEnvironment::new(ProjectScope::new("acme", "rocket"), Vec::new());

        let err = session.create_dev_environment(&spec).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn create_fetches_the_new_record() {
        let fake = FakeTransport::new(|op, params| match op {
            Operation::CreateDevEnvironment => Ok(json!({ "id": "env-9" })),
            Operation::GetDevEnvironment => {
                assert_eq!(params["id"], "env-9");
                Ok(env_record("env-9", "PENDING"))
            }
            other => panic!("unexpected {other}"),
        });
        let session = fake.session();
        let mut spec = NewDevEnvironment::new(
            ProjectScope::new("acme", "rocket"),
            vec![Ide::named("VSCode")],
        );
        spec.alias = Some("scratch".into());

        let env = session.create_dev_environment(&spec).await.unwrap();
        assert_eq!(env.id, "env-9");
        assert_eq!(env.status, DevEnvStatus::Pending);

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        let (op, params) = &calls[0];
        assert_eq!(*op, Operation::CreateDevEnvironment);
        assert_eq!(params["ides"], json!([{ "name": "VSCode" }]));
        assert_eq!(params["persistentStorage"], json!({ "sizeInGiB": 16 }));
        assert_eq!(params["alias"], "scratch");
        assert!(params["clientToken"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn start_and_stop_report_transitions() {
        let fake = FakeTransport::new(|op, _| match op {
            Operation::StartDevEnvironment => Ok(json!({ "id": "env-1", "status": "STARTING" })),
            Operation::StopDevEnvironment => Ok(json!({ "id": "env-1" })),
            other => panic!("unexpected {other}"),
        });
        let session = fake.session();

        let started = session.start_dev_environment(&target()).await.unwrap();
        assert_eq!(started.status, Some(DevEnvStatus::Starting));
        let stopped = session.stop_dev_environment(&target()).await.unwrap();
        assert_eq!(stopped.id, "env-1");
        assert_eq!(stopped.status, None);
    }

    #[tokio::test]
    async fn update_without_changes_is_rejected() {
        let fake = FakeTransport::new(|op, _| panic!("unexpected {op}"));
        let session = fake.session();

        let err = session
            .update_dev_environment(&target(), &DevEnvironmentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn remote_errors_pass_through() {
        let fake = FakeTransport::new(|_, _| Err(remote_error(404, "ResourceNotFoundException")));
        let session = fake.session();

        let err = session.get_dev_environment(&target()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.remote().and_then(|e| e.request_id()), Some("req-fake"));
    }

    // ── Other operations ─────────────────────────────────────────

    #[tokio::test]
    async fn access_token_requires_secret() {
        let fake = FakeTransport::new(|_, _| Ok(json!({ "accessTokenId": "t-1" })));
        let session = fake.session();

        let err = session.create_access_token("ci", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref message } if message.contains("secret")));
    }

    #[tokio::test]
    async fn access_token_keeps_the_secret() {
        let fake = FakeTransport::new(|_, params| {
            assert_eq!(params["name"], "ci");
            Ok(json!({ "accessTokenId": "t-1", "secret": "s3cr3t" }))
        });
        let session = fake.session();

        let token = session.create_access_token("ci", None).await.unwrap();
        assert_eq!(token.id.as_deref(), Some("t-1"));
        assert_eq!(token.name, "ci");
        assert_eq!(token.secret.expose_secret(), "s3cr3t");
    }

    #[tokio::test]
    async fn clone_url_is_parsed() {
        let fake = FakeTransport::new(|_, _| {
            Ok(json!({ "https": "https://git.example.com/v1/acme/rocket/app" }))
        });
        let session = fake.session();
        let scope = ProjectScope::new("acme", "rocket").repo("app");

        let url = session.get_repo_clone_url(&scope).await.unwrap();
        assert_eq!(url.host_str(), Some("git.example.com"));
    }
}
