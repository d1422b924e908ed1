// ── Resource listings ──
//
// Typed listings over `Paginator`, and `list_resources`, which enumerates a
// kind by walking its parent kind and listing beneath each parent.
// Listings are fail-soft: a remote error ends the listing with whatever was
// already yielded.

use cloudev_api::types::{
    ListDevEnvironmentsRequest, ListOrganizationsRequest, ListProjectsRequest,
    ListSourceRepositoriesRequest, ListSourceRepositoryBranchesRequest,
};
use cloudev_api::{Operation, Transport};
use futures_util::stream::{self, StreamExt};

use crate::convert;
use crate::error::CoreError;
use crate::model::{
    Branch, DevEnvironment, Org, Project, ProjectScope, Repo, RepoScope, Resource, ResourceKind,
};
use crate::paginate::{Batches, Paginator, map_inner};
use crate::session::Session;

impl<T: Transport> Session<T> {
    pub fn list_orgs(&self) -> Batches<Org> {
        let request = ListOrganizationsRequest {
            next_token: None,
            max_results: self.config().page_size,
        };
        let session = self.clone();
        Paginator::new(Operation::ListOrganizations, request, move |req: ListOrganizationsRequest| {
            let api = session.api();
            async move { api.list_organizations(&req).await }
        })
        .pages()
        .map(|batch| batch.into_iter().map(Org::from).collect())
        .boxed()
    }

    pub fn list_projects(&self, org: &str) -> Batches<Project> {
        let request = ListProjectsRequest {
            organization_name: org.to_owned(),
            next_token: None,
            max_results: self.config().page_size,
        };
        let session = self.clone();
        let org = org.to_owned();
        Paginator::new(Operation::ListProjects, request, move |req: ListProjectsRequest| {
            let api = session.api();
            async move { api.list_projects(&req).await }
        })
        .pages()
        .map(move |batch| {
            batch
                .into_iter()
                .map(|s| convert::project(&org, s))
                .collect()
        })
        .boxed()
    }

    pub fn list_source_repositories(&self, scope: &ProjectScope) -> Batches<Repo> {
        let request = ListSourceRepositoriesRequest {
            organization_name: scope.org.clone(),
            project_name: scope.project.clone(),
            next_token: None,
            max_results: self.config().page_size,
        };
        let session = self.clone();
        let scope = scope.clone();
        Paginator::new(Operation::ListSourceRepositories, request, move |req: ListSourceRepositoriesRequest| {
            let api = session.api();
            async move { api.list_source_repositories(&req).await }
        })
        .pages()
        .map(move |batch| {
            batch
                .into_iter()
                .map(|s| convert::repo(&scope, s))
                .collect()
        })
        .boxed()
    }

    pub fn list_dev_environments(&self, scope: &ProjectScope) -> Batches<DevEnvironment> {
        let request = ListDevEnvironmentsRequest {
            organization_name: scope.org.clone(),
            project_name: scope.project.clone(),
            next_token: None,
            max_results: self.config().page_size,
        };
        let session = self.clone();
        let scope = scope.clone();
        Paginator::new(Operation::ListDevEnvironments, request, move |req: ListDevEnvironmentsRequest| {
            let api = session.api();
            async move { api.list_dev_environments(&req).await }
        })
        .pages()
        .map(move |batch| {
            batch
                .into_iter()
                .map(|s| convert::dev_environment(&scope, s))
                .collect()
        })
        .boxed()
    }

    /// Branches of one repository. There is no cross-repository branch
    /// listing; see [`list_resources`](Self::list_resources).
    pub fn list_branches(&self, scope: &RepoScope) -> Batches<Branch> {
        let request = ListSourceRepositoryBranchesRequest {
            organization_name: scope.org.clone(),
            project_name: scope.project.clone(),
            source_repository_name: scope.repo.clone(),
            next_token: None,
            max_results: self.config().page_size,
        };
        let session = self.clone();
        let scope = scope.clone();
        Paginator::new(Operation::ListSourceRepositoryBranches, request, move |req: ListSourceRepositoryBranchesRequest| {
            let api = session.api();
            async move { api.list_source_repository_branches(&req).await }
        })
        .pages()
        .map(move |batch| {
            batch
                .into_iter()
                .map(|s| convert::branch(&scope, s))
                .collect()
        })
        .boxed()
    }

    /// Every resource of `kind` visible to the session.
    ///
    /// Projects are listed per organization, repositories and dev
    /// environments per project. Batches from different parents may arrive
    /// in any order. Branches are not enumerable this way.
    pub fn list_resources(&self, kind: ResourceKind) -> Result<Batches<Resource>, CoreError> {
        match kind {
            ResourceKind::Org => Ok(tagged(self.list_orgs(), Resource::Org)),
            ResourceKind::Project => self.list_beneath(ResourceKind::Org, kind),
            ResourceKind::Repo | ResourceKind::Env => self.list_beneath(ResourceKind::Project, kind),
            ResourceKind::Branch => Err(CoreError::Unsupported {
                operation: "listing branches across all repositories".into(),
            }),
        }
    }

    fn list_beneath(
        &self,
        parent: ResourceKind,
        kind: ResourceKind,
    ) -> Result<Batches<Resource>, CoreError> {
        let parents = self.list_resources(parent)?;
        let session = self.clone();
        Ok(map_inner(parents, move |parent| session.children(&parent, kind)))
    }

    /// One listing step down from `parent`.
    fn children(&self, parent: &Resource, kind: ResourceKind) -> Batches<Resource> {
        match (parent, kind) {
            (Resource::Org(org), ResourceKind::Project) => {
                tagged(self.list_projects(&org.name), Resource::Project)
            }
            (Resource::Project(project), ResourceKind::Repo) => tagged(
                self.list_source_repositories(&project.scope()),
                Resource::Repo,
            ),
            (Resource::Project(project), ResourceKind::Env) => tagged(
                self.list_dev_environments(&project.scope()),
                Resource::Env,
            ),
            _ => stream::empty().boxed(),
        }
    }
}

fn tagged<R: Send + 'static>(
    batches: Batches<R>,
    tag: fn(R) -> Resource,
) -> Batches<Resource> {
    batches
        .map(move |batch| batch.into_iter().map(tag).collect())
        .boxed()
}
