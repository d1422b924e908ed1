// cloudev-core: Sessions, resource listings and dev environment orchestration
// on top of cloudev-api.

pub mod config;
pub mod convert;
pub mod error;
pub mod lister;
pub mod model;
pub mod orchestrator;
pub mod paginate;
pub mod progress;
pub mod session;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_REGION, ServiceEndpoint};
pub use error::CoreError;

// Wire-level error carried inside `CoreError::Api`.
pub use cloudev_api::Error as ApiError;
pub use paginate::{Batches, Paginator, TryBatches, map_inner};
pub use progress::{NoProgress, ProgressReporter};
pub use session::Session;

// Cancellation for long-running operations.
pub use tokio_util::sync::CancellationToken;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccessToken, Branch, DevEnvRepository, DevEnvStatus, DevEnvTransition, DevEnvironment,
    DevEnvironmentId, DevEnvironmentUpdate, Identity, Ide, NewDevEnvironment, Org, OrgRef,
    Project, ProjectRef, ProjectScope, Repo, RepoRef, RepoScope, Resource, ResourceKind,
    UserDetails, UserRef,
};
