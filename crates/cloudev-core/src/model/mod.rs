// ── Domain model ──
//
// Records handed to consumers. They are built from the wire summaries in
// `cloudev_api::types` by `crate::convert`, with parents referenced by name
// only.

pub mod dev_env;
pub mod resource;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use dev_env::{
    DevEnvRepository, DevEnvStatus, DevEnvTransition, DevEnvironment, DevEnvironmentId,
    DevEnvironmentUpdate, Ide, NewDevEnvironment,
};
pub use resource::{
    Branch, Org, OrgRef, Project, ProjectRef, ProjectScope, Repo, RepoRef, RepoScope, Resource,
    ResourceKind,
};
pub use user::{AccessToken, Identity, SUPPORTED_USER_DETAILS_VERSION, UserDetails, UserRef};
