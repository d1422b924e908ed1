// Remote operation names.
//
// Every call is addressed by name (`POST {endpoint}/v1/{Operation}`), so the
// set of operations this client speaks is closed here.

use strum::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum Operation {
    VerifySession,
    GetUserDetails,
    ListOrganizations,
    GetOrganization,
    ListProjects,
    GetProject,
    ListSourceRepositories,
    ListSourceRepositoryBranches,
    GetSourceRepositoryCloneUrls,
    CreateSourceRepositoryBranch,
    ListDevEnvironments,
    GetDevEnvironment,
    CreateDevEnvironment,
    StartDevEnvironment,
    StopDevEnvironment,
    DeleteDevEnvironment,
    UpdateDevEnvironment,
    CreateAccessToken,
}

impl Operation {
    /// Path of this operation relative to the service endpoint.
    pub fn path(self) -> String {
        let name: &'static str = self.into();
        format!("v1/{name}")
    }

    /// Whether the operation is a paginated listing.
    pub fn is_listing(self) -> bool {
        matches!(
            self,
            Self::ListOrganizations
                | Self::ListProjects
                | Self::ListSourceRepositories
                | Self::ListSourceRepositoryBranches
                | Self::ListDevEnvironments
        )
    }
}
