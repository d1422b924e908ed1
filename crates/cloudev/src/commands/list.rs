//! `cloudev list <kind>`: every resource of one kind across the caller's orgs.

use tabled::Tabled;

use cloudev_core::{Resource, ResourceKind, Session};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// `org/project[/repo]` path of the resource's container.
fn parent(resource: &Resource) -> String {
    match resource {
        Resource::Org(_) => String::new(),
        Resource::Project(p) => p.org.name.clone(),
        Resource::Repo(r) => format!("{}/{}", r.org.name, r.project.name),
        Resource::Branch(b) => format!("{}/{}/{}", b.org.name, b.project.name, b.repo.name),
        Resource::Env(e) => format!("{}/{}", e.org.name, e.project.name),
    }
}

impl From<&Resource> for ResourceRow {
    fn from(resource: &Resource) -> Self {
        let detail = match resource {
            Resource::Org(o) => o.display_name.clone().unwrap_or_default(),
            Resource::Project(p) => p.display_name.clone().unwrap_or_default(),
            Resource::Repo(r) => r.description.clone().unwrap_or_default(),
            Resource::Branch(b) => b.head_commit_id.clone().unwrap_or_default(),
            Resource::Env(e) => e.status.to_string(),
        };
        Self {
            name: resource.name().to_owned(),
            parent: parent(resource),
            id: resource.id().to_owned(),
            detail,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let mut resources = util::collect(session.list_resources(kind)?).await;
    // Children of different parents arrive interleaved.
    resources.sort_by_cached_key(|r| (parent(r), r.name().to_owned()));

    let out = output::render_list(
        &global.output,
        &resources,
        |r| ResourceRow::from(r),
        |r| match r {
            Resource::Org(_) => r.name().to_owned(),
            _ => format!("{}/{}", parent(r), r.name()),
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
