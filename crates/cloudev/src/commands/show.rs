//! `cloudev show org|project|clone-url`

use cloudev_core::{Org, Project, ProjectScope, RepoScope, Session};

use crate::cli::{GlobalOpts, ShowArgs, ShowCommand};
use crate::error::CliError;
use crate::output;

fn org_detail(org: &Org) -> String {
    output::detail_lines(&[
        ("Name", Some(org.name.clone())),
        ("Display name", org.display_name.clone()),
        ("Description", org.description.clone()),
        ("Region", org.region_name.clone()),
        ("ID", Some(org.id.clone()).filter(|id| !id.is_empty())),
    ])
}

fn project_detail(project: &Project) -> String {
    output::detail_lines(&[
        ("Name", Some(project.name.clone())),
        ("Organization", Some(project.org.name.clone())),
        ("Display name", project.display_name.clone()),
        ("Description", project.description.clone()),
    ])
}

pub async fn handle(session: &Session, args: ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        ShowCommand::Org { name } => {
            let org = session.get_org(&name).await?;
            output::render_single(&global.output, &org, org_detail, |o| o.name.clone())
        }
        ShowCommand::Project { org, project } => {
            let project = session.get_project(&ProjectScope::new(org, project)).await?;
            output::render_single(&global.output, &project, project_detail, |p| {
                p.scope().to_string()
            })
        }
        ShowCommand::CloneUrl(repo) => {
            let scope = ProjectScope::new(repo.org, repo.project).repo(repo.repo);
            let url = clone_url(session, &scope).await?;
            output::render_single(&global.output, &url, Clone::clone, Clone::clone)
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn clone_url(session: &Session, scope: &RepoScope) -> Result<String, CliError> {
    Ok(session.get_repo_clone_url(scope).await?.to_string())
}
