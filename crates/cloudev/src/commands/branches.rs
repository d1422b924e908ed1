//! Branch command handlers.

use tabled::Tabled;

use cloudev_core::{Branch, ProjectScope, RepoScope, Session};

use crate::cli::{BranchesArgs, BranchesCommand, GlobalOpts, RepoTarget};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BranchRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    head: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Branch> for BranchRow {
    fn from(b: &Branch) -> Self {
        Self {
            name: b.name.clone(),
            head: b.head_commit_id.clone().unwrap_or_default(),
            updated: util::format_time(b.last_updated_time.as_ref()),
        }
    }
}

fn scope(repo: RepoTarget) -> RepoScope {
    ProjectScope::new(repo.org, repo.project).repo(repo.repo)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: BranchesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BranchesCommand::List(repo) => {
            let mut branches = util::collect(session.list_branches(&scope(repo))).await;
            branches.sort_by(|a, b| a.name.cmp(&b.name));
            let out = output::render_list(&global.output, &branches, |b| BranchRow::from(b), |b| {
                b.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Create { repo, name, head } => {
            let branch = session
                .create_source_branch(&scope(repo), &name, head.as_deref())
                .await?;
            if !global.quiet {
                eprintln!("✓ Branch '{}' created", branch.name);
            }
            let out = output::render_single(
                &global.output,
                &branch,
                |b| {
                    output::detail_lines(&[
                        ("Name", Some(b.name.clone())),
                        ("Ref", Some(b.id.clone())),
                        ("Head", b.head_commit_id.clone()),
                    ])
                },
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
