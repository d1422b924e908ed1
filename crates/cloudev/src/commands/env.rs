//! Dev environment command handlers.

use tabled::Tabled;

use cloudev_core::{
    CancellationToken, DevEnvStatus, DevEnvTransition, DevEnvironment, DevEnvironmentId,
    DevEnvironmentUpdate, Ide, NewDevEnvironment, ProjectScope, Session,
};

use crate::cli::{EnvArgs, EnvCommand, EnvTarget, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::progress::Spinner;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EnvRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "IDEs")]
    ides: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

fn ide_names(env: &DevEnvironment) -> String {
    env.ides
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&DevEnvironment> for EnvRow {
    fn from(e: &DevEnvironment) -> Self {
        Self {
            id: e.id.clone(),
            alias: e.alias.clone().unwrap_or_default(),
            status: e.status.to_string(),
            instance: e.instance_type.clone().unwrap_or_default(),
            ides: ide_names(e),
            updated: util::format_time(e.last_updated_time.as_ref()),
        }
    }
}

fn detail(e: &DevEnvironment) -> String {
    let repos = e
        .repositories
        .iter()
        .map(|r| match r.branch {
            Some(ref b) => format!("{}@{b}", r.name),
            None => r.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_lines(&[
        ("ID", Some(e.id.clone())),
        ("Project", Some(format!("{}/{}", e.org.name, e.project.name))),
        ("Alias", e.alias.clone()),
        ("Status", Some(e.status.to_string())),
        ("Reason", e.status_reason.clone()),
        ("Instance", e.instance_type.clone()),
        ("Storage", e.storage_gib.map(|g| format!("{g} GiB"))),
        (
            "Idle stop",
            e.inactivity_timeout_minutes.map(|m| format!("{m} min")),
        ),
        ("IDEs", Some(ide_names(e))),
        ("Repos", Some(repos).filter(|r| !r.is_empty())),
        ("Creator", e.creator_id.clone()),
        (
            "Updated",
            e.last_updated_time.map(|t| t.to_rfc3339()),
        ),
    ])
}

fn target_id(target: EnvTarget) -> DevEnvironmentId {
    DevEnvironmentId::new(&ProjectScope::new(target.org, target.project), target.id)
}

fn print_env(env: &DevEnvironment, global: &GlobalOpts) {
    let out = output::render_single(&global.output, env, detail, |e| e.id.clone());
    output::print_output(&out, global.quiet);
}

fn print_transition(verb: &str, transition: &DevEnvTransition, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    match transition.status {
        Some(ref status) => eprintln!("✓ {verb} {} ({status})", transition.id),
        None => eprintln!("✓ {verb} {}", transition.id),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: EnvArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EnvCommand::List { org, project } => {
            let scope = ProjectScope::new(org, project);
            let envs = util::collect(session.list_dev_environments(&scope)).await;
            let out = output::render_list(&global.output, &envs, |e| EnvRow::from(e), |e| e.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EnvCommand::Get(target) => {
            let env = session.get_dev_environment(&target_id(target)).await?;
            print_env(&env, global);
            Ok(())
        }

        EnvCommand::Start { target, no_wait } => {
            let target = target_id(target);
            if no_wait {
                let transition = session.start_dev_environment(&target).await?;
                print_transition("Start requested for", &transition, global);
                return Ok(());
            }
            let env = start_and_wait(session, &target, global).await?;
            print_env(&env, global);
            Ok(())
        }

        EnvCommand::Stop(target) => {
            let transition = session.stop_dev_environment(&target_id(target)).await?;
            print_transition("Stop requested for", &transition, global);
            Ok(())
        }

        EnvCommand::Delete(target) => {
            let target = target_id(target);
            if !util::confirm(
                &format!("Delete dev environment {target}? Its storage is lost."),
                "env delete",
                global.yes,
            )? {
                return Ok(());
            }
            let id = session.delete_dev_environment(&target).await?;
            if !global.quiet {
                eprintln!("✓ Deleted {id}");
            }
            Ok(())
        }

        EnvCommand::Create {
            org,
            project,
            ides,
            instance_type,
            storage,
            repos,
            alias,
            inactivity_timeout,
        } => {
            let mut spec = NewDevEnvironment::new(
                ProjectScope::new(org, project),
                ides.into_iter().map(Ide::named).collect(),
            );
            if let Some(instance_type) = instance_type {
                spec.instance_type = instance_type;
            }
            if let Some(storage) = storage {
                spec.storage_gib = storage;
            }
            spec.repositories = repos
                .iter()
                .map(|r| util::parse_repository(r))
                .collect::<Result<_, _>>()?;
            spec.alias = alias;
            spec.inactivity_timeout_minutes = inactivity_timeout;

            let env = session.create_dev_environment(&spec).await?;
            if !global.quiet {
                eprintln!("✓ Created {}", env.id);
            }
            print_env(&env, global);
            Ok(())
        }

        EnvCommand::Update {
            target,
            alias,
            ides,
            instance_type,
            inactivity_timeout,
        } => {
            let changes = DevEnvironmentUpdate {
                alias,
                ides: (!ides.is_empty()).then(|| ides.into_iter().map(Ide::named).collect()),
                instance_type,
                inactivity_timeout_minutes: inactivity_timeout,
            };
            let env = session
                .update_dev_environment(&target_id(target), &changes)
                .await?;
            print_env(&env, global);
            Ok(())
        }
    }
}

/// Drive the environment to RUNNING behind a spinner. Ctrl-C stops waiting.
async fn start_and_wait(
    session: &Session,
    target: &DevEnvironmentId,
    global: &GlobalOpts,
) -> Result<DevEnvironment, CliError> {
    let spinner = Spinner::new(global.quiet);
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = session
        .start_dev_environment_with_progress(target, &DevEnvStatus::Running, &spinner, &cancel)
        .await;
    interrupt.abort();

    match outcome {
        Ok(Some(env)) => {
            spinner.finish(&format!("{} is running", env.name()));
            Ok(env)
        }
        Ok(None) if cancel.is_cancelled() => {
            spinner.clear();
            Err(CliError::Interrupted)
        }
        Ok(None) => Err(CliError::StartTimeout {
            id: target.id.clone(),
            seconds: session.config().start_timeout.as_secs(),
        }),
        Err(e) => {
            spinner.clear();
            Err(e.into())
        }
    }
}
