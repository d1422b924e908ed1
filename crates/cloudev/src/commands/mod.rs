//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod branches;
pub mod config_cmd;
pub mod env;
pub mod list;
pub mod show;
pub mod token;
pub mod util;
pub mod whoami;

use cloudev_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => whoami::handle(session, global).await,
        Command::List(args) => list::handle(session, &args, global).await,
        Command::Show(args) => show::handle(session, args, global).await,
        Command::Branches(args) => branches::handle(session, args, global).await,
        Command::Env(args) => env::handle(session, args, global).await,
        Command::Token(args) => token::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "does not take a session".into(),
        }),
    }
}
