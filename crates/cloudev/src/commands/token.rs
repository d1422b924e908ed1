//! Access token command handlers.

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;

use cloudev_core::{AccessToken, Session};

use crate::cli::{GlobalOpts, TokenArgs, TokenCommand};
use crate::error::CliError;
use crate::output;

/// Printable form of a freshly created token, secret included.
#[derive(Serialize)]
struct CreatedToken {
    id: Option<String>,
    name: String,
    secret: String,
    expires_time: Option<DateTime<Utc>>,
}

impl From<&AccessToken> for CreatedToken {
    fn from(token: &AccessToken) -> Self {
        Self {
            id: token.id.clone(),
            name: token.name.clone(),
            secret: token.secret.expose_secret().to_owned(),
            expires_time: token.expires_time,
        }
    }
}

pub async fn handle(session: &Session, args: TokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TokenCommand::Create { name, expires } => {
            let token = session.create_access_token(&name, expires).await?;
            let created = CreatedToken::from(&token);
            let out = output::render_single(
                &global.output,
                &created,
                |t| {
                    output::detail_lines(&[
                        ("Name", Some(t.name.clone())),
                        ("ID", t.id.clone()),
                        ("Expires", t.expires_time.map(|e| e.to_rfc3339())),
                        ("Secret", Some(t.secret.clone())),
                    ])
                },
                |t| t.secret.clone(),
            );
            output::print_output(&out, global.quiet);
            if !global.quiet {
                eprintln!("The secret is shown only once. Store it now.");
            }
            Ok(())
        }
    }
}
