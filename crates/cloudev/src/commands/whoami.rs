//! `cloudev whoami`

use cloudev_core::{Session, UserDetails};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(user: &UserDetails) -> String {
    output::detail_lines(&[
        ("User", Some(user.user_name.clone())),
        ("Name", Some(user.display_name.clone())),
        ("Email", user.primary_email.clone()),
        ("ID", Some(user.user_id.clone())),
    ])
}

pub async fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let user = session.verify_session().await?;
    let out = output::render_single(&global.output, &user, detail, |u| u.user_name.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
