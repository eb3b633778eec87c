//! User commands: lookup and follow graph.

use std::io::Write;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::UserCommands;
use crate::commands::encode_component;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for user subcommands.
pub struct UserCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> UserCommand<'a, S> {
    /// Creates a new user command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the user subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &UserCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            UserCommands::Show { handle } => {
                ApiRequest::get(format!("/users/{}", encode_component(handle)))
            }
            UserCommands::Follow { handle } => {
                ApiRequest::post(format!("/users/{}/follow", encode_component(handle)))
            }
            UserCommands::Unfollow { handle } => {
                ApiRequest::delete(format!("/users/{}/follow", encode_component(handle)))
            }
            UserCommands::Followers { handle, limit } => {
                ApiRequest::get(graph_path("followers", handle.as_deref(), *limit))
            }
            UserCommands::Following { handle, limit } => {
                ApiRequest::get(graph_path("following", handle.as_deref(), *limit))
            }
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}

/// Follow-graph path; without a handle the server's `me` alias is used.
fn graph_path(relation: &str, handle: Option<&str>, limit: u32) -> String {
    match handle {
        Some(handle) => format!(
            "/users/{}/{relation}?limit={limit}",
            encode_component(handle)
        ),
        None => format!("/users/by-id/me/{relation}?limit={limit}"),
    }
}
