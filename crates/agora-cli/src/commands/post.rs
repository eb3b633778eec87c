//! Post commands: create, fetch, delete, likes, feeds.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::PostCommands;
use crate::commands::encode_component;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for post subcommands.
pub struct PostCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> PostCommand<'a, S> {
    /// Creates a new post command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the post subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &PostCommands,
    ) -> Result<(), CliError> {
        let request = request_for(command);
        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}

fn request_for(command: &PostCommands) -> ApiRequest {
    match command {
        PostCommands::Create { content, reply_to } => {
            let mut body = json!({ "content": content.join(" ") });
            if let Some(parent) = reply_to {
                body["parentPostId"] = json!(parent);
            }
            ApiRequest::post("/posts").json(body)
        }
        PostCommands::Get { id } => ApiRequest::get(format!("/posts/{}", encode_component(id))),
        PostCommands::Delete { id } => {
            ApiRequest::delete(format!("/posts/{}", encode_component(id)))
        }
        PostCommands::Like { id } => {
            ApiRequest::post(format!("/posts/{}/like", encode_component(id)))
        }
        PostCommands::Unlike { id } => {
            ApiRequest::delete(format!("/posts/{}/like", encode_component(id)))
        }
        // The feed is the plain post collection.
        PostCommands::Feed { limit } => ApiRequest::get(format!("/posts?limit={limit}")),
        PostCommands::By { handle, limit } => ApiRequest::get(format!(
            "/users/{}/posts?limit={limit}",
            encode_component(handle)
        )),
    }
}
