//! Direct message commands.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::MsgCommands;
use crate::commands::encode_component;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for direct-message subcommands.
pub struct MsgCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> MsgCommand<'a, S> {
    /// Creates a new message command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the message subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &MsgCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            MsgCommands::Conversations { limit } => {
                ApiRequest::get(format!("/conversations?limit={limit}"))
            }
            MsgCommands::List {
                conversation_id,
                limit,
            } => ApiRequest::get(format!(
                "/conversations/{}/messages?limit={limit}",
                encode_component(conversation_id)
            )),
            MsgCommands::Send { receiver_id, text } => ApiRequest::post("/messages").json(json!({
                "receiverId": receiver_id,
                "text": text.join(" "),
                "type": "TEXT",
            })),
            MsgCommands::MarkRead { conversation_id } => ApiRequest::post(format!(
                "/conversations/{}/mark-read",
                encode_component(conversation_id)
            )),
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}
