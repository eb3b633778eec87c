//! Account settings commands.

use std::io::Write;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::SettingsCommands;
use crate::commands::profile::parse_json_object;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for settings subcommands.
pub struct SettingsCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> SettingsCommand<'a, S> {
    /// Creates a new settings command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the settings subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &SettingsCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            SettingsCommands::Show => ApiRequest::get("/settings"),
            SettingsCommands::Update { json } => {
                ApiRequest::patch("/settings").json(parse_json_object(json)?)
            }
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}
