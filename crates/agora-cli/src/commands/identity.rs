//! Linked identity commands.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::IdentityCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for identity subcommands.
pub struct IdentityCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> IdentityCommand<'a, S> {
    /// Creates a new identity command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the identity subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &IdentityCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            IdentityCommands::List => ApiRequest::get("/auth/identities"),
            IdentityCommands::Add {
                did,
                timestamp,
                nonce,
                signature,
            } => {
                let timestamp: i64 = timestamp.parse().map_err(|_| {
                    CliError::InvalidArgument(format!(
                        "timestamp must be a millisecond integer, got '{timestamp}'"
                    ))
                })?;
                ApiRequest::post("/auth/add").json(json!({
                    "did": did,
                    "timestamp": timestamp,
                    "nonce": nonce,
                    "signature": signature,
                }))
            }
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}
