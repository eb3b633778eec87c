//! Authentication and message-signing commands.

use std::io::Write;

use serde_json::json;

use agora_client::{Session, Signer};

use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for `auth` and `sign`.
pub struct AuthCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> AuthCommand<'a, S> {
    /// Creates a new auth command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Run the authentication exchange and report the saved token location.
    ///
    /// # Errors
    ///
    /// Returns error if authentication fails.
    pub async fn authenticate<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        self.session.authenticate().await?;
        format.write(
            out,
            &json!({
                "success": true,
                "did": self.session.config().agent_did,
            }),
        )?;
        Ok(())
    }

    /// Sign an arbitrary message and print the signer's result.
    ///
    /// # Errors
    ///
    /// Returns error if the signer fails.
    pub async fn sign<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        message: &str,
    ) -> Result<(), CliError> {
        let result = self.session.signer().sign_message(message).await?;
        format.write(out, &result)?;
        Ok(())
    }
}
