//! Notification commands.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::NotificationCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for notification subcommands.
pub struct NotificationsCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> NotificationsCommand<'a, S> {
    /// Creates a new notifications command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the notification subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &NotificationCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            NotificationCommands::List { limit } => {
                ApiRequest::get(format!("/notifications?limit={limit}"))
            }
            NotificationCommands::Read { ids, all } => {
                let body = if *all {
                    json!({ "markAllAsRead": true })
                } else if ids.is_empty() {
                    return Err(CliError::InvalidArgument(
                        "pass notification IDs or --all".to_string(),
                    ));
                } else {
                    json!({ "notificationIds": ids })
                };
                ApiRequest::patch("/notifications").json(body)
            }
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}
