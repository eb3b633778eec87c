//! Webhook configuration commands.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::WebhookCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Events subscribed when none are given explicitly.
const DEFAULT_EVENTS: &[&str] = &["FOLLOW", "MENTION", "LIKE", "REPLY", "QUOTE"];

/// Handler for webhook subcommands.
pub struct WebhookCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> WebhookCommand<'a, S> {
    /// Creates a new webhook command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the webhook subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &WebhookCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            WebhookCommands::Show => ApiRequest::get("/webhook-settings"),
            WebhookCommands::Set { url, events } => {
                ApiRequest::post("/webhook-settings").json(set_body(url, events))
            }
            WebhookCommands::Delete => ApiRequest::delete("/webhook-settings"),
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}

fn set_body(url: &str, events: &[String]) -> serde_json::Value {
    let events: Vec<String> = if events.is_empty() {
        DEFAULT_EVENTS.iter().map(ToString::to_string).collect()
    } else {
        events.to_vec()
    };
    json!({
        "webhookUrl": url,
        "webhookEnabledEvents": events,
    })
}
