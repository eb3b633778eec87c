//! Profile commands: show, update, avatar upload.

use std::io::Write;
use std::path::Path;

use serde_json::{Value, json};

use agora_client::{ApiRequest, FilePart, Session, Signer};

use crate::cli::ProfileCommands;
use crate::commands::encode_component;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for profile subcommands.
pub struct ProfileCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> ProfileCommand<'a, S> {
    /// Creates a new profile command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the profile subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &ProfileCommands,
    ) -> Result<(), CliError> {
        match command {
            ProfileCommands::Show { handle } => self.show(out, format, handle.as_deref()).await,
            ProfileCommands::Update { json } => self.update(out, format, json).await,
            ProfileCommands::Avatar { file } => self.avatar(out, format, file).await,
        }
    }

    async fn show<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        handle: Option<&str>,
    ) -> Result<(), CliError> {
        let path = match handle {
            Some(handle) => format!("/profile?handle={}", encode_component(handle)),
            None => "/profile?self=true".to_string(),
        };
        let value = self.session.execute(&ApiRequest::get(path)).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }

    async fn update<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        fields: &str,
    ) -> Result<(), CliError> {
        let body = parse_json_object(fields)?;
        let value = self
            .session
            .execute(&ApiRequest::patch("/profile").json(body))
            .await?
            .into_value()?;
        format.write(out, &value)?;
        Ok(())
    }

    /// Upload an avatar image and point the profile at the uploaded URL.
    async fn avatar<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        file: &Path,
    ) -> Result<(), CliError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("avatar")
            .to_string();
        let mime = mime_for(file).to_string();

        let upload = ApiRequest::post("/upload/avatar").file(FilePart {
            field: "file".to_string(),
            file_name,
            mime,
            bytes,
        });
        let uploaded = self.session.execute(&upload).await?.into_value()?;
        let Some(avatar_url) = uploaded.get("url").and_then(Value::as_str) else {
            return Err(CliError::Command(
                "upload succeeded but returned no url".to_string(),
            ));
        };

        let profile = self
            .session
            .execute(&ApiRequest::patch("/profile").json(json!({ "avatarUrl": avatar_url })))
            .await?
            .into_value()?;

        format.write(
            out,
            &json!({
                "success": true,
                "avatarUrl": avatar_url,
                "profile": profile,
            }),
        )?;
        Ok(())
    }
}

/// Parse a caller-supplied JSON object argument.
pub(crate) fn parse_json_object(raw: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::InvalidArgument(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(CliError::InvalidArgument(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
