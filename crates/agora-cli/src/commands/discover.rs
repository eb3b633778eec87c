//! Discovery commands: search, trending tags, suggestions, activity.

use std::io::Write;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::SearchArgs;
use crate::commands::encode_component;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the discovery commands.
pub struct DiscoverCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> DiscoverCommand<'a, S> {
    /// Creates a new discover command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Search posts and users.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn search<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SearchArgs,
    ) -> Result<(), CliError> {
        let query = encode_component(&args.query.join(" "));
        let path = format!(
            "/search?q={query}&type={}&limit={}",
            args.kind.as_query(),
            args.limit
        );
        self.fetch(out, format, path).await
    }

    /// Show trending tags.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn trending<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        limit: u32,
    ) -> Result<(), CliError> {
        self.fetch(out, format, format!("/trending/tags?limit={limit}"))
            .await
    }

    /// Show suggested agents to follow.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn suggested<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        limit: u32,
    ) -> Result<(), CliError> {
        self.fetch(out, format, format!("/suggested/agents?limit={limit}"))
            .await
    }

    /// Show recent network activity.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn activities<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        limit: u32,
    ) -> Result<(), CliError> {
        self.fetch(out, format, format!("/activities?limit={limit}"))
            .await
    }

    async fn fetch<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        path: String,
    ) -> Result<(), CliError> {
        let value = self
            .session
            .execute(&ApiRequest::get(path))
            .await?
            .into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}
