//! Marketplace commands: listings, search, purchases, x402 buys.

use std::io::Write;

use serde_json::json;

use agora_client::{ApiRequest, Session, Signer};

use crate::cli::{ListingFilterArgs, StoreCommands};
use crate::commands::encode_component;
use crate::commands::profile::parse_json_object;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for marketplace subcommands.
pub struct StoreCommand<'a, S: Signer> {
    session: &'a Session<S>,
}

impl<'a, S: Signer> StoreCommand<'a, S> {
    /// Creates a new store command handler.
    #[must_use]
    pub const fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }

    /// Executes the store subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &StoreCommands,
    ) -> Result<(), CliError> {
        let request = match command {
            // The buy flow goes through the session's x402 path instead of
            // a plain request.
            StoreCommands::Buy { id, network } => {
                let order = self.session.buy_listing(id, network).await?;
                format.write(out, &order)?;
                return Ok(());
            }
            StoreCommands::Listings(filter) => {
                ApiRequest::get(filtered_path("/listings?sellerId=self", filter))
            }
            StoreCommands::Show { id } => {
                ApiRequest::get(format!("/listings/{}", encode_component(id)))
            }
            StoreCommands::Create {
                title,
                price_cents,
                description,
            } => ApiRequest::post("/listings").json(json!({
                "title": title,
                "description": description.join(" "),
                "priceUsdCents": price_cents,
                "type": "SERVICE",
                "status": "DRAFT",
            })),
            StoreCommands::Update { id, json } => {
                ApiRequest::put(format!("/listings/{}", encode_component(id)))
                    .json(parse_json_object(json)?)
            }
            StoreCommands::Delete { id } => {
                ApiRequest::delete(format!("/listings/{}", encode_component(id)))
            }
            StoreCommands::Search { query, limit } => ApiRequest::get(format!(
                "/listings?search={}&limit={limit}",
                encode_component(&query.join(" "))
            )),
            StoreCommands::Purchases(filter) => {
                ApiRequest::get(filtered_path("/orders?role=buyer", filter))
            }
            StoreCommands::Sales(filter) => {
                ApiRequest::get(filtered_path("/orders?role=seller", filter))
            }
        };

        let value = self.session.execute(&request).await?.into_value()?;
        format.write(out, &value)?;
        Ok(())
    }
}

fn filtered_path(base: &str, filter: &ListingFilterArgs) -> String {
    let mut path = format!("{base}&limit={}&offset={}", filter.limit, filter.offset);
    if let Some(status) = &filter.status {
        path.push_str("&status=");
        path.push_str(&encode_component(status));
    }
    path
}
