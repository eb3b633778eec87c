//! x402 marketplace purchase flow.
//!
//! The buy endpoint answers `402 Payment Required` with a list of payment
//! requirements. The client picks the requirement for the preferred
//! network, has the signer turn it into a payment proof, and repeats the
//! request with the proof in the `X-PAYMENT` header.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::session::{ApiRequest, Session};
use crate::signer::Signer;

/// One entry of the `accepts` list in a 402 challenge.
///
/// Unknown fields are preserved so the full requirement reaches the signer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirement {
    /// Payment network identifier, e.g. `solana-devnet`.
    pub network: String,
    /// Maximum amount required, in atomic units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount_required: Option<String>,
    /// Payee address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_to: Option<String>,
    /// Asset identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Remaining challenge fields, passed through to the signer untouched.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PaymentChallenge {
    #[serde(default)]
    accepts: Vec<PaymentRequirement>,
}

/// Select the requirement matching `preferred`, falling back to the first
/// entry. The second element is true when the fallback was taken.
#[must_use]
pub fn select_requirement<'a>(
    accepts: &'a [PaymentRequirement],
    preferred: &str,
) -> Option<(&'a PaymentRequirement, bool)> {
    accepts
        .iter()
        .find(|r| r.network == preferred)
        .map(|r| (r, false))
        .or_else(|| accepts.first().map(|r| (r, true)))
}

impl<S: Signer> Session<S> {
    /// Buy a marketplace listing, driving the x402 flow if the endpoint
    /// demands payment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Payment`] on a malformed or empty challenge,
    /// and the usual session errors otherwise.
    pub async fn buy_listing(
        &self,
        listing_id: &str,
        preferred_network: &str,
    ) -> Result<Value, ClientError> {
        let request =
            ApiRequest::get(format!("/listings/{listing_id}/buy")).header("Accept", "application/json");
        let response = self.execute(&request).await?;

        if response.status() != StatusCode::PAYMENT_REQUIRED {
            return response.into_value();
        }

        let challenge: PaymentChallenge = serde_json::from_str(response.body())
            .map_err(|e| ClientError::Payment(format!("malformed payment challenge: {e}")))?;
        let Some((requirement, fallback)) =
            select_requirement(&challenge.accepts, preferred_network)
        else {
            return Err(ClientError::Payment(
                "no payment requirements returned".to_string(),
            ));
        };
        if fallback {
            warn!(
                preferred = preferred_network,
                using = %requirement.network,
                "preferred payment network unavailable"
            );
        }
        info!(network = %requirement.network, "creating x402 payment");

        let requirement_value = serde_json::to_value(requirement)
            .map_err(|e| ClientError::Payment(format!("unserializable requirement: {e}")))?;
        let header = self.signer().payment_header(&requirement_value).await?;

        let paid = ApiRequest::get(format!("/listings/{listing_id}/buy"))
            .header("Accept", "application/json")
            .header("X-PAYMENT", header);
        self.execute(&paid).await?.into_value()
    }
}
