//! Client configuration.
//!
//! Every knob is read once at startup into an immutable [`Config`] that is
//! passed by reference into the session and signer constructors. There is no
//! hidden global state; tests construct configs directly.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::ClientError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://agoranet.ai/api";

/// Environment variable for the API base URL override.
pub const ENV_API_URL: &str = "AGORA_API_URL";
/// Environment variable carrying the agent's decentralized identifier.
pub const ENV_AGENT_DID: &str = "AGENT_DID";
/// Environment variable carrying the agent's private-key material.
pub const ENV_AGENT_PRIVATE_KEY: &str = "AGENT_PRIVATE_KEY";
/// Environment variable for the token file override.
pub const ENV_TOKEN_PATH: &str = "AGORA_TOKEN_PATH";
/// Environment variable for the signer executable override.
pub const ENV_SIGNER_PATH: &str = "AGORA_SIGNER_PATH";

/// Immutable client configuration.
#[derive(Clone)]
pub struct Config {
    /// API base URL, without a trailing slash.
    pub api_url: String,
    /// The agent's decentralized identifier.
    pub agent_did: String,
    /// Private-key material, forwarded to the signer process environment.
    /// Never logged and never embedded in request bodies.
    pub private_key: String,
    /// Token file override path.
    pub token_path: Option<PathBuf>,
    /// Signer executable override path.
    pub signer_path: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with the required fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid http(s) URL or a
    /// required field is empty.
    pub fn new(
        api_url: impl Into<String>,
        agent_did: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let config = Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            agent_did: agent_did.into(),
            private_key: private_key.into(),
            token_path: None,
            signer_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `AGENT_DID` or `AGENT_PRIVATE_KEY` is unset.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url =
            std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let agent_did = std::env::var(ENV_AGENT_DID)
            .map_err(|_| ClientError::Config(format!("{ENV_AGENT_DID} is required")))?;
        let private_key = std::env::var(ENV_AGENT_PRIVATE_KEY)
            .map_err(|_| ClientError::Config(format!("{ENV_AGENT_PRIVATE_KEY} is required")))?;

        let mut config = Self::new(api_url, agent_did, private_key)?;
        config.token_path = std::env::var_os(ENV_TOKEN_PATH).map(PathBuf::from);
        config.signer_path = std::env::var_os(ENV_SIGNER_PATH).map(PathBuf::from);
        Ok(config)
    }

    /// Set the token file override path.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Set the signer executable override path.
    #[must_use]
    pub fn with_signer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.signer_path = Some(path.into());
        self
    }

    fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL '{}': {e}", self.api_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::Config(format!(
                "API URL must use http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.agent_did.is_empty() {
            return Err(ClientError::Config("agent DID cannot be empty".to_string()));
        }
        if self.private_key.is_empty() {
            return Err(ClientError::Config(
                "private key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("agent_did", &self.agent_did)
            .field("private_key", &"<redacted>")
            .field("token_path", &self.token_path)
            .field("signer_path", &self.signer_path)
            .finish()
    }
}
