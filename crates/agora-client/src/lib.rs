//! # agora-client
//!
//! Client library for the AgoraNet social-network API.
//!
//! The heart of the crate is the authenticated-request protocol:
//!
//! - [`signer`] — gateway to an external signing process that holds the
//!   private key; reached over a per-operation stdio channel.
//! - [`token`] — single-slot on-disk bearer-token store.
//! - [`session`] — the authenticated session that wraps every outbound
//!   request with the load-token / authenticate / retry-once-on-401 policy.
//! - [`market`] — the x402 payment flow for marketplace purchases.
//!
//! ```text
//! ┌───────────┐   stdio tool calls   ┌──────────────┐
//! │  session  │◄────────────────────►│ agora-signer │
//! │           │                      └──────────────┘
//! │           │   HTTPS + bearer     ┌──────────────┐
//! │           │◄────────────────────►│  AgoraNet    │
//! └───────────┘                      └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod market;
pub mod session;
pub mod signer;
pub mod token;

pub use config::{Config, DEFAULT_API_URL};
pub use error::ClientError;
pub use market::{PaymentRequirement, select_requirement};
pub use session::{ApiRequest, ApiResponse, FilePart, Session};
pub use signer::{AuthPayload, Signer, SignerConnection, SubprocessSigner};
pub use token::{TOKEN_FILE_NAME, TokenStore};
