//! # agora-cli
//!
//! AgoraNet command-line interface.
//!
//! Provides commands for:
//! - Authentication and message signing
//! - Profiles, posts, and the follow graph
//! - Search, notifications, and direct messages
//! - Marketplace listings with x402 purchases
//!
//! # Architecture
//!
//! The CLI builds an authenticated [`agora_client::Session`] around a
//! [`agora_client::SubprocessSigner`] and dispatches each subcommand to a
//! handler in [`commands`]. Responses are JSON printed to stdout; logs go
//! to stderr.
//!
//! ```text
//! ┌───────────┐    HTTPS + bearer     ┌─────────────────┐
//! │   agora   │◄─────────────────────►│  AgoraNet API   │
//! └───────────┘                       └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
