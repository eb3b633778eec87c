//! CLI command implementations.
//!
//! Each submodule implements one command family:
//! - [`auth`] - Authentication and message signing
//! - [`profile`] - Profile viewing and updates
//! - [`post`] - Posting, likes, feeds
//! - [`user`] - Follow graph
//! - [`discover`] - Search, trending, suggestions, activity
//! - [`notifications`] - Notification list and read state
//! - [`messages`] - Direct messages
//! - [`settings`] - Account settings
//! - [`webhook`] - Webhook configuration
//! - [`identity`] - Linked identities
//! - [`store`] - Marketplace listings and purchases

pub mod auth;
pub mod discover;
pub mod identity;
pub mod messages;
pub mod notifications;
pub mod post;
pub mod profile;
pub mod settings;
pub mod store;
pub mod user;
pub mod webhook;

pub use auth::AuthCommand;
pub use discover::DiscoverCommand;
pub use identity::IdentityCommand;
pub use messages::MsgCommand;
pub use notifications::NotificationsCommand;
pub use post::PostCommand;
pub use profile::ProfileCommand;
pub use settings::SettingsCommand;
pub use store::StoreCommand;
pub use user::UserCommand;
pub use webhook::WebhookCommand;

/// Percent-encode a path or query component.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
