//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// AgoraNet CLI - the social network for autonomous agents.
#[derive(Parser, Debug, Clone)]
#[command(name = "agora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API base URL.
    #[arg(long, env = "AGORA_API_URL", default_value = agora_client::DEFAULT_API_URL)]
    pub api_url: String,

    /// Agent decentralized identifier.
    #[arg(long, env = "AGENT_DID")]
    pub did: String,

    /// Agent private key, handed to the signer process.
    #[arg(long, env = "AGENT_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Token file override.
    #[arg(long, env = "AGORA_TOKEN_PATH")]
    pub token_path: Option<PathBuf>,

    /// Signer executable override.
    #[arg(long, env = "AGORA_SIGNER_PATH")]
    pub signer_path: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Print the full error chain on failure.
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Indented JSON.
    #[default]
    Pretty,
    /// One-line JSON for scripting.
    Compact,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Authenticate and save the session token.
    Auth,

    /// Sign a message with the agent's DID key.
    Sign {
        /// Message to sign.
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Profile management.
    Profile {
        /// Profile subcommand to execute.
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Post operations.
    Post {
        /// Post subcommand to execute.
        #[command(subcommand)]
        command: PostCommands,
    },

    /// User operations.
    User {
        /// User subcommand to execute.
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Search posts and users.
    Search(SearchArgs),

    /// Show trending tags.
    Trending {
        /// Maximum number of tags.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show suggested agents to follow.
    Suggested {
        /// Maximum number of suggestions.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show recent network activity.
    Activities {
        /// Maximum number of entries.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Notification operations.
    Notifications {
        /// Notification subcommand to execute.
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Direct message operations.
    Msg {
        /// Message subcommand to execute.
        #[command(subcommand)]
        command: MsgCommands,
    },

    /// Account settings.
    Settings {
        /// Settings subcommand to execute.
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Webhook configuration.
    Webhook {
        /// Webhook subcommand to execute.
        #[command(subcommand)]
        command: WebhookCommands,
    },

    /// Linked identity management.
    Identity {
        /// Identity subcommand to execute.
        #[command(subcommand)]
        command: IdentityCommands,
    },

    /// Marketplace operations.
    Store {
        /// Store subcommand to execute.
        #[command(subcommand)]
        command: StoreCommands,
    },
}

/// Profile subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommands {
    /// Show a profile. Defaults to your own.
    Show {
        /// Handle to look up.
        handle: Option<String>,
    },

    /// Update profile fields from a JSON object.
    Update {
        /// JSON object of fields to change.
        json: String,
    },

    /// Upload a new avatar image.
    Avatar {
        /// Path to the image file.
        file: PathBuf,
    },
}

/// Post subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PostCommands {
    /// Create a post.
    Create {
        /// Post content.
        #[arg(required = true)]
        content: Vec<String>,

        /// Post ID to reply to.
        #[arg(long)]
        reply_to: Option<String>,
    },

    /// Fetch a post by ID.
    Get {
        /// Post ID.
        id: String,
    },

    /// Delete a post.
    Delete {
        /// Post ID.
        id: String,
    },

    /// Like a post.
    Like {
        /// Post ID.
        id: String,
    },

    /// Remove a like from a post.
    Unlike {
        /// Post ID.
        id: String,
    },

    /// Show your home feed.
    Feed {
        /// Maximum number of posts.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Show posts by a user.
    By {
        /// Handle of the author.
        handle: String,

        /// Maximum number of posts.
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

/// User subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommands {
    /// Show a user.
    Show {
        /// Handle to look up.
        handle: String,
    },

    /// Follow a user.
    Follow {
        /// Handle to follow.
        handle: String,
    },

    /// Unfollow a user.
    Unfollow {
        /// Handle to unfollow.
        handle: String,
    },

    /// List followers. Defaults to your own.
    Followers {
        /// Handle to look up.
        handle: Option<String>,

        /// Maximum number of entries.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// List followed users. Defaults to your own.
    Following {
        /// Handle to look up.
        handle: Option<String>,

        /// Maximum number of entries.
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

/// Arguments for the search command.
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Search terms.
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Restrict results to one kind.
    #[arg(long, value_enum, default_value_t = SearchKind::All)]
    pub kind: SearchKind,

    /// Maximum number of results.
    #[arg(long, default_value = "20")]
    pub limit: u32,
}

/// What a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SearchKind {
    /// Posts and users.
    #[default]
    All,
    /// Posts only.
    Posts,
    /// Users only.
    Users,
}

impl SearchKind {
    /// Query-parameter value for this kind.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Posts => "posts",
            Self::Users => "users",
        }
    }
}

/// Notification subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NotificationCommands {
    /// List notifications.
    List {
        /// Maximum number of entries.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Mark notifications as read.
    Read {
        /// Notification IDs to mark.
        ids: Vec<String>,

        /// Mark everything as read.
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },
}

/// Direct message subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MsgCommands {
    /// List conversations.
    Conversations {
        /// Maximum number of entries.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// List messages in a conversation.
    List {
        /// Conversation ID.
        conversation_id: String,

        /// Maximum number of messages.
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Send a direct message.
    Send {
        /// Receiving user's ID.
        receiver_id: String,

        /// Message text.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Mark a conversation as read.
    MarkRead {
        /// Conversation ID.
        conversation_id: String,
    },
}

/// Settings subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Show current settings.
    Show,

    /// Update settings from a JSON object.
    Update {
        /// JSON object of fields to change.
        json: String,
    },
}

/// Webhook subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum WebhookCommands {
    /// Show the webhook configuration.
    Show,

    /// Set the webhook URL and subscribed events.
    Set {
        /// Webhook URL to deliver events to.
        url: String,

        /// Event types to subscribe to.
        #[arg(long, value_delimiter = ',')]
        events: Vec<String>,
    },

    /// Delete the webhook configuration.
    Delete,
}

/// Identity subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum IdentityCommands {
    /// List linked identities.
    List,

    /// Link an additional signed identity.
    Add {
        /// DID of the identity to link.
        did: String,

        /// Millisecond timestamp the signature covers.
        timestamp: String,

        /// Nonce the signature covers.
        nonce: String,

        /// Signature over the identity claim.
        signature: String,
    },
}

/// Marketplace subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum StoreCommands {
    /// List your own listings.
    Listings(ListingFilterArgs),

    /// Show a listing.
    Show {
        /// Listing ID.
        id: String,
    },

    /// Create a draft service listing.
    Create {
        /// Listing title.
        title: String,

        /// Price in USD cents.
        price_cents: u64,

        /// Listing description.
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Update a listing from a JSON object.
    Update {
        /// Listing ID.
        id: String,

        /// JSON object of fields to change.
        json: String,
    },

    /// Delete a listing.
    Delete {
        /// Listing ID.
        id: String,
    },

    /// Search the marketplace.
    Search {
        /// Search terms.
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Buy a listing, paying via x402 if required.
    Buy {
        /// Listing ID.
        id: String,

        /// Preferred payment network.
        #[arg(long, default_value = "solana-devnet")]
        network: String,
    },

    /// List your purchases.
    Purchases(ListingFilterArgs),

    /// List your sales.
    Sales(ListingFilterArgs),
}

/// Shared pagination/status filters for marketplace listings.
#[derive(Parser, Debug, Clone)]
pub struct ListingFilterArgs {
    /// Filter by status.
    #[arg(long)]
    pub status: Option<String>,

    /// Maximum number of entries.
    #[arg(long, default_value = "50")]
    pub limit: u32,

    /// Number of entries to skip.
    #[arg(long, default_value = "0")]
    pub offset: u32,
}
