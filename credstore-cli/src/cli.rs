//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use credstore_core::{SecretKind, SecureOption};
use uuid::Uuid;

/// `credstore` command-line interface for OS-native secret storage
#[derive(Parser)]
#[command(name = "credstore-cli")]
#[command(author, version, about = "Store credentials and tokens in the platform secret store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "CREDSTORE_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Required security level (defaults to the configured one)
    #[arg(short, long, global = true, value_enum)]
    pub secure: Option<SecureArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the selected backend and configuration
    #[command(about = "Show which secret store would be used")]
    Status {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Read a secret
    #[command(about = "Read a secret stored under a key")]
    Get {
        /// Kind of secret
        #[arg(value_enum)]
        kind: KindArg,

        /// Logical key
        key: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Print secret values instead of masking them
        #[arg(long)]
        show_secret: bool,
    },

    /// Store a secret, replacing any previous value
    #[command(subcommand)]
    Set(SetCommands),

    /// Remove a secret
    #[command(about = "Remove the secret stored under a key")]
    Delete {
        /// Kind of secret
        #[arg(value_enum)]
        kind: KindArg,

        /// Logical key
        key: String,
    },

    /// Configuration file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Secret kinds accepted by `set`
#[derive(Subcommand)]
pub enum SetCommands {
    /// Store a username/password credential
    Credential {
        /// Logical key
        key: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (prompted for if omitted)
        #[arg(short, long, env = "CREDSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Store a single token
    Token {
        /// Logical key
        key: String,

        /// Token type, by friendly or symbolic name
        #[arg(short = 't', long, default_value = "Personal")]
        token_type: String,

        /// Token value (prompted for if omitted)
        #[arg(long, env = "CREDSTORE_TOKEN", hide_env_values = true)]
        value: Option<String>,

        /// Identity the token was issued for
        #[arg(long)]
        target_identity: Option<Uuid>,
    },

    /// Store an access/refresh token pair
    TokenPair {
        /// Logical key
        key: String,

        /// Access token (prompted for if omitted)
        #[arg(short, long)]
        access_token: Option<String>,

        /// Refresh token (prompted for if omitted)
        #[arg(short, long)]
        refresh_token: Option<String>,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,

    /// Write a settings file
    Init {
        /// Namespace prefixed to every stored key
        #[arg(short, long)]
        namespace: Option<String>,

        /// Location of the insecure fallback file
        #[arg(long)]
        fallback_path: Option<PathBuf>,

        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Table,
    /// JSON document
    Json,
}

/// Security level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SecureArg {
    /// Fail unless a secure store is available
    Must,
    /// Fall back to the insecure file store
    Optional,
}

impl From<SecureArg> for SecureOption {
    fn from(arg: SecureArg) -> Self {
        match arg {
            SecureArg::Must => Self::Must,
            SecureArg::Optional => Self::Optional,
        }
    }
}

/// Secret kind options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    /// Username/password pair
    Credential,
    /// Single token
    Token,
    /// Access/refresh token pair
    TokenPair,
}

impl From<KindArg> for SecretKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Credential => Self::Credential,
            KindArg::Token => Self::Token,
            KindArg::TokenPair => Self::TokenPair,
        }
    }
}
