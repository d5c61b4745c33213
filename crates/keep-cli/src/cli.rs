//! Command-line definition.

use clap::{Parser, Subcommand};

use keep_core::VERSION;

/// Keep - store individually encrypted items in a blob store
#[derive(Parser)]
#[command(name = "keep")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// AWS access key for the S3 store
    #[arg(long, global = true, env = "KEEP_AWS_ACCESS_KEY_ID", value_name = "KEY")]
    pub access_key: Option<String>,

    /// AWS secret key for the S3 store
    #[arg(long, global = true, env = "KEEP_AWS_SECRET_ACCESS_KEY", value_name = "KEY")]
    pub secret_key: Option<String>,

    /// S3 bucket to store items in
    #[arg(long, global = true, env = "KEEP_BUCKET")]
    pub bucket: Option<String>,

    /// Prefix to store everything under inside the bucket
    #[arg(long, global = true, env = "KEEP_BUCKET_PREFIX")]
    pub prefix: Option<String>,

    /// AWS region of the bucket
    #[arg(long, global = true, env = "KEEP_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Local directory store (used instead of S3 when set)
    #[arg(long, global = true, env = "KEEP_STORE_DIR", value_name = "DIR")]
    pub store_dir: Option<String>,

    /// Password to access the vault with
    #[arg(long, global = true, env = "KEEP_PASSWORD")]
    pub password: Option<String>,

    /// Override the scrypt cost exponent (testing only; weakens encryption)
    #[arg(long, global = true, env = "KEEP_SCRYPT_LOG_N", hide = true)]
    pub scrypt_log_n: Option<u8>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stash some data in the vault
    #[command(visible_alias = "s")]
    Set {
        /// Key to save the item under
        #[arg(value_name = "KEY")]
        key: String,

        /// Source file (reads piped stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },

    /// Get some data from the vault
    #[command(visible_alias = "g")]
    Get {
        /// Target file, or "-" for stdout
        #[arg(value_name = "TARGET")]
        target: String,

        /// Key to read the item from
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the access password registered for an item (master password required)
    Pass {
        /// Key of the item
        #[arg(value_name = "KEY")]
        key: String,
    },
}
