//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use unseal_core::config::{ENV_BUCKET_NAME, ENV_DEST_PREFIX, ENV_SECRET_NAME, ENV_SOURCE_PREFIX};

/// Unseal - decrypt PGP-encrypted S3 objects
#[derive(Parser, Debug)]
#[command(name = "unseal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `lambda` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process the source prefix once and print the response
    Run(RunArgs),

    /// Serve invocations from the Lambda runtime
    Lambda,
}

// Run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bucket holding ciphertext and output (overrides BUCKET_NAME)
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Prefix to list for ciphertext (overrides SOURCE_PREFIX)
    #[arg(long)]
    pub source_prefix: Option<String>,

    /// Prefix receiving plaintext (overrides DEST_PREFIX)
    #[arg(long)]
    pub dest_prefix: Option<String>,

    /// Secrets Manager secret holding the key (overrides PGP_SECRET_NAME)
    #[arg(long)]
    pub secret_name: Option<String>,
}

impl RunArgs {
    /// Flag value standing in for an environment variable
    pub fn override_for(&self, name: &str) -> Option<String> {
        let value = match name {
            ENV_BUCKET_NAME => &self.bucket,
            ENV_SOURCE_PREFIX => &self.source_prefix,
            ENV_DEST_PREFIX => &self.dest_prefix,
            ENV_SECRET_NAME => &self.secret_name,
            _ => return None,
        };
        value.clone()
    }
}
