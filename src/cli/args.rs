use crate::core::RegistrationPolicy;
use crate::replay::ReplayConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a bank session script against persisted accounts
#[derive(Parser, Debug)]
#[command(name = "bank-simulator")]
#[command(about = "Replay a bank session script against persisted accounts", long_about = None)]
pub struct CliArgs {
    /// Session script CSV file
    #[arg(value_name = "SCRIPT", help = "Path to the session script CSV file")]
    pub script: PathBuf,

    /// Directory holding the storage slot file
    #[arg(
        long = "storage",
        visible_alias = "storage-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory where the account storage file is kept"
    )]
    pub storage_dir: PathBuf,

    /// Seed JSON file used when storage is empty
    #[arg(
        long = "seed",
        value_name = "PATH",
        help = "Seed JSON file used when storage is empty (default: built-in demo accounts)"
    )]
    pub seed: Option<PathBuf>,

    /// Registration rules to apply
    #[arg(
        long = "variant",
        value_name = "VARIANT",
        default_value = "v2",
        help = "Variant: 'v1' for open registration or 'v2' for PIN-protected accounts"
    )]
    pub variant: Variant,
}

/// Simulator variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Username-only accounts
    V1,
    /// Accounts protected by a PIN
    V2,
}

impl CliArgs {
    /// Registration policy of the selected variant
    pub fn to_policy(&self) -> RegistrationPolicy {
        match self.variant {
            Variant::V1 => RegistrationPolicy::open(),
            Variant::V2 => RegistrationPolicy::pin_protected(),
        }
    }

    /// Build the replay configuration from the parsed arguments
    pub fn to_replay_config(&self) -> ReplayConfig {
        ReplayConfig {
            storage_dir: self.storage_dir.clone(),
            seed: self.seed.clone(),
            policy: self.to_policy(),
        }
    }
}
