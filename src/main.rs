//! Rust Bank Simulator CLI
//!
//! Replays a session script against the persisted accounts and prints the
//! resulting account summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- session.csv > accounts.csv
//! cargo run -- --variant v1 session.csv > accounts.csv
//! cargo run -- --storage data --seed seed.json session.csv > accounts.csv
//! RUST_LOG=debug cargo run -- session.csv
//! ```
//!
//! Accounts are loaded from `<storage>/banco_entrega2_cuentas.json`, or from the seed
//! when that file does not exist, and saved back after every change.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing script, seed unavailable, storage not writable, etc.)

use rust_bank_simulator::cli;
use rust_bank_simulator::replay::SessionReplay;
use rust_bank_simulator::telemetry;
use std::process;
use tracing::error;

fn main() {
    telemetry::init();

    let args = cli::parse_args();
    let replay = SessionReplay::new(args.to_replay_config());

    // Summary goes to stdout, logs to stderr
    let mut output = std::io::stdout();
    if let Err(e) = replay.process(&args.script, &mut output) {
        error!(error = %e, "replay failed");
        process::exit(1);
    }
}
