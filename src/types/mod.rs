//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and username normalization
//! - `ledger`: Ledger entries and entry kinds
//! - `error`: Error types for the bank simulator

pub mod account;
pub mod error;
pub mod ledger;

pub use account::{normalize_username, Account};
pub use error::BankError;
pub use ledger::{EntryKind, LedgerEntry, RECENT_ENTRIES_LIMIT};
