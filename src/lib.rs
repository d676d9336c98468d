//! Rust Bank Simulator Library
//! # Overview
//!
//! This library models a small retail bank: accounts with a balance and a
//! ledger, a login session, registration rules, transfers and persistence of
//! the whole account directory in a key/value storage slot.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, LedgerEntry, BankError)
//! - [`core`] - Business logic components:
//!   - [`core::directory`] - Account lookup, registration and transfers
//!   - [`core::session`] - Login state and the logged-in operations
//!   - [`core::policy`] - Registration rules of the two variants
//!   - [`core::bank`] - Owning context that dispatches user intents
//! - [`io`] - Storage slots, seeds, JSON persistence and session scripts
//! - [`view`] - Pure rendering of session state
//! - [`replay`] - Replays a session script against a file-backed bank
//! - [`cli`] - CLI arguments parsing
//! - [`telemetry`] - Log subscriber setup
//!
//! # Operations
//!
//! - **Register**: Open an account with an initial balance
//! - **Login / Logout**: Select the current account (logout asks first)
//! - **Balance**: Show the balance of the current account
//! - **Deposit / Withdraw**: Credit or debit the current account
//! - **Transfer**: Move funds to another account after confirmation
//!
//! # Variants
//!
//! - **v1**: Username-only accounts, any username of at least one character
//! - **v2**: Usernames of at least three characters protected by a PIN of at
//!   least four characters

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod telemetry;
pub mod types;
pub mod view;

pub use core::{AccountDirectory, Bank, Intent, Outcome, RegistrationPolicy, Session};
pub use io::write_accounts_csv;
pub use replay::{ReplayConfig, ReplaySummary, SessionReplay};
pub use types::{normalize_username, Account, BankError, EntryKind, LedgerEntry};
pub use view::{format_currency, render, View};
