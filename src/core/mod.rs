//! Core business logic module
//!
//! This module contains the account/ledger domain components:
//! - `traits` - The notifier capability consumed by the bank
//! - `policy` - Registration rules of the open and PIN-protected variants
//! - `directory` - Account lookup, registration and transfers
//! - `session` - Login state and the logged-in operations
//! - `bank` - The owning application context dispatching user intents

pub mod bank;
pub mod directory;
pub mod policy;
pub mod session;
pub mod traits;

pub use bank::{parse_amount, Bank, Intent, Outcome};
pub use directory::{AccountDirectory, TransferPlan};
pub use policy::RegistrationPolicy;
pub use session::Session;
pub use traits::{Notice, NoticeLevel, Notifier};
