//! Ledger-related types for the bank simulator
//!
//! A ledger entry is the immutable record of one balance-affecting event.
//! Accounts keep their entries newest first.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of ledger entries shown to the user
pub const RECENT_ENTRIES_LIMIT: usize = 10;

/// Kinds of balance-affecting events
///
/// Serialized in SCREAMING_SNAKE_CASE to match the persisted layout
/// (`"DEPOSIT"`, `"TRANSFER_SENT"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Credit made by the account owner
    Deposit,

    /// Debit made by the account owner
    Withdrawal,

    /// Initial balance recorded at registration
    AccountOpened,

    /// Debit moved to another account
    TransferSent,

    /// Credit received from another account
    TransferReceived,
}

impl EntryKind {
    /// Human readable label used by the view layer
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdrawal => "Withdrawal",
            EntryKind::AccountOpened => "Account opened",
            EntryKind::TransferSent => "Transfer sent",
            EntryKind::TransferReceived => "Transfer received",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable record of a balance-affecting event
///
/// The field names follow the persisted JSON layout (`fecha`, `tipo`,
/// `monto`, `detalle`); the English names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique opaque identifier
    pub id: Uuid,

    /// When the entry was recorded
    #[serde(rename = "fecha", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "tipo", alias = "kind")]
    pub kind: EntryKind,

    /// Signed delta: positive for credits, negative for debits
    #[serde(
        rename = "monto",
        alias = "amount",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub amount: Decimal,

    /// Optional annotation, e.g. the counterparty of a transfer
    #[serde(
        rename = "detalle",
        alias = "detail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
}

impl LedgerEntry {
    /// Create an entry stamped with a fresh id and the current time
    pub fn new(kind: EntryKind, amount: Decimal, detail: Option<String>) -> Self {
        LedgerEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            amount,
            detail,
        }
    }

    /// Whether this entry credits the account
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}
