//! Account-related types for the bank simulator
//!
//! This module defines the Account structure, username normalization and the
//! balance operations that keep `balance` equal to the sum of the ledger.

use super::error::BankError;
use super::ledger::{EntryKind, LedgerEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalize a username for storage and lookup
///
/// Registration, login, lookup and transfer all go through this function,
/// which makes username uniqueness case-insensitive and whitespace-trimmed.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Reject amounts that are zero or negative
pub(crate) fn ensure_positive(amount: Decimal) -> Result<Decimal, BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::invalid_amount(amount));
    }
    Ok(amount)
}

/// Client account state
///
/// Holds identity, the optional credential, the balance and the ledger.
/// The ledger is ordered newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Normalized username (trimmed, lower-cased)
    #[serde(alias = "usuario")]
    pub username: String,

    /// Opaque credential, only present in the PIN-protected variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    /// Current balance, never negative
    #[serde(
        rename = "saldo",
        alias = "balance",
        with = "rust_decimal::serde::arbitrary_precision"
    )]
    pub balance: Decimal,

    /// Ledger entries, newest first
    #[serde(rename = "movimientos", alias = "ledger", default)]
    pub ledger: Vec<LedgerEntry>,
}

impl Account {
    /// Create an account holding `initial_balance`
    ///
    /// The opening balance is recorded as an ACCOUNT_OPENED entry so the
    /// ledger sums to the balance from the first moment.
    pub fn open(username: &str, pin: Option<String>, initial_balance: Decimal) -> Self {
        let mut account = Account {
            username: normalize_username(username),
            pin,
            balance: initial_balance,
            ledger: Vec::new(),
        };
        account.record_entry(EntryKind::AccountOpened, initial_balance, None);
        account
    }

    /// Prepend a ledger entry without any validation
    ///
    /// Used by deposit, withdraw and transfer after they validated the
    /// operation, and at account creation.
    pub fn record_entry(&mut self, kind: EntryKind, amount: Decimal, detail: Option<String>) {
        self.ledger.insert(0, LedgerEntry::new(kind, amount, detail));
    }

    /// Deposit funds into the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive
    /// - `ArithmeticOverflow` if the new balance cannot be represented
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BankError> {
        let amount = ensure_positive(amount)?;
        self.credit(amount, EntryKind::Deposit, None)
    }

    /// Withdraw funds from the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive
    /// - `InsufficientFunds` if the amount exceeds the balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BankError> {
        let amount = ensure_positive(amount)?;
        self.debit(amount, EntryKind::Withdrawal, None)
    }

    /// Increase the balance and record a credit entry
    pub(crate) fn credit(
        &mut self,
        amount: Decimal,
        kind: EntryKind,
        detail: Option<String>,
    ) -> Result<(), BankError> {
        let new_balance = self.balance_after_credit(amount)?;
        self.balance = new_balance;
        self.record_entry(kind, amount, detail);
        Ok(())
    }

    /// Decrease the balance and record a debit entry
    pub(crate) fn debit(
        &mut self,
        amount: Decimal,
        kind: EntryKind,
        detail: Option<String>,
    ) -> Result<(), BankError> {
        let new_balance = self.balance_after_debit(amount)?;
        self.balance = new_balance;
        self.record_entry(kind, -amount, detail);
        Ok(())
    }

    /// Balance a credit of `amount` would produce, without applying it
    pub(crate) fn balance_after_credit(&self, amount: Decimal) -> Result<Decimal, BankError> {
        self.balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("credit", &self.username))
    }

    /// Balance a debit of `amount` would produce, without applying it
    pub(crate) fn balance_after_debit(&self, amount: Decimal) -> Result<Decimal, BankError> {
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                &self.username,
                self.balance,
                amount,
            ));
        }
        self.balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("debit", &self.username))
    }

    /// Check a candidate PIN against the stored credential
    ///
    /// Accounts without a credential (first variant) accept any input.
    pub fn pin_matches(&self, candidate: Option<&str>) -> bool {
        match &self.pin {
            None => true,
            Some(pin) => candidate == Some(pin.as_str()),
        }
    }

    /// The newest `limit` ledger entries
    pub fn recent_entries(&self, limit: usize) -> &[LedgerEntry] {
        &self.ledger[..self.ledger.len().min(limit)]
    }

    /// Sum of all ledger amounts
    pub fn ledger_total(&self) -> Decimal {
        self.ledger.iter().map(|entry| entry.amount).sum()
    }

    /// Whether the balance matches the ledger and is non-negative
    pub fn is_consistent(&self) -> bool {
        self.balance >= Decimal::ZERO && self.ledger_total() == self.balance
    }
}
