//! Account directory module
//!
//! This module provides the `AccountDirectory` struct which holds every known
//! account of a session, keyed by normalized username.
//!
//! The AccountDirectory is responsible for:
//! - Case-insensitive, whitespace-trimmed lookups
//! - Registering accounts under a `RegistrationPolicy`
//! - All-or-nothing transfers between two accounts
//! - Providing sorted account listings for persistence and output

use crate::core::policy::RegistrationPolicy;
use crate::types::account::ensure_positive;
use crate::types::{normalize_username, Account, BankError, EntryKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A validated transfer, ready to be applied
///
/// Produced by [`AccountDirectory::plan_transfer`]. Holds the balances both
/// accounts will have, so applying it cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    /// Normalized source username
    pub from: String,
    /// Normalized destination username
    pub to: String,
    /// Amount moved
    pub amount: Decimal,
    source_balance: Decimal,
    destination_balance: Decimal,
}

/// In-memory collection of the session's accounts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDirectory {
    /// Map of normalized usernames to accounts
    accounts: HashMap<String, Account>,
}

impl AccountDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        AccountDirectory {
            accounts: HashMap::new(),
        }
    }

    /// Build a directory from restored accounts
    ///
    /// Usernames are normalized on the way in.
    ///
    /// # Errors
    ///
    /// Returns `StorageCorrupt` if two accounts share a normalized username or
    /// an account's balance does not match its ledger.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, BankError> {
        let mut directory = AccountDirectory::new();

        for mut account in accounts {
            account.username = normalize_username(&account.username);

            if account.username.is_empty() {
                return Err(BankError::storage_corrupt("account with empty username"));
            }
            if !account.is_consistent() {
                return Err(BankError::storage_corrupt(format!(
                    "balance of '{}' does not match its ledger",
                    account.username
                )));
            }
            if directory.accounts.contains_key(&account.username) {
                return Err(BankError::storage_corrupt(format!(
                    "duplicate account '{}'",
                    account.username
                )));
            }

            directory.accounts.insert(account.username.clone(), account);
        }

        Ok(directory)
    }

    /// Look up an account by username (normalized before lookup)
    pub fn find(&self, username: &str) -> Option<&Account> {
        self.accounts.get(&normalize_username(username))
    }

    /// Mutable variant of [`find`](Self::find)
    pub fn find_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.get_mut(&normalize_username(username))
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts sorted by username
    ///
    /// Sorting gives deterministic persistence and CSV output.
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        accounts
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `InvalidUsername` if the normalized username is empty or too short
    /// - `InvalidCredential` if the policy requires a PIN and it is too short
    /// - `InvalidAmount` if the initial balance is negative
    /// - `DuplicateUsername` if the username is already registered
    pub fn register(
        &mut self,
        policy: &RegistrationPolicy,
        username: &str,
        pin: Option<&str>,
        initial_balance: Decimal,
    ) -> Result<&Account, BankError> {
        let username = normalize_username(username);
        let pin = policy.validate(&username, pin)?;

        if initial_balance < Decimal::ZERO {
            return Err(BankError::invalid_amount(initial_balance));
        }

        if self.accounts.contains_key(&username) {
            return Err(BankError::duplicate_username(&username));
        }

        let account = Account::open(&username, pin, initial_balance);
        Ok(self.accounts.entry(username).or_insert(account))
    }

    /// Validate a transfer without touching any account
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `InvalidAmount` if the amount is not positive
    /// - `UserNotFound` if the destination does not exist
    /// - `SelfTransfer` if source and destination are the same account
    /// - `UserNotFound` if the source does not exist
    /// - `InsufficientFunds` if the source balance is below the amount
    /// - `ArithmeticOverflow` if the destination balance would overflow
    pub fn plan_transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<TransferPlan, BankError> {
        let amount = ensure_positive(amount)?;
        let from = normalize_username(from);
        let to = normalize_username(to);

        let destination = self
            .accounts
            .get(&to)
            .ok_or_else(|| BankError::user_not_found(&to))?;

        if from == to {
            return Err(BankError::self_transfer(&from));
        }

        let source = self
            .accounts
            .get(&from)
            .ok_or_else(|| BankError::user_not_found(&from))?;

        let source_balance = source.balance_after_debit(amount)?;
        let destination_balance = destination.balance_after_credit(amount)?;

        Ok(TransferPlan {
            from,
            to,
            amount,
            source_balance,
            destination_balance,
        })
    }

    /// Apply a previously validated transfer
    ///
    /// Both sides change together: the source gets a TRANSFER_SENT entry and
    /// the destination a TRANSFER_RECEIVED entry.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` only if an account disappeared since planning;
    /// nothing is modified in that case.
    pub fn apply_transfer(&mut self, plan: TransferPlan) -> Result<(), BankError> {
        if !self.accounts.contains_key(&plan.to) {
            return Err(BankError::user_not_found(&plan.to));
        }
        let source = self
            .accounts
            .get_mut(&plan.from)
            .ok_or_else(|| BankError::user_not_found(&plan.from))?;

        source.balance = plan.source_balance;
        source.record_entry(EntryKind::TransferSent, -plan.amount, Some(plan.to.clone()));

        if let Some(destination) = self.accounts.get_mut(&plan.to) {
            destination.balance = plan.destination_balance;
            destination.record_entry(
                EntryKind::TransferReceived,
                plan.amount,
                Some(plan.from.clone()),
            );
        }

        Ok(())
    }

    /// Move funds between two accounts, all or nothing
    ///
    /// See [`plan_transfer`](Self::plan_transfer) for the failure cases.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<(), BankError> {
        let plan = self.plan_transfer(from, to, amount)?;
        self.apply_transfer(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn policy() -> RegistrationPolicy {
        RegistrationPolicy::pin_protected()
    }

    fn alice_and_bob() -> AccountDirectory {
        let mut directory = AccountDirectory::new();
        directory
            .register(&policy(), "alice", Some("1234"), dec(1500))
            .unwrap();
        directory
            .register(&policy(), "bob", Some("5678"), dec(300))
            .unwrap();
        directory
    }

    fn assert_all_consistent(directory: &AccountDirectory) {
        for account in directory.accounts() {
            assert!(
                account.is_consistent(),
                "account {} is inconsistent",
                account.username
            );
        }
    }

    #[test]
    fn test_new_creates_empty_directory() {
        let directory = AccountDirectory::new();
        assert!(directory.is_empty());
        assert_eq!(directory.accounts().len(), 0);
    }

    #[test]
    fn test_find_is_case_insensitive_and_trimmed() {
        let mut directory = AccountDirectory::new();
        directory
            .register(&policy(), "Ana", Some("1234"), dec(10))
            .unwrap();

        let padded = directory.find("  Ana ").unwrap();
        let plain = directory.find("ana").unwrap();

        assert_eq!(padded, plain);
        assert_eq!(plain.username, "ana");
        assert!(directory.find("anna").is_none());
    }

    #[test]
    fn test_register_creates_account_with_opening_entry() {
        let mut directory = AccountDirectory::new();

        let account = directory
            .register(&policy(), "alice", Some("1234"), dec(1000))
            .unwrap();

        assert_eq!(account.balance, dec(1000));
        assert_eq!(account.pin.as_deref(), Some("1234"));
        assert_eq!(account.ledger[0].kind, EntryKind::AccountOpened);
        assert_eq!(directory.len(), 1);
    }

    #[rstest]
    #[case::same("alice")]
    #[case::upper("ALICE")]
    #[case::padded("  Alice  ")]
    fn test_register_rejects_duplicate(#[case] username: &str) {
        let mut directory = alice_and_bob();

        let result = directory.register(&policy(), username, Some("9999"), dec(0));

        assert_eq!(result, Err(BankError::duplicate_username("alice")));
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.find("alice").unwrap().pin.as_deref(), Some("1234"));
    }

    #[rstest]
    #[case::empty("   ", Some("1234"), dec(0))]
    #[case::short_username("al", Some("1234"), dec(0))]
    #[case::short_pin("carol", Some("12"), dec(0))]
    #[case::negative_balance("carol", Some("1234"), dec(-1))]
    fn test_register_rejects_invalid_input(
        #[case] username: &str,
        #[case] pin: Option<&str>,
        #[case] initial: Decimal,
    ) {
        let mut directory = alice_and_bob();

        assert!(directory.register(&policy(), username, pin, initial).is_err());
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_register_checks_username_before_duplicate() {
        let mut directory = AccountDirectory::new();
        directory
            .register(&RegistrationPolicy::open(), "al", None, dec(0))
            .unwrap();

        let result = directory.register(&policy(), "al", Some("1234"), dec(0));

        assert!(matches!(result, Err(BankError::InvalidUsername { .. })));
    }

    #[test]
    fn test_transfer_moves_funds_and_records_both_sides() {
        let mut directory = alice_and_bob();

        directory.transfer("alice", "bob", dec(1500)).unwrap();

        let alice = directory.find("alice").unwrap();
        assert_eq!(alice.balance, Decimal::ZERO);
        assert_eq!(alice.ledger[0].kind, EntryKind::TransferSent);
        assert_eq!(alice.ledger[0].amount, dec(-1500));
        assert_eq!(alice.ledger[0].detail.as_deref(), Some("bob"));

        let bob = directory.find("bob").unwrap();
        assert_eq!(bob.balance, dec(1800));
        assert_eq!(bob.ledger[0].kind, EntryKind::TransferReceived);
        assert_eq!(bob.ledger[0].amount, dec(1500));
        assert_eq!(bob.ledger[0].detail.as_deref(), Some("alice"));

        assert_all_consistent(&directory);
    }

    #[test]
    fn test_transfer_normalizes_usernames() {
        let mut directory = alice_and_bob();

        directory.transfer(" ALICE", "Bob ", dec(100)).unwrap();

        assert_eq!(directory.find("alice").unwrap().balance, dec(1400));
        assert_eq!(directory.find("bob").unwrap().balance, dec(400));
    }

    #[rstest]
    #[case::zero_amount("alice", "bob", dec(0), BankError::invalid_amount(dec(0)))]
    #[case::negative_amount("alice", "bob", dec(-10), BankError::invalid_amount(dec(-10)))]
    #[case::missing_destination("alice", "carol", dec(10), BankError::user_not_found("carol"))]
    #[case::self_transfer("alice", "ALICE", dec(10), BankError::self_transfer("alice"))]
    #[case::missing_source("dave", "bob", dec(10), BankError::user_not_found("dave"))]
    #[case::insufficient(
        "bob",
        "alice",
        dec(301),
        BankError::insufficient_funds("bob", dec(300), dec(301))
    )]
    fn test_transfer_failures_leave_state_unchanged(
        #[case] from: &str,
        #[case] to: &str,
        #[case] amount: Decimal,
        #[case] expected: BankError,
    ) {
        let mut directory = alice_and_bob();
        let before = directory.clone();

        let result = directory.transfer(from, to, amount);

        assert_eq!(result, Err(expected));
        assert_eq!(directory, before);
    }

    #[test]
    fn test_transfer_destination_overflow_leaves_state_unchanged() {
        let mut directory = AccountDirectory::from_accounts(vec![
            Account::open("alice", None, dec(10)),
            Account::open("rich", None, Decimal::MAX),
        ])
        .unwrap();
        let before = directory.clone();

        let result = directory.transfer("alice", "rich", dec(10));

        assert!(matches!(result, Err(BankError::ArithmeticOverflow { .. })));
        assert_eq!(directory, before);
    }

    #[test]
    fn test_balance_matches_ledger_after_mixed_operations() {
        let mut directory = alice_and_bob();

        directory.find_mut("alice").unwrap().deposit(dec(250)).unwrap();
        directory.transfer("alice", "bob", dec(700)).unwrap();
        directory.find_mut("bob").unwrap().withdraw(dec(900)).unwrap();
        assert!(directory.transfer("bob", "alice", dec(5000)).is_err());
        directory.transfer("bob", "alice", dec(1)).unwrap();

        assert_all_consistent(&directory);
        assert_eq!(directory.find("alice").unwrap().balance, dec(1051));
        assert_eq!(directory.find("bob").unwrap().balance, dec(99));
    }

    #[test]
    fn test_from_accounts_rejects_duplicates() {
        let result = AccountDirectory::from_accounts(vec![
            Account::open("alice", None, dec(10)),
            Account::open("ALICE", None, dec(20)),
        ]);

        assert!(matches!(result, Err(BankError::StorageCorrupt { .. })));
    }

    #[test]
    fn test_from_accounts_rejects_inconsistent_ledger() {
        let mut account = Account::open("alice", None, dec(10));
        account.balance = dec(99);

        let result = AccountDirectory::from_accounts(vec![account]);

        assert!(matches!(result, Err(BankError::StorageCorrupt { .. })));
    }

    #[test]
    fn test_accounts_sorted_by_username() {
        let mut directory = AccountDirectory::new();
        for name in ["paula", "emanuel", "rodrigo"] {
            directory
                .register(&RegistrationPolicy::open(), name, None, dec(1))
                .unwrap();
        }

        let names: Vec<&str> = directory
            .accounts()
            .iter()
            .map(|a| a.username.as_str())
            .collect();

        assert_eq!(names, vec!["emanuel", "paula", "rodrigo"]);
    }
}
