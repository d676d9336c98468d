//! Session controller
//!
//! Holds at most one current account. The session is either logged out
//! (`current == None`) or logged in as exactly one normalized username.
//! The balance operations resolve the current account against the directory
//! on every call, so the session never holds a reference into it.

use crate::core::directory::{AccountDirectory, TransferPlan};
use crate::types::{normalize_username, Account, BankError};
use rust_decimal::Decimal;

/// Login state of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<String>,
}

impl Session {
    /// Create a logged-out session
    pub fn new() -> Self {
        Session { current: None }
    }

    /// Whether an account is logged in
    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Username of the current account, if any
    pub fn current_username(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Log in as `username`
    ///
    /// Accounts without a stored PIN accept any credential.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no account matches the normalized username
    /// - `InvalidCredential` if the PIN does not match
    pub fn login<'a>(
        &mut self,
        directory: &'a AccountDirectory,
        username: &str,
        pin: Option<&str>,
    ) -> Result<&'a Account, BankError> {
        let username = normalize_username(username);
        let account = directory
            .find(&username)
            .ok_or_else(|| BankError::user_not_found(&username))?;

        if !account.pin_matches(pin) {
            return Err(BankError::invalid_credential(&username));
        }

        self.current = Some(account.username.clone());
        Ok(account)
    }

    /// Log out, returning the username that was logged in
    ///
    /// Only clears the current-account reference; storage is untouched.
    pub fn logout(&mut self) -> Option<String> {
        self.current.take()
    }

    /// Resolve the current account
    ///
    /// # Errors
    ///
    /// - `NotLoggedIn` if the session is logged out
    /// - `UserNotFound` if the account is no longer in the directory
    pub fn current<'a>(&self, directory: &'a AccountDirectory) -> Result<&'a Account, BankError> {
        let username = self.current.as_deref().ok_or(BankError::NotLoggedIn)?;
        directory
            .find(username)
            .ok_or_else(|| BankError::user_not_found(username))
    }

    fn current_mut<'a>(
        &self,
        directory: &'a mut AccountDirectory,
    ) -> Result<&'a mut Account, BankError> {
        let username = self.current.as_deref().ok_or(BankError::NotLoggedIn)?;
        directory
            .find_mut(username)
            .ok_or_else(|| BankError::user_not_found(username))
    }

    /// Balance of the current account
    pub fn consult_balance(&self, directory: &AccountDirectory) -> Result<Decimal, BankError> {
        Ok(self.current(directory)?.balance)
    }

    /// Deposit into the current account
    pub fn deposit(
        &self,
        directory: &mut AccountDirectory,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        let account = self.current_mut(directory)?;
        account.deposit(amount)?;
        Ok(account.balance)
    }

    /// Withdraw from the current account
    pub fn withdraw(
        &self,
        directory: &mut AccountDirectory,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        let account = self.current_mut(directory)?;
        account.withdraw(amount)?;
        Ok(account.balance)
    }

    /// Validate a transfer from the current account to `to`
    pub fn plan_transfer(
        &self,
        directory: &AccountDirectory,
        to: &str,
        amount: Decimal,
    ) -> Result<TransferPlan, BankError> {
        let from = self.current(directory)?.username.as_str();
        directory.plan_transfer(from, to, amount)
    }

    /// Transfer from the current account to `to`
    pub fn transfer(
        &self,
        directory: &mut AccountDirectory,
        to: &str,
        amount: Decimal,
    ) -> Result<(), BankError> {
        let plan = self.plan_transfer(directory, to, amount)?;
        directory.apply_transfer(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::RegistrationPolicy;
    use crate::types::EntryKind;
    use rstest::rstest;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn directory() -> AccountDirectory {
        let policy = RegistrationPolicy::pin_protected();
        let mut directory = AccountDirectory::new();
        directory
            .register(&policy, "alice", Some("1234"), dec(1000))
            .unwrap();
        directory
            .register(&policy, "bob", Some("5678"), dec(300))
            .unwrap();
        directory
    }

    #[test]
    fn test_new_session_is_logged_out() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.current_username(), None);
    }

    #[rstest]
    #[case::exact("alice", "1234")]
    #[case::upper("ALICE", "1234")]
    #[case::padded(" Alice ", "1234")]
    fn test_login_succeeds(#[case] username: &str, #[case] pin: &str) {
        let directory = directory();
        let mut session = Session::new();

        let account = session.login(&directory, username, Some(pin)).unwrap();

        assert_eq!(account.username, "alice");
        assert_eq!(session.current_username(), Some("alice"));
    }

    #[rstest]
    #[case::unknown_user("carol", Some("1234"), BankError::user_not_found("carol"))]
    #[case::wrong_pin("alice", Some("9999"), BankError::invalid_credential("alice"))]
    #[case::missing_pin("alice", None, BankError::invalid_credential("alice"))]
    #[case::padded_pin("alice", Some(" 1234 "), BankError::invalid_credential("alice"))]
    fn test_login_failures_stay_logged_out(
        #[case] username: &str,
        #[case] pin: Option<&str>,
        #[case] expected: BankError,
    ) {
        let directory = directory();
        let mut session = Session::new();

        let result = session.login(&directory, username, pin);

        assert_eq!(result, Err(expected));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_logout_clears_current_account_only() {
        let directory = directory();
        let mut session = Session::new();
        session.login(&directory, "alice", Some("1234")).unwrap();

        assert_eq!(session.logout(), Some("alice".to_string()));
        assert!(!session.is_logged_in());
        assert_eq!(directory.len(), 2);
        assert_eq!(session.logout(), None);
    }

    #[test]
    fn test_operations_require_login() {
        let mut directory = directory();
        let session = Session::new();

        assert_eq!(
            session.consult_balance(&directory),
            Err(BankError::NotLoggedIn)
        );
        assert_eq!(
            session.deposit(&mut directory, dec(10)),
            Err(BankError::NotLoggedIn)
        );
        assert_eq!(
            session.withdraw(&mut directory, dec(10)),
            Err(BankError::NotLoggedIn)
        );
        assert_eq!(
            session.transfer(&mut directory, "bob", dec(10)),
            Err(BankError::NotLoggedIn)
        );
    }

    #[test]
    fn test_logged_in_scenario() {
        let mut directory = directory();
        let mut session = Session::new();
        session.login(&directory, "ALICE", Some("1234")).unwrap();

        assert_eq!(session.deposit(&mut directory, dec(500)), Ok(dec(1500)));
        let alice = session.current(&directory).unwrap();
        assert_eq!(alice.ledger[0].kind, EntryKind::Deposit);
        assert_eq!(alice.ledger[0].amount, dec(500));

        assert_eq!(
            session.withdraw(&mut directory, dec(2000)),
            Err(BankError::insufficient_funds("alice", dec(1500), dec(2000)))
        );
        assert_eq!(session.consult_balance(&directory), Ok(dec(1500)));

        session.transfer(&mut directory, "bob", dec(1500)).unwrap();
        assert_eq!(session.consult_balance(&directory), Ok(Decimal::ZERO));
        assert_eq!(directory.find("bob").unwrap().balance, dec(1800));
    }
}
