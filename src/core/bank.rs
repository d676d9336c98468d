//! Bank application context
//!
//! This module provides the `Bank` struct, the single owner of a session's
//! state. Every user intent is dispatched here:
//!
//! ```text
//! intent → Bank → Session / AccountDirectory / Account (validate + mutate a copy)
//!               → Persistence::save (whole copy) → copy replaces the directory
//!               → Notifier::show
//! ```
//!
//! Each operation either fully applies, in memory and in storage, or leaves
//! state untouched. Failures are
//! shown to the user as error notices and returned to the caller.

use crate::core::directory::AccountDirectory;
use crate::core::policy::RegistrationPolicy;
use crate::core::session::Session;
use crate::core::traits::{Notice, Notifier};
use crate::io::persistence::{load_seed, Persistence};
use crate::io::seed::SeedSource;
use crate::io::storage::StorageSlot;
use crate::types::{Account, BankError};
use crate::view::format_currency;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, warn};

/// Result of an operation guarded by a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran
    Applied,
    /// The user declined; nothing changed
    Cancelled,
}

/// A user intent, as produced by a form submission or a script row
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Register {
        username: String,
        pin: Option<String>,
        initial_balance: Decimal,
    },
    Login {
        username: String,
        pin: Option<String>,
    },
    Logout,
    ConsultBalance,
    Deposit {
        amount: Decimal,
    },
    Withdraw {
        amount: Decimal,
    },
    Transfer {
        to: String,
        amount: Decimal,
    },
}

impl Intent {
    /// Short name used in logs and scripts
    pub fn action(&self) -> &'static str {
        match self {
            Intent::Register { .. } => "register",
            Intent::Login { .. } => "login",
            Intent::Logout => "logout",
            Intent::ConsultBalance => "balance",
            Intent::Deposit { .. } => "deposit",
            Intent::Withdraw { .. } => "withdraw",
            Intent::Transfer { .. } => "transfer",
        }
    }
}

/// Parse a user-entered amount
///
/// # Errors
///
/// Returns `InvalidAmount` for anything that is not a decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, BankError> {
    Decimal::from_str(raw.trim()).map_err(|_| BankError::invalid_amount(raw.trim()))
}

/// Owning context of one simulator session
pub struct Bank<S: StorageSlot, N: Notifier> {
    directory: AccountDirectory,
    session: Session,
    persistence: Persistence<S>,
    policy: RegistrationPolicy,
    notifier: N,
}

impl<S: StorageSlot, N: Notifier> Bank<S, N> {
    /// Start a session
    ///
    /// Loads the directory from storage; when storage is empty or corrupt, the
    /// seed is fetched instead. The directory is persisted right away.
    ///
    /// # Errors
    ///
    /// - `SeedUnavailable` if the seed is needed and cannot be loaded (also
    ///   shown to the user; there is no retry)
    /// - `Storage` if the slot cannot be read or written
    pub async fn start<F: SeedSource>(
        slot: S,
        seed: &F,
        policy: RegistrationPolicy,
        mut notifier: N,
    ) -> Result<Self, BankError> {
        let mut persistence = Persistence::new(slot);

        let stored = match persistence.load() {
            Ok(stored) => stored,
            Err(BankError::StorageCorrupt { message }) => {
                warn!(%message, "stored accounts are corrupt, reseeding");
                None
            }
            Err(e) => return Err(e),
        };

        let directory = match stored {
            Some(directory) => directory,
            None => match load_seed(seed).await {
                Ok(directory) => directory,
                Err(e) => {
                    notifier.show(Notice::error(e.to_string()));
                    return Err(e);
                }
            },
        };

        persistence.save(&directory)?;
        info!(accounts = directory.len(), "session started");

        Ok(Bank {
            directory,
            session: Session::new(),
            persistence,
            policy,
            notifier,
        })
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> &RegistrationPolicy {
        &self.policy
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// The logged-in account, if any
    pub fn current_account(&self) -> Option<&Account> {
        self.session.current(&self.directory).ok()
    }

    /// Dispatch one intent to the matching operation
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, BankError> {
        match intent {
            Intent::Register {
                username,
                pin,
                initial_balance,
            } => self
                .register(&username, pin.as_deref(), initial_balance)
                .map(|_| Outcome::Applied),
            Intent::Login { username, pin } => {
                self.login(&username, pin.as_deref()).map(|_| Outcome::Applied)
            }
            Intent::Logout => Ok(self.logout()),
            Intent::ConsultBalance => self.consult_balance().map(|_| Outcome::Applied),
            Intent::Deposit { amount } => self.deposit(amount).map(|_| Outcome::Applied),
            Intent::Withdraw { amount } => self.withdraw(amount).map(|_| Outcome::Applied),
            Intent::Transfer { to, amount } => self.transfer(&to, amount),
        }
    }

    /// Register a new account and persist it
    pub fn register(
        &mut self,
        username: &str,
        pin: Option<&str>,
        initial_balance: Decimal,
    ) -> Result<(), BankError> {
        let policy = self.policy;
        let username = self.commit(|directory, _| {
            directory
                .register(&policy, username, pin, initial_balance)
                .map(|account| account.username.clone())
        })?;

        info!(%username, %initial_balance, "account registered");
        self.notifier
            .show(Notice::success(format!("Account '{}' created.", username)));
        Ok(())
    }

    /// Log in; the session is unchanged on failure
    pub fn login(&mut self, username: &str, pin: Option<&str>) -> Result<(), BankError> {
        let result = self
            .session
            .login(&self.directory, username, pin)
            .map(|account| account.username.clone());
        let username = self.report(result)?;

        info!(%username, "logged in");
        self.notifier
            .show(Notice::success(format!("Welcome {}.", username)));
        Ok(())
    }

    /// Log out after confirmation
    ///
    /// Logging out while logged out is a no-op and asks nothing.
    pub fn logout(&mut self) -> Outcome {
        if !self.session.is_logged_in() {
            return Outcome::Applied;
        }
        if !self.notifier.confirm("Log out?") {
            return Outcome::Cancelled;
        }

        if let Some(username) = self.session.logout() {
            info!(%username, "logged out");
        }
        self.notifier.show(Notice::info("Session closed."));
        Outcome::Applied
    }

    /// Show and return the balance of the current account
    pub fn consult_balance(&mut self) -> Result<Decimal, BankError> {
        let result = self.session.consult_balance(&self.directory);
        let balance = self.report(result)?;

        self.notifier.show(Notice::success(format!(
            "Your balance is {}.",
            format_currency(balance)
        )));
        Ok(balance)
    }

    /// Deposit into the current account
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        let balance = self.commit(|directory, session| session.deposit(directory, amount))?;

        info!(username = self.session.current_username(), %amount, "deposit");
        self.notifier.show(Notice::success("Deposit completed."));
        Ok(balance)
    }

    /// Withdraw from the current account
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        let balance = self.commit(|directory, session| session.withdraw(directory, amount))?;

        info!(username = self.session.current_username(), %amount, "withdrawal");
        self.notifier.show(Notice::success("Withdrawal completed."));
        Ok(balance)
    }

    /// Transfer from the current account after confirmation
    ///
    /// The transfer is validated before the prompt, so the user is only asked
    /// about transfers that can succeed.
    pub fn transfer(&mut self, to: &str, amount: Decimal) -> Result<Outcome, BankError> {
        let result = self.session.plan_transfer(&self.directory, to, amount);
        let plan = self.report(result)?;

        let prompt = format!("Transfer {} to {}?", format_currency(plan.amount), plan.to);
        if !self.notifier.confirm(&prompt) {
            return Ok(Outcome::Cancelled);
        }

        let (from, to, amount) = (plan.from.clone(), plan.to.clone(), plan.amount);
        self.commit(|directory, _| directory.apply_transfer(plan))?;

        info!(%from, %to, %amount, "transfer");
        self.notifier.show(Notice::success(format!(
            "Transferred {} to {}.",
            format_currency(amount),
            to
        )));
        Ok(Outcome::Applied)
    }

    /// Apply `change` to a copy of the directory and keep the copy once saved
    ///
    /// A failed change or a failed save leaves the directory as it was.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut AccountDirectory, &Session) -> Result<T, BankError>,
    ) -> Result<T, BankError> {
        let mut candidate = self.directory.clone();
        let result = change(&mut candidate, &self.session);
        let value = self.report(result)?;

        let saved = self.persistence.save(&candidate);
        self.report(saved)?;

        self.directory = candidate;
        Ok(value)
    }

    /// Surface a failure to the user before handing it back
    fn report<T>(&mut self, result: Result<T, BankError>) -> Result<T, BankError> {
        if let Err(e) = &result {
            warn!(error = %e, "operation rejected");
            self.notifier.show(Notice::error(e.to_string()));
        }
        result
    }
}
