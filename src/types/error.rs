//! Error types for the bank simulator
//!
//! This module defines all error types that can occur while operating the bank.
//! Errors are designed to be descriptive and user-friendly: their display text is
//! what the notifier shows to the user.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Invalid amount, username or credential
//! - **Directory Errors**: Duplicate or unknown usernames, self transfers
//! - **Balance Errors**: Insufficient funds, arithmetic overflow
//! - **Storage Errors**: Seed unavailable, corrupt or unwritable storage
//! - **Script Errors**: Missing files and malformed session script rows

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank simulator
///
/// Validation errors are recoverable: the operation is rejected and no state
/// is modified. `SeedUnavailable` is fatal to session start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Amount is zero, negative or not a number
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The rejected amount as entered
        amount: String,
    },

    /// Username is empty or shorter than the policy minimum
    #[error("Invalid username '{username}': at least {min_len} characters required")]
    InvalidUsername {
        /// The normalized username that was rejected
        username: String,
        /// Minimum accepted length
        min_len: usize,
    },

    /// PIN is too short at registration or does not match at login
    #[error("Invalid credential for '{username}'")]
    InvalidCredential {
        /// The normalized username
        username: String,
    },

    /// Username already registered
    #[error("User '{username}' already exists")]
    DuplicateUsername {
        /// The normalized username
        username: String,
    },

    /// No account with this username
    #[error("User '{username}' not found")]
    UserNotFound {
        /// The normalized username
        username: String,
    },

    /// Withdrawal or transfer exceeds the balance
    ///
    /// The account state remains unchanged.
    #[error("Insufficient funds for '{username}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account username
        username: String,
        /// Current balance
        balance: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from '{username}' to itself")]
    SelfTransfer {
        /// The normalized username
        username: String,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for '{username}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account username
        username: String,
    },

    /// Operation requires a logged-in session
    #[error("No account is logged in")]
    NotLoggedIn,

    /// Seed data could not be fetched or parsed
    ///
    /// Fatal to session start: there is no usable account data.
    #[error("Data load error: {message}")]
    SeedUnavailable {
        /// Description of the failure
        message: String,
    },

    /// Persisted storage holds malformed or inconsistent data
    ///
    /// Recovered by treating storage as absent and reseeding.
    #[error("Storage corrupt: {message}")]
    StorageCorrupt {
        /// Description of the problem
        message: String,
    },

    /// Storage slot could not be read or written
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the I/O failure
        message: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// Session script row could not be parsed
    ///
    /// Recoverable: the row is skipped.
    #[error("Script parse error{}: {message}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Storage {
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for BankError {
    fn from(error: csv_async::Error) -> Self {
        BankError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString) -> Self {
        BankError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InvalidUsername error
    pub fn invalid_username(username: &str, min_len: usize) -> Self {
        BankError::InvalidUsername {
            username: username.to_string(),
            min_len,
        }
    }

    /// Create an InvalidCredential error
    pub fn invalid_credential(username: &str) -> Self {
        BankError::InvalidCredential {
            username: username.to_string(),
        }
    }

    /// Create a DuplicateUsername error
    pub fn duplicate_username(username: &str) -> Self {
        BankError::DuplicateUsername {
            username: username.to_string(),
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(username: &str) -> Self {
        BankError::UserNotFound {
            username: username.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(username: &str, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            username: username.to_string(),
            balance,
            requested,
        }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(username: &str) -> Self {
        BankError::SelfTransfer {
            username: username.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, username: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            username: username.to_string(),
        }
    }

    /// Create a SeedUnavailable error
    pub fn seed_unavailable(message: impl ToString) -> Self {
        BankError::SeedUnavailable {
            message: message.to_string(),
        }
    }

    /// Create a StorageCorrupt error
    pub fn storage_corrupt(message: impl ToString) -> Self {
        BankError::StorageCorrupt {
            message: message.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl ToString) -> Self {
        BankError::Storage {
            message: message.to_string(),
        }
    }

    /// Create a ParseError without line information
    pub fn parse(message: impl ToString) -> Self {
        BankError::ParseError {
            line: None,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_amount(
        BankError::InvalidAmount { amount: "-5".to_string() },
        "Invalid amount '-5'"
    )]
    #[case::invalid_username(
        BankError::InvalidUsername { username: "al".to_string(), min_len: 3 },
        "Invalid username 'al': at least 3 characters required"
    )]
    #[case::duplicate_username(
        BankError::DuplicateUsername { username: "alice".to_string() },
        "User 'alice' already exists"
    )]
    #[case::user_not_found(
        BankError::UserNotFound { username: "carol".to_string() },
        "User 'carol' not found"
    )]
    #[case::insufficient_funds(
        BankError::InsufficientFunds { username: "alice".to_string(), balance: Decimal::from(1500), requested: Decimal::from(2000) },
        "Insufficient funds for 'alice': balance 1500, requested 2000"
    )]
    #[case::self_transfer(
        BankError::SelfTransfer { username: "bob".to_string() },
        "Cannot transfer from 'bob' to itself"
    )]
    #[case::not_logged_in(BankError::NotLoggedIn, "No account is logged in")]
    #[case::seed_unavailable(
        BankError::SeedUnavailable { message: "connection refused".to_string() },
        "Data load error: connection refused"
    )]
    #[case::parse_error_with_line(
        BankError::ParseError { line: Some(4), message: "unknown action".to_string() },
        "Script parse error at line 4: unknown action"
    )]
    #[case::parse_error_without_line(
        BankError::ParseError { line: None, message: "unknown action".to_string() },
        "Script parse error: unknown action"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(
        BankError::invalid_amount(Decimal::ZERO),
        BankError::InvalidAmount { amount: "0".to_string() }
    )]
    #[case::invalid_credential(
        BankError::invalid_credential("alice"),
        BankError::InvalidCredential { username: "alice".to_string() }
    )]
    #[case::arithmetic_overflow(
        BankError::arithmetic_overflow("credit", "alice"),
        BankError::ArithmeticOverflow { operation: "credit".to_string(), username: "alice".to_string() }
    )]
    fn test_helper_functions(#[case] result: BankError, #[case] expected: BankError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::Storage { .. }));
        assert_eq!(error.to_string(), "Storage error: Permission denied");
    }
}
