//! CSV format handling for session scripts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - ScriptRecord structure for deserialization
//! - Conversion from script records to intents
//! - Account summary serialization
//!
//! Conversion is pure (no I/O) for easy testing.

use crate::core::{parse_amount, Intent};
use crate::types::{Account, BankError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;

/// Session script row
///
/// Matches the script format with columns: action, user, pin, amount, target,
/// confirm. Only `action` is required; which other columns matter depends on
/// the action.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ScriptRecord {
    pub action: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub confirm: Option<String>,
}

/// One converted script row
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    /// Line of the row in the script file
    pub line: u64,
    pub intent: Intent,
    /// Answer to any confirmation prompt the intent raises
    pub confirm: bool,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn parse_confirm(raw: Option<String>) -> Result<bool, BankError> {
    match non_empty(raw) {
        None => Ok(true),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "si" | "sí" => Ok(true),
            "no" | "n" | "false" => Ok(false),
            other => Err(BankError::parse(format!(
                "invalid confirm value '{}'",
                other
            ))),
        },
    }
}

/// Convert a ScriptRecord into a ScriptStep
///
/// Missing usernames become empty strings so the bank reports them as
/// invalid or unknown users; a missing initial balance defaults to zero.
///
/// # Errors
///
/// - `ParseError` for an unknown action or confirm value
/// - `InvalidAmount` for an amount that is missing or not a number
pub fn convert_script_record(record: ScriptRecord, line: u64) -> Result<ScriptStep, BankError> {
    let user = non_empty(record.user).unwrap_or_default();
    let pin = non_empty(record.pin);
    let amount = non_empty(record.amount);

    let intent = match record.action.trim().to_lowercase().as_str() {
        "register" => Intent::Register {
            username: user,
            pin,
            initial_balance: match amount {
                Some(raw) => parse_amount(&raw)?,
                None => Decimal::ZERO,
            },
        },
        "login" => Intent::Login {
            username: user,
            pin,
        },
        "logout" => Intent::Logout,
        "balance" => Intent::ConsultBalance,
        "deposit" => Intent::Deposit {
            amount: parse_amount(&amount.unwrap_or_default())?,
        },
        "withdraw" => Intent::Withdraw {
            amount: parse_amount(&amount.unwrap_or_default())?,
        },
        "transfer" => Intent::Transfer {
            to: non_empty(record.target).unwrap_or_default(),
            amount: parse_amount(&amount.unwrap_or_default())?,
        },
        other => {
            return Err(BankError::ParseError {
                line: Some(line),
                message: format!("unknown action '{}'", other),
            })
        }
    };

    Ok(ScriptStep {
        line,
        intent,
        confirm: parse_confirm(record.confirm)?,
    })
}

/// Write the account summary in CSV format
///
/// Columns: username, balance, entries. Rows come in the order given, which
/// is sorted by username when taken from `AccountDirectory::accounts`.
pub fn write_accounts_csv(accounts: &[&Account], output: &mut dyn Write) -> Result<(), BankError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["username", "balance", "entries"])
        .map_err(|e| BankError::storage(format!("Failed to write CSV header: {}", e)))?;

    for account in accounts {
        writer
            .write_record(&[
                account.username.clone(),
                account.balance.normalize().to_string(),
                account.ledger.len().to_string(),
            ])
            .map_err(|e| {
                BankError::storage(format!(
                    "Failed to write account '{}': {}",
                    account.username, e
                ))
            })?;
    }

    writer
        .flush()
        .map_err(|e| BankError::storage(format!("Failed to flush CSV writer: {}", e)))?;

    Ok(())
}
