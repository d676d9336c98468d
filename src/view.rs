//! View descriptions
//!
//! `render` maps session state to a plain description of what the user sees.
//! It is pure: callers re-invoke it after every state transition and hand the
//! result to whatever draws the screen.

use crate::core::{AccountDirectory, Session};
use crate::types::{LedgerEntry, RECENT_ENTRIES_LIMIT};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// What the user currently sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Login and registration forms
    LoggedOut,
    /// Account panel of the logged-in user
    Account(AccountView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub username: String,
    pub balance: String,
    /// Newest first, at most `RECENT_ENTRIES_LIMIT`
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub date: String,
    pub kind: &'static str,
    pub amount: String,
    pub detail: Option<String>,
}

impl From<&LedgerEntry> for EntryView {
    fn from(entry: &LedgerEntry) -> Self {
        let sign = if entry.is_credit() { "+" } else { "" };
        EntryView {
            date: entry.timestamp.format("%d/%m/%Y %H:%M").to_string(),
            kind: entry.kind.label(),
            amount: format!("{}{}", sign, format_currency(entry.amount)),
            detail: entry.detail.clone(),
        }
    }
}

/// Render the view for the given session state
pub fn render(session: &Session, directory: &AccountDirectory) -> View {
    match session.current(directory) {
        Ok(account) => View::Account(AccountView {
            username: account.username.clone(),
            balance: format_currency(account.balance),
            entries: account
                .recent_entries(RECENT_ENTRIES_LIMIT)
                .iter()
                .map(EntryView::from)
                .collect(),
        }),
        Err(_) => View::LoggedOut,
    }
}

/// Format an amount as `$` followed by Argentine-style digits
///
/// Thousands are grouped with `.`, decimals use `,` and are cut at three
/// places: `150000` → `$150.000`, `1234.5` → `$1.234,5`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("${}{},{}", sign, grouped, fraction),
        None => format!("${}{}", sign, grouped),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::LoggedOut => write!(f, "[logged out]"),
            View::Account(account) => {
                writeln!(f, "{} | balance {}", account.username, account.balance)?;
                for entry in &account.entries {
                    write!(f, "  {} {:<17} {:>14}", entry.date, entry.kind, entry.amount)?;
                    if let Some(detail) = &entry.detail {
                        write!(f, " ({})", detail)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    }
}
