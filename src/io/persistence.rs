//! Persistence adapter
//!
//! Serializes the whole account directory into a single storage slot and
//! restores it, ledger included. The layout is a JSON array of accounts:
//!
//! ```text
//! [
//!   { "username": "alice", "pin": "1234", "saldo": 1500,
//!     "movimientos": [
//!       { "id": "...", "fecha": "...", "tipo": "DEPOSIT", "monto": 500 },
//!       { "id": "...", "fecha": "...", "tipo": "ACCOUNT_OPENED", "monto": 1000 }
//!     ] }
//! ]
//! ```
//!
//! Older snapshots without a ledger (`{ "usuario": "paula", "saldo": 120000 }`)
//! are restored with a single ACCOUNT_OPENED entry for their balance.

use crate::core::AccountDirectory;
use crate::io::seed::SeedSource;
use crate::io::storage::{StorageSlot, DEFAULT_SLOT_KEY};
use crate::types::{Account, BankError, EntryKind};
use tracing::debug;

/// Serialize a directory to the persisted JSON layout
pub fn encode_directory(directory: &AccountDirectory) -> Result<String, BankError> {
    serde_json::to_string_pretty(&directory.accounts())
        .map_err(|e| BankError::storage(format!("failed to serialize accounts: {}", e)))
}

/// Parse the persisted JSON layout into a directory
///
/// # Errors
///
/// Returns `StorageCorrupt` if the JSON is malformed or the restored accounts
/// break a directory invariant (duplicates, balance not matching the ledger).
pub fn decode_directory(raw: &str) -> Result<AccountDirectory, BankError> {
    let accounts: Vec<Account> =
        serde_json::from_str(raw).map_err(|e| BankError::storage_corrupt(e.to_string()))?;

    let accounts = accounts.into_iter().map(restore_ledger).collect();
    AccountDirectory::from_accounts(accounts)
}

fn restore_ledger(mut account: Account) -> Account {
    if account.ledger.is_empty() {
        let opening = account.balance;
        account.record_entry(EntryKind::AccountOpened, opening, None);
    }
    account
}

/// Fetch and parse the seed snapshot
///
/// # Errors
///
/// Returns `SeedUnavailable` if the fetch fails or the payload cannot be
/// parsed into a valid directory.
pub async fn load_seed<F: SeedSource>(source: &F) -> Result<AccountDirectory, BankError> {
    let payload = source.fetch().await?;

    let directory = decode_directory(&payload).map_err(|e| match e {
        BankError::StorageCorrupt { message } => BankError::seed_unavailable(message),
        other => other,
    })?;

    debug!(accounts = directory.len(), "loaded seed snapshot");
    Ok(directory)
}

/// Reads and writes the account directory through a storage slot
#[derive(Debug)]
pub struct Persistence<S: StorageSlot> {
    slot: S,
    key: String,
}

impl<S: StorageSlot> Persistence<S> {
    /// Persist under the default slot key
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Persistence {
            slot,
            key: key.into(),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the directory from the slot
    ///
    /// Returns `Ok(None)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// - `StorageCorrupt` if the stored value cannot be restored
    /// - `Storage` if the slot cannot be read
    pub fn load(&self) -> Result<Option<AccountDirectory>, BankError> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(None);
        };

        let directory = decode_directory(&raw)?;
        debug!(key = %self.key, accounts = directory.len(), "loaded accounts from storage");
        Ok(Some(directory))
    }

    /// Overwrite the slot with the full directory
    pub fn save(&mut self, directory: &AccountDirectory) -> Result<(), BankError> {
        let json = encode_directory(directory)?;
        self.slot.write(&self.key, &json)?;
        debug!(key = %self.key, accounts = directory.len(), "saved accounts");
        Ok(())
    }

    /// Destroy the persisted directory
    pub fn clear(&mut self) -> Result<(), BankError> {
        self.slot.clear(&self.key)
    }
}
