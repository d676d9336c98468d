//! Seed sources
//!
//! A seed source provides the static directory snapshot used when storage is
//! empty. Fetching is asynchronous; the session start awaits it once.

use crate::types::BankError;
use std::path::PathBuf;

/// Demo accounts shipped with the open variant
pub const DEMO_SEED: &str = r#"[
  { "usuario": "emanuel", "saldo": 150000 },
  { "usuario": "rodrigo", "saldo": 90000 },
  { "usuario": "paula", "saldo": 120000 }
]"#;

/// Source of the fallback directory snapshot
#[allow(async_fn_in_trait)]
pub trait SeedSource {
    /// Fetch the raw JSON payload
    ///
    /// # Errors
    ///
    /// Returns `SeedUnavailable` if the payload cannot be fetched.
    async fn fetch(&self) -> Result<String, BankError>;
}

/// Seed read from a JSON file
#[derive(Debug, Clone)]
pub struct FileSeed {
    path: PathBuf,
}

impl FileSeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSeed { path: path.into() }
    }
}

impl SeedSource for FileSeed {
    async fn fetch(&self) -> Result<String, BankError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            BankError::seed_unavailable(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// Seed held in memory
#[derive(Debug, Clone)]
pub struct StaticSeed {
    payload: String,
}

impl StaticSeed {
    pub fn new(payload: impl Into<String>) -> Self {
        StaticSeed {
            payload: payload.into(),
        }
    }

    /// The built-in demo accounts
    pub fn demo() -> Self {
        Self::new(DEMO_SEED)
    }
}

impl SeedSource for StaticSeed {
    async fn fetch(&self) -> Result<String, BankError> {
        Ok(self.payload.clone())
    }
}
