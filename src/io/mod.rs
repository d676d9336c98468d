//! I/O module
//!
//! Handles account persistence, seeds and session scripts.
//!
//! # Components
//!
//! - `storage` - Key/value storage slots (in-memory and file-backed)
//! - `seed` - Seed sources used when storage is empty
//! - `persistence` - JSON encoding of the directory and slot load/save
//! - `csv_format` - Script record conversion and account summary output
//! - `script` - Asynchronous session script reader with batch interface

pub mod csv_format;
pub mod persistence;
pub mod script;
pub mod seed;
pub mod storage;

pub use csv_format::{convert_script_record, write_accounts_csv, ScriptRecord, ScriptStep};
pub use persistence::{decode_directory, encode_directory, load_seed, Persistence};
pub use script::ScriptReader;
pub use seed::{FileSeed, SeedSource, StaticSeed, DEMO_SEED};
pub use storage::{FileSlot, MemorySlot, StorageSlot, DEFAULT_SLOT_KEY};
