//! Asynchronous session script reader
//!
//! Provides a batch interface over the rows of a session script.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → ScriptReader → Batches of ScriptSteps
//!                  ↓
//!           csv_format module
//!           (ScriptRecord, convert_script_record)
//! ```

use crate::io::csv_format::{convert_script_record, ScriptRecord, ScriptStep};
use crate::types::BankError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous session script reader
///
/// Rows that cannot be parsed or converted are logged and skipped.
pub struct ScriptReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send> ScriptReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rows_read: 0,
        }
    }

    /// Read up to `batch_size` converted steps
    ///
    /// Returns an empty vector once the script is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ScriptStep> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ScriptRecord>();

        while batch.len() < batch_size {
            let Some(result) = records.next().await else {
                break;
            };
            self.rows_read += 1;
            // Line 1 is the header
            let line = self.rows_read + 1;

            match result
                .map_err(BankError::from)
                .and_then(|record| convert_script_record(record, line))
            {
                Ok(step) => batch.push(step),
                Err(e) => warn!(line, error = %e, "skipping script row"),
            }
        }

        batch
    }
}
