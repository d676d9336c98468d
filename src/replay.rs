//! Session script replay
//!
//! Drives a `Bank` from a session script and writes the resulting account
//! summary:
//!
//! ```text
//! script.csv → ScriptReader (batches) → Bank::dispatch → write_accounts_csv
//!                                          ↑
//!                         FileSlot (storage dir) + seed source
//! ```
//!
//! Rejected intents are logged and skipped. Only a missing script, an
//! unavailable seed or an unusable storage directory abort the replay.

use crate::core::{Bank, Notice, NoticeLevel, Notifier, Outcome, RegistrationPolicy};
use crate::io::csv_format::write_accounts_csv;
use crate::io::script::ScriptReader;
use crate::io::seed::{FileSeed, SeedSource, StaticSeed};
use crate::io::storage::FileSlot;
use crate::types::BankError;
use crate::view::render;
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of script rows read per batch
pub const SCRIPT_BATCH_SIZE: usize = 256;

/// Replay configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Directory holding the storage slot file
    pub storage_dir: PathBuf,
    /// Seed file; the built-in demo seed is used when absent
    pub seed: Option<PathBuf>,
    pub policy: RegistrationPolicy,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("."),
            seed: None,
            policy: RegistrationPolicy::default(),
        }
    }
}

/// Counts of what happened to the dispatched rows
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub cancelled: usize,
    pub rejected: usize,
}

/// Notifier for unattended runs
///
/// Notices go to the log; prompts are answered from the queue filled by
/// the replay, and default to yes.
#[derive(Debug, Default)]
pub struct ScriptNotifier {
    answers: VecDeque<bool>,
}

impl ScriptNotifier {
    pub fn queue_answer(&mut self, answer: bool) {
        self.answers.push_back(answer);
    }

    pub fn clear_answers(&mut self) {
        self.answers.clear();
    }
}

impl Notifier for ScriptNotifier {
    fn show(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => debug!(notice = %notice.message, "error notice"),
            NoticeLevel::Info | NoticeLevel::Success => info!("{}", notice.message),
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = self.answers.pop_front().unwrap_or(true);
        info!(prompt, answer, "confirmation");
        answer
    }
}

/// Replays session scripts against a file-backed bank
#[derive(Debug, Clone)]
pub struct SessionReplay {
    config: ReplayConfig,
}

impl SessionReplay {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay `script_path` and write the account summary to `output`
    ///
    /// Runs the replay on a current-thread tokio runtime.
    pub fn process(
        &self,
        script_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, BankError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| BankError::storage(format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(self.process_async(script_path, output))
    }

    /// Async body of `process`, for callers that already run a runtime
    pub async fn process_async(
        &self,
        script_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, BankError> {
        let file = tokio::fs::File::open(script_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BankError::FileNotFound {
                    path: script_path.display().to_string(),
                }
            } else {
                BankError::from(e)
            }
        })?;

        let summary = match &self.config.seed {
            Some(path) => self.run(file, &FileSeed::new(path), output).await?,
            None => self.run(file, &StaticSeed::demo(), output).await?,
        };

        info!(
            applied = summary.applied,
            cancelled = summary.cancelled,
            rejected = summary.rejected,
            "replay finished"
        );
        Ok(summary)
    }

    async fn run<F: SeedSource>(
        &self,
        script: tokio::fs::File,
        seed: &F,
        output: &mut dyn Write,
    ) -> Result<ReplaySummary, BankError> {
        let slot = FileSlot::new(&self.config.storage_dir);
        let mut bank = Bank::start(
            slot,
            seed,
            self.config.policy,
            ScriptNotifier::default(),
        )
        .await?;

        let compat_script = tokio_util::compat::TokioAsyncReadCompatExt::compat(script);
        let mut reader = ScriptReader::new(compat_script);
        let mut summary = ReplaySummary::default();

        loop {
            let batch = reader.read_batch(SCRIPT_BATCH_SIZE).await;
            if batch.is_empty() {
                break;
            }

            for step in batch {
                let action = step.intent.action();
                bank.notifier_mut().queue_answer(step.confirm);
                match bank.dispatch(step.intent) {
                    Ok(Outcome::Applied) => summary.applied += 1,
                    Ok(Outcome::Cancelled) => summary.cancelled += 1,
                    Err(e) => {
                        summary.rejected += 1;
                        warn!(line = step.line, action, error = %e, "intent rejected");
                    }
                }
                bank.notifier_mut().clear_answers();
            }
        }

        debug!(view = %render(bank.session(), bank.directory()), "final view");

        write_accounts_csv(&bank.directory().accounts(), output)?;
        Ok(summary)
    }
}
