use std::path::Path;
use std::sync::Arc;

use quiz_core::{ChallengeRules, QuestionBank};
use storage::Storage;
use tracing::info;

use crate::Clock;
use crate::challenge::ChallengeController;
use crate::error::BootstrapError;

/// Load the question bank from `path`, or the embedded bank when `None`.
///
/// # Errors
///
/// Returns `BootstrapError` if the file cannot be read or does not parse.
pub async fn load_bank(path: Option<&Path>) -> Result<QuestionBank, BootstrapError> {
    let bank = match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path).await?;
            QuestionBank::from_json(&raw)?
        }
        None => QuestionBank::embedded()?,
    };
    info!(
        source = %path.map_or_else(|| "embedded".to_owned(), |p| p.display().to_string()),
        categories = bank.categories().len(),
        questions = bank.total_questions(),
        "question bank loaded"
    );
    Ok(bank)
}

impl ChallengeController {
    /// Open a controller backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError` if storage initialization fails or the rules
    /// are inconsistent.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        rules: ChallengeRules,
        bank: QuestionBank,
    ) -> Result<Self, BootstrapError> {
        let storage = Storage::sqlite(db_url).await?;
        let controller =
            Self::open(clock, rules, Arc::new(bank), storage.progress_store()).await?;
        Ok(controller)
    }
}
