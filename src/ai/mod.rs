pub mod client;
pub mod prompt;

use async_trait::async_trait;
use std::fmt;

/// Outcome of one summarization call.
///
/// Overflow and failure are carried as variants rather than sentinel
/// strings so callers can branch on the kind; the `Display` impl keeps the
/// human-readable notice text for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The model produced a summary
    Text(String),
    /// The prompt exceeded the summarization budget and was never sent
    Overflow { estimated: usize, budget: usize },
    /// The inference call failed; carries the underlying error description
    Failed(String),
}

impl fmt::Display for SummaryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryOutcome::Text(text) => write!(f, "{}", text),
            SummaryOutcome::Overflow { estimated, budget } => write!(
                f,
                "[Skipped AI summary: ~{} tokens exceeds budget of {}]",
                estimated, budget
            ),
            SummaryOutcome::Failed(reason) => write!(f, "[AI summary failed: {}]", reason),
        }
    }
}

/// The inference collaborator seam. The production impl talks to a local
/// LM Studio style server; tests substitute a mock.
#[async_trait]
pub trait Summarize {
    /// Summarize a prompt. Never errors: failures and overflows come back
    /// as their `SummaryOutcome` variants.
    async fn summarize(&self, prompt: &str) -> SummaryOutcome;
}
