use chrono::NaiveDate;

/// Coarse token estimate: one token per four characters of text.
///
/// Not a real tokenizer; only used as a conservative gate against the
/// model's context window.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Fixed thresholds gating what may be sent to the model
#[derive(Debug, Clone, Copy)]
pub struct TokenBudget {
    /// Estimated model context window; informational, gating runs on
    /// `summary_budget`
    #[allow(dead_code)]
    pub context_window: usize,
    /// Input budget for one summarization call; the gap below the context
    /// window is headroom for the model's own output
    pub summary_budget: usize,
}

impl TokenBudget {
    pub fn new(context_window: usize, summary_budget: usize) -> Self {
        Self {
            context_window,
            summary_budget,
        }
    }

    /// Whether the text may be sent for summarization
    pub fn fits(&self, text: &str) -> bool {
        estimate_tokens(text) < self.summary_budget
    }
}

/// Build the summarization prompt for a repository's commit/diff pairs
pub fn build_prompt(repo_name: &str, commit_diffs: &[(String, String)], date: NaiveDate) -> String {
    let mut prompt = format!(
        "You are an expert software engineer. Summarize the following git commit diffs \
         for repository '{}' for {}. Focus on the main changes, improvements, and bug fixes. \
         Be concise and clear.\n\n",
        repo_name,
        date.format("%Y-%m-%d")
    );

    for (commit, diff) in commit_diffs {
        prompt.push_str(&format!("Commit: {}\nDiff:\n{}\n\n", commit, diff));
    }

    prompt.push_str("Summary:");
    prompt
}

/// Build the roll-up prompt over the concatenated per-commit summaries
pub fn build_rollup_prompt(repo_name: &str, commit_summaries: &str, date: NaiveDate) -> String {
    format!(
        "You are an expert software engineer. The following are summaries of individual \
         commits pushed to repository '{}' on {}. Write one concise overall summary of the \
         day's work, covering the main changes, improvements, and bug fixes.\n\n{}\nSummary:",
        repo_name,
        date.format("%Y-%m-%d"),
        commit_summaries
    )
}
