use crate::ai::prompt::{build_prompt, build_rollup_prompt, estimate_tokens, TokenBudget};
use crate::ai::{Summarize, SummaryOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::github::cache::CommitCache;
use crate::github::client::GitHubClient;
use crate::github::collector::CommitCollector;
use crate::github::diffs::{fetch_diffs, DiffRecord};
use crate::github::{DayWindow, RepoCommits};
use chrono::NaiveDate;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, warn};

/// Coordinates the pipeline: cached collection, diff retrieval, and the
/// two-level summarization flow
pub struct Orchestrator {
    github: GitHubClient,
    cache: Option<CommitCache>,
    budget: TokenBudget,
}

impl Orchestrator {
    pub fn new(config: &Config, token: String) -> Result<Self> {
        let github = GitHubClient::new(token, config.github_api_base.clone())?;

        let cache = if config.cache_enabled {
            Some(CommitCache::new(
                config.cache_path.clone(),
                Duration::from_secs(config.cache_ttl_secs),
            ))
        } else {
            None
        };

        let budget = TokenBudget::new(config.context_window_tokens, config.summary_budget_tokens);

        Ok(Self {
            github,
            cache,
            budget,
        })
    }

    /// Collect the day's commit listing, consulting the cache first.
    ///
    /// A cache write failure is logged and otherwise ignored; the listing
    /// itself is already in hand.
    pub async fn collect_commits(&self, date: NaiveDate) -> Result<Vec<RepoCommits>> {
        let key = date.format("%Y-%m-%d").to_string();

        if let Some(cache) = &self.cache {
            if let Some(groups) = cache.load(&key) {
                debug!(date = %key, "using cached commit listing");
                return Ok(groups);
            }
        }

        let collector = CommitCollector::new(&self.github);
        let groups = collector.collect(&DayWindow::new(date)).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&key, &groups) {
                warn!(error = %e, "failed to write commit cache");
            }
        }

        Ok(groups)
    }

    /// Run the two-level summarization over every repository group,
    /// streaming output as it is produced
    pub async fn run_ai_summaries<S, W>(
        &self,
        groups: &[RepoCommits],
        date: NaiveDate,
        summarizer: &S,
        out: &mut W,
    ) -> Result<()>
    where
        S: Summarize + Sync,
        W: Write,
    {
        for group in groups {
            writeln!(out, "\nRepository: {}", group.repository)?;
            let records = fetch_diffs(&self.github, &group.repository, &group.commits).await;
            summarize_repository(
                &group.repository,
                date,
                &records,
                &self.budget,
                summarizer,
                out,
            )
            .await?;
        }
        Ok(())
    }
}

/// Two-level summarization for one repository.
///
/// Level one: each commit's diff becomes a single-commit prompt and is
/// summarized and printed immediately, in listing order. Level two: the
/// per-commit summaries are concatenated and, if the block fits the
/// budget, rolled up into one repository summary; otherwise a skip notice
/// is printed and the model is never invoked for the roll-up.
pub async fn summarize_repository<S, W>(
    repo_name: &str,
    date: NaiveDate,
    records: &[DiffRecord],
    budget: &TokenBudget,
    summarizer: &S,
    out: &mut W,
) -> Result<()>
where
    S: Summarize + Sync,
    W: Write,
{
    let mut summaries: Vec<(String, SummaryOutcome)> = Vec::new();

    for record in records {
        let pair = (record.commit.clone(), record.diff.to_string());
        let prompt = build_prompt(repo_name, std::slice::from_ref(&pair), date);

        let outcome = if budget.fits(&prompt) {
            summarizer.summarize(&prompt).await
        } else {
            SummaryOutcome::Overflow {
                estimated: estimate_tokens(&prompt),
                budget: budget.summary_budget,
            }
        };

        writeln!(out, "\nCommit: {}", record.commit)?;
        writeln!(out, "{}", outcome)?;
        summaries.push((record.commit.clone(), outcome));
    }

    let block: String = summaries
        .iter()
        .map(|(commit, summary)| format!("Commit: {}\nSummary: {}\n", commit, summary))
        .collect();

    if budget.fits(&block) {
        let prompt = build_rollup_prompt(repo_name, &block, date);
        let outcome = summarizer.summarize(&prompt).await;
        writeln!(out, "\nOverall summary for {}:\n{}", repo_name, outcome)?;
    } else {
        writeln!(
            out,
            "\n[Roll-up summary for {} skipped: combined summaries exceed the model's context budget]",
            repo_name
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::diffs::DiffText;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSummarizer {
        calls: AtomicUsize,
        reply: SummaryOutcome,
    }

    impl MockSummarizer {
        fn replying(reply: SummaryOutcome) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Summarize for MockSummarizer {
        async fn summarize(&self, _prompt: &str) -> SummaryOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn records() -> Vec<DiffRecord> {
        vec![
            DiffRecord {
                commit: "abc1234 Fix bug".to_string(),
                diff: DiffText::Patch("src/lib.rs\n@@ -1 +1 @@".to_string()),
            },
            DiffRecord {
                commit: "def5678 Add feature".to_string(),
                diff: DiffText::Unavailable,
            },
        ]
    }

    #[tokio::test]
    async fn test_per_commit_summaries_stream_in_order() {
        let summarizer =
            MockSummarizer::replying(SummaryOutcome::Text("Did some work.".to_string()));
        let budget = TokenBudget::new(15_000, 12_000);
        let mut out = Vec::new();

        summarize_repository("user/repo", date(), &records(), &budget, &summarizer, &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        let first = output.find("Commit: abc1234 Fix bug").unwrap();
        let second = output.find("Commit: def5678 Add feature").unwrap();
        assert!(first < second);
        assert!(output.contains("Did some work."));
        assert!(output.contains("Overall summary for user/repo"));
        // two per-commit calls plus one roll-up
        assert_eq!(summarizer.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_diff_still_summarized() {
        let summarizer = MockSummarizer::replying(SummaryOutcome::Text("ok".to_string()));
        let budget = TokenBudget::new(15_000, 12_000);
        let mut out = Vec::new();

        let records = vec![DiffRecord {
            commit: "abc1234 Fix bug".to_string(),
            diff: DiffText::Unavailable,
        }];

        summarize_repository("user/repo", date(), &records, &budget, &summarizer, &mut out)
            .await
            .unwrap();

        // the placeholder diff is prompted like any other
        assert_eq!(summarizer.call_count(), 2);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Commit: abc1234 Fix bug"));
    }

    #[tokio::test]
    async fn test_oversized_commit_prompt_is_gated_before_the_model() {
        let summarizer = MockSummarizer::replying(SummaryOutcome::Text("never".to_string()));
        // tiny budget: every prompt overflows
        let budget = TokenBudget::new(20, 10);
        let mut out = Vec::new();

        summarize_repository("user/repo", date(), &records(), &budget, &summarizer, &mut out)
            .await
            .unwrap();

        // neither per-commit prompts nor the roll-up may reach the model:
        // the roll-up block carries the overflow notices and is itself
        // over the 10-token budget
        assert_eq!(summarizer.call_count(), 0);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("[Skipped AI summary"));
        assert!(output.contains("[Roll-up summary for user/repo skipped"));
    }

    #[tokio::test]
    async fn test_rollup_skip_notice_when_block_overflows() {
        // long per-commit summaries inflate the roll-up block past the
        // budget while each single-commit prompt still fits
        let summarizer = MockSummarizer::replying(SummaryOutcome::Text("s".repeat(2000)));
        let budget = TokenBudget::new(1200, 900);
        let mut out = Vec::new();

        let records = vec![
            DiffRecord {
                commit: "abc1234 Fix bug".to_string(),
                diff: DiffText::Patch("small".to_string()),
            },
            DiffRecord {
                commit: "def5678 Add feature".to_string(),
                diff: DiffText::Patch("small".to_string()),
            },
        ];

        summarize_repository("user/repo", date(), &records, &budget, &summarizer, &mut out)
            .await
            .unwrap();

        // only the two per-commit calls; the roll-up never reaches the model
        assert_eq!(summarizer.call_count(), 2);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("[Roll-up summary for user/repo skipped"));
        assert!(!output.contains("Overall summary for user/repo"));
    }

    #[tokio::test]
    async fn test_failed_outcome_is_printed_inline() {
        let summarizer =
            MockSummarizer::replying(SummaryOutcome::Failed("connection refused".to_string()));
        let budget = TokenBudget::new(15_000, 12_000);
        let mut out = Vec::new();

        summarize_repository("user/repo", date(), &records(), &budget, &summarizer, &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("[AI summary failed: connection refused]"));
    }

    #[tokio::test]
    async fn test_empty_records_still_roll_up() {
        let summarizer = MockSummarizer::replying(SummaryOutcome::Text("nothing".to_string()));
        let budget = TokenBudget::new(15_000, 12_000);
        let mut out = Vec::new();

        summarize_repository("user/repo", date(), &[], &budget, &summarizer, &mut out)
            .await
            .unwrap();

        // an empty block fits trivially, so exactly the roll-up call runs
        assert_eq!(summarizer.call_count(), 1);
    }
}
