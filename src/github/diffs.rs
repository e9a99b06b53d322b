use crate::github::{CommitRecord, GitHubApi};
use std::fmt;
use tracing::warn;

/// Diff content for one commit, tagged so callers can branch on the
/// outcome instead of string-matching a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffText {
    /// Concatenated `filename\npatch` blocks for every file with a patch
    Patch(String),
    /// The fetch failed; displays as the literal placeholder
    Unavailable,
}

impl fmt::Display for DiffText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffText::Patch(text) => write!(f, "{}", text),
            DiffText::Unavailable => write!(f, "[Diff not available]"),
        }
    }
}

/// A commit paired with its diff text
#[derive(Debug, Clone)]
pub struct DiffRecord {
    /// The formatted `"<hash> <subject>"` string the commit was listed as
    pub commit: String,
    pub diff: DiffText,
}

/// Fetch diffs for every formatted commit string, in order.
///
/// A failed fetch yields `DiffText::Unavailable` for that commit and
/// processing continues; there is no partial-batch abort. Files without a
/// patch (binary, too large) contribute nothing to the diff text.
pub async fn fetch_diffs<C>(client: &C, repo_full_name: &str, commits: &[String]) -> Vec<DiffRecord>
where
    C: GitHubApi + Sync,
{
    let mut records = Vec::with_capacity(commits.len());

    for commit in commits {
        let sha = CommitRecord::parse(commit).short_hash;
        let diff = match client.get_commit(repo_full_name, &sha).await {
            Ok(detail) => {
                let blocks: Vec<String> = detail
                    .files
                    .iter()
                    .filter_map(|f| {
                        f.patch
                            .as_ref()
                            .map(|patch| format!("{}\n{}", f.filename, patch))
                    })
                    .collect();
                DiffText::Patch(blocks.join("\n"))
            }
            Err(e) => {
                warn!(repository = repo_full_name, commit = %commit, error = %e, "diff not available");
                DiffText::Unavailable
            }
        };

        records.push(DiffRecord {
            commit: commit.clone(),
            diff,
        });
    }

    records
}
