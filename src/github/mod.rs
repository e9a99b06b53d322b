pub mod cache;
pub mod client;
pub mod collector;
pub mod diffs;

use crate::error::Result;
use crate::github::client::{CommitDetail, CommitInfo, Repo};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The GitHub collaborator seam. The production impl is the REST client;
/// tests substitute mocks to exercise the skip-and-continue paths.
#[async_trait]
pub trait GitHubApi {
    /// Resolve the login of the identity behind the token
    async fn authenticated_login(&self) -> Result<String>;

    /// Enumerate every repository visible to the authenticated identity
    async fn list_repositories(&self) -> Result<Vec<Repo>>;

    /// Commits authored by `author` within the day window, in API order
    /// (reverse-chronological)
    async fn list_commits(
        &self,
        repo_full_name: &str,
        author: &str,
        window: &DayWindow,
    ) -> Result<Vec<CommitInfo>>;

    /// A single commit with its changed-file list and optional patches
    async fn get_commit(&self, repo_full_name: &str, sha: &str) -> Result<CommitDetail>;
}

/// A single authored commit, reduced to the form the tool works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// First 7 characters of the full commit hash
    pub short_hash: String,
    /// First line of the commit message (may be empty)
    pub subject: String,
}

impl CommitRecord {
    /// Build a record from a full hash and full commit message
    pub fn from_parts(sha: &str, message: &str) -> Self {
        let short_hash = sha.chars().take(7).collect();
        let subject = message.lines().next().unwrap_or("").to_string();
        Self {
            short_hash,
            subject,
        }
    }

    /// Parse the `"<hash> <subject>"` form used in the cache and the report
    pub fn parse(formatted: &str) -> Self {
        let mut parts = formatted.splitn(2, char::is_whitespace);
        let short_hash = parts.next().unwrap_or("").to_string();
        let subject = parts.next().unwrap_or("").to_string();
        Self {
            short_hash,
            subject,
        }
    }
}

impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "{}", self.short_hash)
        } else {
            write!(f, "{} {}", self.short_hash, self.subject)
        }
    }
}

/// All matching commits for one repository, in API retrieval order
/// (reverse-chronological). Repositories with no matching commits never
/// produce a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCommits {
    /// Repository full name, e.g. `owner/repo`
    pub repository: String,
    /// Formatted `"<hash> <subject>"` strings
    pub commits: Vec<String>,
}

/// Half-open day window `[date 00:00:00, date+1 00:00:00)`.
///
/// The bounds are rendered with a `Z` suffix because the GitHub API requires
/// an offset, but no local-time conversion is performed: the window is the
/// calendar date exactly as the user typed it. Behavior across timezone
/// boundaries is therefore imprecise.
#[derive(Debug, Clone, Copy)]
pub struct DayWindow {
    pub date: NaiveDate,
}

impl DayWindow {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Inclusive lower bound, ISO-8601
    pub fn since(&self) -> String {
        format!("{}T00:00:00Z", self.date.format("%Y-%m-%d"))
    }

    /// Exclusive upper bound, ISO-8601
    pub fn until(&self) -> String {
        let next = self.date + chrono::Duration::days(1);
        format!("{}T00:00:00Z", next.format("%Y-%m-%d"))
    }
}
