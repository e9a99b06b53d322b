use crate::error::Result;
use crate::github::{CommitRecord, DayWindow, GitHubApi, RepoCommits};
use tracing::{debug, warn};

/// Collects a day's authored commits across every visible repository
pub struct CommitCollector<'a, C> {
    client: &'a C,
}

impl<'a, C> CommitCollector<'a, C>
where
    C: GitHubApi + Sync,
{
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Gather all commits authored by the token's identity within the day
    /// window, grouped per repository.
    ///
    /// A repository whose commit listing fails (permissions, rate limit,
    /// API error) is skipped; one inaccessible repository must not abort
    /// the whole collection. Repositories with no matching commits are
    /// omitted.
    pub async fn collect(&self, window: &DayWindow) -> Result<Vec<RepoCommits>> {
        let login = self.client.authenticated_login().await?;
        let repos = self.client.list_repositories().await?;
        debug!(count = repos.len(), "enumerated repositories");

        let mut groups = Vec::new();
        for repo in &repos {
            let commits = match self
                .client
                .list_commits(&repo.full_name, &login, window)
                .await
            {
                Ok(commits) => commits,
                Err(e) => {
                    warn!(repository = %repo.full_name, error = %e, "skipping repository");
                    continue;
                }
            };

            let formatted: Vec<String> = commits
                .iter()
                .map(|c| CommitRecord::from_parts(&c.sha, &c.commit.message).to_string())
                .collect();

            if !formatted.is_empty() {
                groups.push(RepoCommits {
                    repository: repo.full_name.clone(),
                    commits: formatted,
                });
            }
        }

        Ok(groups)
    }
}
