use crate::error::{GitlogError, Result};
use crate::github::{DayWindow, GitHubApi};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("gitlog-summary/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;

/// Thin client over the GitHub REST v3 API
pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    /// Create a new GitHub API client
    pub fn new(token: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", self.token))
            .header("accept", GITHUB_ACCEPT)
            .header("user-agent", USER_AGENT)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GitlogError::github_api(format!(
                "GET {} failed with status {}: {}",
                path, status, error_text
            )));
        }

        Ok(response.json().await?)
    }

    /// Drain every page of a list endpoint
    async fn get_paginated<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        drain_pages(PER_PAGE, |page| {
            let mut paged: Vec<(&str, String)> = query.to_vec();
            paged.push(("per_page", PER_PAGE.to_string()));
            paged.push(("page", page.to_string()));
            async move { self.get_json(path, &paged).await }
        })
        .await
    }
}

/// Fetch pages starting at 1 until a page comes back short
async fn drain_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1usize;

    loop {
        let batch = fetch_page(page).await?;
        let len = batch.len();
        items.extend(batch);
        if len < page_size {
            break;
        }
        page += 1;
    }

    Ok(items)
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn authenticated_login(&self) -> Result<String> {
        let user: User = self.get_json("/user", &[]).await?;
        Ok(user.login)
    }

    async fn list_repositories(&self) -> Result<Vec<Repo>> {
        self.get_paginated("/user/repos", &[]).await
    }

    async fn list_commits(
        &self,
        repo_full_name: &str,
        author: &str,
        window: &DayWindow,
    ) -> Result<Vec<CommitInfo>> {
        self.get_paginated(
            &format!("/repos/{}/commits", repo_full_name),
            &[
                ("author", author.to_string()),
                ("since", window.since()),
                ("until", window.until()),
            ],
        )
        .await
    }

    async fn get_commit(&self, repo_full_name: &str, sha: &str) -> Result<CommitDetail> {
        self.get_json(&format!("/repos/{}/commits/{}", repo_full_name, sha), &[])
            .await
    }
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Repo {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub commit: CommitMessage,
}

#[derive(Debug, Deserialize)]
pub struct CommitMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    /// Absent for binary, oversized, or otherwise patchless files
    pub patch: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            GitHubClient::new("ghp_test".to_string(), "https://api.github.com/".to_string())
                .unwrap();
        // trailing slash is normalized away
        assert_eq!(client.base_url, "https://api.github.com");
    }

    #[test]
    fn test_commit_detail_deserialization() {
        let json = r#"{
            "sha": "abc1234def",
            "files": [
                {"filename": "src/lib.rs", "patch": "@@ -1 +1 @@"},
                {"filename": "image.png"}
            ]
        }"#;
        let detail: CommitDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.files.len(), 2);
        assert_eq!(detail.files[0].filename, "src/lib.rs");
        assert!(detail.files[0].patch.is_some());
        assert!(detail.files[1].patch.is_none());
    }

    #[test]
    fn test_commit_info_deserialization_missing_message() {
        let json = r#"{"sha": "abc1234def", "commit": {}}"#;
        let info: CommitInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sha, "abc1234def");
        assert_eq!(info.commit.message, "");
    }

    #[tokio::test]
    async fn test_drain_pages_collects_across_full_pages() {
        let pages = vec![vec![1, 2], vec![3, 4], vec![5]];
        let mut calls = 0usize;

        let items = drain_pages(2, |page| {
            calls += 1;
            let batch = pages[page - 1].clone();
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_drain_pages_stops_on_short_first_page() {
        let mut calls = 0usize;

        let items = drain_pages(100, |_page| {
            calls += 1;
            async move { Ok(vec!["only".to_string()]) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_drain_pages_full_page_then_empty() {
        let mut calls = 0usize;

        let items = drain_pages(2, |page| {
            calls += 1;
            let batch = if page == 1 { vec![1, 2] } else { vec![] };
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_drain_pages_propagates_errors() {
        let result: crate::error::Result<Vec<i32>> = drain_pages(2, |page| async move {
            if page == 1 {
                Ok(vec![1, 2])
            } else {
                Err(GitlogError::github_api("status 403: rate limited"))
            }
        })
        .await;

        assert!(result.is_err());
    }
}
