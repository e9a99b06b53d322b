use crate::error::Result;
use crate::github::RepoCommits;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Time-boxed cache of per-day commit listings.
///
/// The whole cache is one JSON document mapping date strings to entries.
/// There is no file locking: concurrent invocations race and the last
/// write silently wins, which is acceptable for a single-user CLI.
pub struct CommitCache {
    path: PathBuf,
    ttl: Duration,
}

/// On-disk entry for one date
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Unix epoch seconds of the last write
    timestamp: u64,
    commits: Vec<RepoCommits>,
}

type CacheMap = BTreeMap<String, CacheEntry>;

impl CommitCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    /// Look up the cached listing for a date.
    ///
    /// Returns `None` when the file is absent, unreadable, or malformed,
    /// and when the entry is older than the TTL. An expired entry is never
    /// partially trusted. A cached empty listing loads as `Some(vec![])`,
    /// distinct from a miss.
    pub fn load(&self, date: &str) -> Option<Vec<RepoCommits>> {
        let map = self.read_map()?;
        let entry = map.get(date)?;

        let age = now_epoch_secs().saturating_sub(entry.timestamp);
        if age >= self.ttl.as_secs() {
            debug!(date, age, "cache entry expired");
            return None;
        }

        Some(entry.commits.clone())
    }

    /// Store the listing for a date, preserving entries for other dates.
    ///
    /// A read or parse failure of the existing file is treated as an empty
    /// mapping; whatever was there is overwritten.
    pub fn save(&self, date: &str, commits: &[RepoCommits]) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(
            date.to_string(),
            CacheEntry {
                timestamp: now_epoch_secs(),
                commits: commits.to_vec(),
            },
        );

        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn read_map(&self) -> Option<CacheMap> {
        let contents = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
