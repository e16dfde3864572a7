use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub term: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only log of search terms kept by an external collaborator. The
/// service only ever appends and lists the most recent entries.
#[async_trait]
pub trait SearchHistoryStore: Send + Sync {
    async fn append(&self, term: &str) -> anyhow::Result<()>;
    /// Most recent entries first.
    async fn latest(&self, limit: usize) -> anyhow::Result<Vec<SearchHistoryEntry>>;
}

#[derive(Default)]
pub struct InMemorySearchHistory {
    entries: Mutex<Vec<SearchHistoryEntry>>,
}

#[async_trait]
impl SearchHistoryStore for InMemorySearchHistory {
    async fn append(&self, term: &str) -> anyhow::Result<()> {
        if term.trim().is_empty() {
            warn!(term, "refusing to record blank search term");
            return Ok(());
        }
        let mut guard = self.entries.lock().await;
        guard.push(SearchHistoryEntry {
            term: term.to_string(),
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    async fn latest(&self, limit: usize) -> anyhow::Result<Vec<SearchHistoryEntry>> {
        let guard = self.entries.lock().await;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}
