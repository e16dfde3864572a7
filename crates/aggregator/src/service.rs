use std::sync::Arc;
use std::time::Duration;

use analysis::{compute_impacts, CoderImpact};
use cache::Cache;
use gh_api::client::RemoteClient;
use gh_api::decode::{decode_array, decode_object};
use gh_api::models::{Commit, Repository, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::history::{SearchHistoryEntry, SearchHistoryStore};
use crate::live::LiveSearchHub;

const SEARCH_URL: &str = "https://github.com/api/v2/json/repos/search/{}?start_page={}";
const COMMITS_URL: &str = "https://github.com/api/v2/json/commits/list/{}/{}/master?page={}";
const USER_URL: &str = "https://github.com/api/v2/json/user/show/{}";
const REPOSITORY_URL: &str = "https://github.com/api/v2/json/repos/show/{}/{}";
const CONTRIBUTORS_URL: &str = "https://github.com/api/v2/json/repos/show/{}/{}/contributors";

/// Commit listing stops issuing further pages once this many commits have
/// accumulated. A page fetched just before the bound is kept whole, so the
/// result may slightly overshoot.
pub const COMMIT_WINDOW: usize = 100;

/// Number of entries handed back by `latest_searches`.
pub const LATEST_SEARCH_LIMIT: usize = 20;

/// The only error that crosses the service boundary: a required string
/// parameter was blank. Everything else degrades to a default result.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid input parameter: {param}")]
pub struct InvalidInput {
    pub param: &'static str,
}

fn require(param: &'static str, value: &str) -> Result<(), InvalidInput> {
    if value.trim().is_empty() {
        Err(InvalidInput { param })
    } else {
        Ok(())
    }
}

/// Read-side aggregation over the hosting API: five lookups plus the derived
/// coder-impact metric, each cached for a uniform TTL. Collaborators are
/// injected at construction so tests can substitute fakes.
pub struct GithubService {
    client: Arc<dyn RemoteClient>,
    cache: Arc<dyn Cache>,
    history: Arc<dyn SearchHistoryStore>,
    live: LiveSearchHub,
    cache_ttl: Duration,
}

impl GithubService {
    pub fn new(
        client: Arc<dyn RemoteClient>,
        cache: Arc<dyn Cache>,
        history: Arc<dyn SearchHistoryStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            client,
            cache,
            history,
            live: LiveSearchHub::default(),
            cache_ttl,
        }
    }

    /// Wires the default collaborators: reqwest client, in-memory LRU cache,
    /// in-memory search history.
    pub fn from_config(config: &common::AppConfig) -> Self {
        Self::new(
            Arc::new(gh_api::client::HttpRemoteClient::new(
                &config.github.user_agent,
            )),
            Arc::new(cache::MemoryCache::new(config.cache.capacity)),
            Arc::new(crate::history::InMemorySearchHistory::default()),
            Duration::from_secs(config.cache.ttl_secs),
        )
    }

    /// Receiver for search terms published after successful searches.
    pub fn subscribe_searches(&self) -> broadcast::Receiver<String> {
        self.live.subscribe()
    }

    pub async fn repository(&self, owner: &str, name: &str) -> Result<Repository, InvalidInput> {
        require("owner", owner)?;
        require("name", name)?;

        let key = format!("repository_{owner}_{name}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let repository: Repository = match self
            .fetch_object("repository", REPOSITORY_URL, &[owner, name])
            .await
        {
            Ok(repository) => repository,
            Err(error) => {
                warn!(owner, name, %error, "repository lookup degraded to default");
                return Ok(Repository::default());
            }
        };

        self.cache_set(&key, &repository).await;
        Ok(repository)
    }

    pub async fn user(&self, login: &str) -> Result<User, InvalidInput> {
        require("login", login)?;

        let key = format!("user_{login}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let user: User = match self.fetch_object("user", USER_URL, &[login]).await {
            Ok(user) => user,
            Err(error) => {
                warn!(login, %error, "user lookup degraded to default");
                return Ok(User::default());
            }
        };

        self.cache_set(&key, &user).await;
        Ok(user)
    }

    pub async fn search(&self, query: &str, page: i32) -> Result<Vec<Repository>, InvalidInput> {
        require("query", query)?;

        // The upstream search API is 1-based.
        let page = page.max(1);
        let key = format!("search_{query}_{page}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let page_arg = page.to_string();
        let repositories: Vec<Repository> = match self
            .fetch_array("repositories", SEARCH_URL, &[query, &page_arg])
            .await
        {
            Ok(repositories) => repositories,
            Err(error) => {
                warn!(query, page, %error, "search degraded to empty result");
                return Ok(Vec::new());
            }
        };
        debug!(query, page, count = repositories.len(), "search results fetched");

        self.cache_set(&key, &repositories).await;

        if let Err(error) = self.history.append(query).await {
            warn!(query, %error, "could not record search history");
        }
        self.live.publish(query);

        Ok(repositories)
    }

    pub async fn contributors(&self, owner: &str, name: &str) -> Result<Vec<User>, InvalidInput> {
        require("owner", owner)?;
        require("name", name)?;

        let key = format!("contributors_{owner}_{name}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let contributors: Vec<User> = match self
            .fetch_array("contributors", CONTRIBUTORS_URL, &[owner, name])
            .await
        {
            Ok(contributors) => contributors,
            Err(error) => {
                warn!(owner, name, %error, "contributor listing degraded to empty result");
                return Ok(Vec::new());
            }
        };

        self.cache_set(&key, &contributors).await;
        Ok(contributors)
    }

    /// Lists commits from page 1 onward until a page comes back empty, a
    /// fetch fails (accumulated pages are kept), or the window bound is
    /// reached.
    pub async fn commits(&self, owner: &str, name: &str) -> Result<Vec<Commit>, InvalidInput> {
        require("owner", owner)?;
        require("name", name)?;

        let key = format!("repository_commits_{owner}_{name}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let mut commits: Vec<Commit> = Vec::new();
        let mut page: u32 = 1;
        while commits.len() < COMMIT_WINDOW {
            let page_arg = page.to_string();
            match self
                .fetch_array::<Commit>("commits", COMMITS_URL, &[owner, name, &page_arg])
                .await
            {
                Ok(batch) if batch.is_empty() => break,
                Ok(batch) => commits.extend(batch),
                Err(error) => {
                    warn!(owner, name, page, %error, "commit page fetch failed; keeping earlier pages");
                    break;
                }
            }
            page += 1;
        }

        self.cache_set(&key, &commits).await;
        Ok(commits)
    }

    /// Derives the per-author commit share from the bounded commit window.
    pub async fn coder_impacts(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<CoderImpact>, InvalidInput> {
        require("owner", owner)?;
        require("name", name)?;

        let key = format!("coderImpacts_{owner}_{name}");
        if let Some(cached) = self.cache_get(&key).await {
            return Ok(cached);
        }

        let commits = self.commits(owner, name).await?;
        let impacts = compute_impacts(&commits);

        self.cache_set(&key, &impacts).await;
        Ok(impacts)
    }

    /// Most recent search terms, newest first. Store failures degrade to an
    /// empty list.
    pub async fn latest_searches(&self) -> Vec<SearchHistoryEntry> {
        match self.history.latest(LATEST_SEARCH_LIMIT).await {
            Ok(entries) => entries,
            Err(error) => {
                warn!(%error, "could not list search history");
                Vec::new()
            }
        }
    }

    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => {
                    debug!(key, "cache hit");
                    Some(decoded)
                }
                Err(error) => {
                    warn!(key, %error, "cached value has unexpected shape; treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(key, %error, "cache read failed; treating as miss");
                None
            }
        }
    }

    async fn cache_set<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_value(value) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(key, %error, "could not serialize value for caching");
                return;
            }
        };
        if let Err(error) = self.cache.set(key, encoded, self.cache_ttl).await {
            warn!(key, %error, "cache write failed; continuing uncached");
        }
    }

    async fn fetch_object<T: DeserializeOwned>(
        &self,
        field: &str,
        template: &str,
        args: &[&str],
    ) -> anyhow::Result<T> {
        let body = self.client.fetch(template, args).await?;
        Ok(decode_object(&body, field)?)
    }

    async fn fetch_array<T: DeserializeOwned>(
        &self,
        field: &str,
        template: &str,
        args: &[&str],
    ) -> anyhow::Result<Vec<T>> {
        let body = self.client.fetch(template, args).await?;
        Ok(decode_array(&body, field)?)
    }
}
