use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aggregator::{GithubService, InMemorySearchHistory};
use async_trait::async_trait;
use cache::MemoryCache;
use gh_api::client::{build_url, FetchError, RemoteClient};
use serde_json::json;

struct PagedClient {
    responses: HashMap<String, String>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl PagedClient {
    fn new(responses: &[(String, serde_json::Value)]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .iter()
                .map(|(url, body)| (url.clone(), body.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteClient for PagedClient {
    async fn fetch(&self, template: &str, args: &[&str]) -> Result<String, FetchError> {
        let url = build_url(template, args)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());
        match self.responses.get(&url) {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                url,
            }),
        }
    }
}

fn service(client: Arc<PagedClient>) -> GithubService {
    GithubService::new(
        client,
        Arc::new(MemoryCache::new(64)),
        Arc::new(InMemorySearchHistory::default()),
        Duration::from_secs(3600),
    )
}

fn commits_url(page: u32) -> String {
    format!("https://github.com/api/v2/json/commits/list/octocat/hello/master?page={page}")
}

fn commit(login: &str, id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "message": "update readme",
        "tree": "tree-1",
        "parents": [{"id": "parent-1"}],
        "author": {"login": login, "name": login},
        "committer": {"login": login},
        "authored_date": "2011/03/23 05:14:20 -0700",
        "committed_date": "2011-03-23T05:14:20-07:00"
    })
}

fn page_of(login: &str, page: u32, count: usize) -> serde_json::Value {
    let commits: Vec<_> = (0..count)
        .map(|n| commit(login, &format!("p{page}-{n}")))
        .collect();
    json!({ "commits": commits })
}

#[tokio::test]
async fn stops_issuing_pages_once_window_is_reached() {
    // 40 commits per page: pages 1-3 accumulate 120 >= 100, page 4 exists
    // upstream but must never be requested.
    let client = PagedClient::new(&[
        (commits_url(1), page_of("alice", 1, 40)),
        (commits_url(2), page_of("alice", 2, 40)),
        (commits_url(3), page_of("alice", 3, 40)),
        (commits_url(4), page_of("alice", 4, 40)),
    ]);
    let svc = service(client.clone());

    let commits = svc.commits("octocat", "hello").await.unwrap();

    assert_eq!(commits.len(), 120, "the final page is kept whole");
    assert_eq!(client.calls(), 3);
    assert!(!client.urls().contains(&commits_url(4)));
}

#[tokio::test]
async fn empty_page_stops_pagination() {
    let client = PagedClient::new(&[
        (commits_url(1), page_of("alice", 1, 40)),
        (commits_url(2), json!({"commits": []})),
    ]);
    let svc = service(client.clone());

    let commits = svc.commits("octocat", "hello").await.unwrap();

    assert_eq!(commits.len(), 40);
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn absent_commits_field_counts_as_empty_page() {
    let client = PagedClient::new(&[
        (commits_url(1), page_of("alice", 1, 10)),
        (commits_url(2), json!({"error": "no more"})),
    ]);
    let svc = service(client.clone());

    let commits = svc.commits("octocat", "hello").await.unwrap();
    assert_eq!(commits.len(), 10);
}

#[tokio::test]
async fn failed_page_keeps_accumulated_commits() {
    // Page 2 is unscripted and answers 502; page 1 results survive.
    let client = PagedClient::new(&[(commits_url(1), page_of("alice", 1, 40))]);
    let svc = service(client.clone());

    let commits = svc.commits("octocat", "hello").await.unwrap();

    assert_eq!(commits.len(), 40);
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn commit_window_is_cached() {
    let client = PagedClient::new(&[
        (commits_url(1), page_of("alice", 1, 40)),
        (commits_url(2), json!({"commits": []})),
    ]);
    let svc = service(client.clone());

    let first = svc.commits("octocat", "hello").await.unwrap();
    let second = svc.commits("octocat", "hello").await.unwrap();

    assert_eq!(client.calls(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn coder_impacts_derive_from_the_commit_window() {
    let page = json!({
        "commits": [
            commit("alice", "c1"),
            commit("bob", "c2"),
            commit("alice", "c3"),
            commit("bob", "c4"),
            commit("alice", "c5"),
        ]
    });
    let client = PagedClient::new(&[
        (commits_url(1), page),
        (commits_url(2), json!({"commits": []})),
    ]);
    let svc = service(client.clone());

    let impacts = svc.coder_impacts("octocat", "hello").await.unwrap();

    assert_eq!(impacts.len(), 2);
    assert_eq!((impacts[0].user.as_str(), impacts[0].commits), ("bob", 2));
    assert_eq!((impacts[1].user.as_str(), impacts[1].commits), ("alice", 3));
    for impact in &impacts {
        assert_eq!(impact.total_commits, 5);
    }

    // A second derivation is a pure cache hit: no further round trips.
    let calls_after_first = client.calls();
    let again = svc.coder_impacts("octocat", "hello").await.unwrap();
    assert_eq!(client.calls(), calls_after_first);
    assert_eq!(impacts, again);
}

#[tokio::test]
async fn impact_totals_never_exceed_the_window_bound() {
    let client = PagedClient::new(&[
        (commits_url(1), page_of("alice", 1, 40)),
        (commits_url(2), page_of("alice", 2, 40)),
        (commits_url(3), page_of("bob", 3, 40)),
    ]);
    let svc = service(client.clone());

    let impacts = svc.coder_impacts("octocat", "hello").await.unwrap();

    // 120 commits accumulated, impacts consider the first 100.
    assert_eq!(impacts.iter().map(|i| i.commits).sum::<u32>(), 100);
    for impact in &impacts {
        assert_eq!(impact.total_commits, 100);
    }
}
