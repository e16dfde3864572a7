use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;

/// Repository record as returned by the show/search endpoints. Wire names are
/// lower_snake_case and map directly onto the field names here; `private` is
/// the single rename. Every field defaults so partial payloads still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
    pub organization: Option<String>,
    pub watchers: i64,
    pub forks: i64,
    pub open_issues: i64,
    pub size: i64,
    pub score: f64,
    pub fork: bool,
    #[serde(rename = "private")]
    pub is_private: bool,
    pub has_wiki: bool,
    pub has_issues: bool,
    pub has_downloads: bool,
    #[serde(deserialize_with = "dates::opt_date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "dates::opt_date")]
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub gravatar_id: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub public_repo_count: i64,
    pub public_gist_count: i64,
    #[serde(deserialize_with = "dates::opt_date")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parent commit reference; the list endpoint only carries the identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub url: Option<String>,
    pub tree: String,
    pub parents: Vec<CommitRef>,
    pub author: User,
    pub committer: User,
    #[serde(deserialize_with = "dates::opt_date")]
    pub authored_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "dates::opt_date")]
    pub committed_date: Option<DateTime<Utc>>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}
