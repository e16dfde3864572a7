pub mod history;
pub mod live;
pub mod pagination;
pub mod service;

pub use history::{InMemorySearchHistory, SearchHistoryEntry, SearchHistoryStore};
pub use live::LiveSearchHub;
pub use pagination::{PageLinks, SEARCH_PAGE_SIZE};
pub use service::{GithubService, InvalidInput, COMMIT_WINDOW, LATEST_SEARCH_LIMIT};
