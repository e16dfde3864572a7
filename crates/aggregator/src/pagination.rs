/// Upstream search pages carry at most this many repositories; a full page
/// means more results may exist.
pub const SEARCH_PAGE_SIZE: usize = 100;

/// Paging links the presentation collaborator derives from a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<i32>,
    pub next: Option<i32>,
}

impl PageLinks {
    /// A previous link exists only past page 1 with at least one result; a
    /// next link only when the page hit the size ceiling.
    pub fn for_results(page: i32, result_count: usize) -> Self {
        let previous = (page > 1 && result_count > 0).then(|| page - 1);
        let next = (result_count >= SEARCH_PAGE_SIZE).then(|| page + 1);
        Self { previous, next }
    }
}
