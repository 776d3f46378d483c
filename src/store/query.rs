use serde::Serialize;

use super::item::Item;

/// Upper bound on page size accepted by the service.
pub const MAX_LIMIT: usize = 100;

/// Page size used when a request does not specify one.
pub const DEFAULT_LIMIT: usize = 20;

/// A page of the ordered, optionally filtered item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page,
            limit,
            search: None,
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Half-open `[start, end)` bounds of this page in the candidate list.
    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        let start = self.page.saturating_sub(1).saturating_mul(self.limit);
        (start, start.saturating_add(self.limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

/// Result of a paginated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    /// Number of matching items before pagination
    pub total: usize,
    pub has_more: bool,
    pub page: usize,
}

/// Slice rank-ordered candidates down to the requested page.
///
/// Out of range pages produce an empty slice with an accurate `total`.
#[must_use]
pub fn paginate(candidates: &[&Item], request: &PageRequest) -> ItemPage {
    let total = candidates.len();
    let (start, end) = request.bounds();
    let items = candidates
        .get(start..end.min(total))
        .unwrap_or_default()
        .iter()
        .map(|&item| item.clone())
        .collect();

    ItemPage {
        items,
        total,
        has_more: end < total,
        page: request.page,
    }
}
