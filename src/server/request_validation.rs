use std::sync::LazyLock;

use thiserror::Error;

use crate::store::{PageRequest, DEFAULT_LIMIT, MAX_LIMIT};

use super::proto::ListItemsRequest;

/// Longest search string accepted, in characters.
pub const MAX_SEARCH_LEN: usize = 100;

/// Letters, digits, whitespace, `-` and `_`.
#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
pub static SEARCH_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9\s_-]*$").expect("SEARCH_REGEX is a valid regex literal")
});

/// Malformed list request, rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid page {0}: must be a positive integer")]
    InvalidPage(i32),

    #[error("Invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: i32, max: usize },

    #[error("Search is {len} characters long; at most {max} are allowed")]
    SearchTooLong { len: usize, max: usize },

    #[error("Search may only contain letters, digits, spaces, '-' and '_'")]
    InvalidSearchCharacters,
}

/// Defaults applied to list requests that leave fields unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDefaults {
    pub default_limit: usize,
}

impl ListDefaults {
    /// Same defaults with `default_limit` forced into `[1, MAX_LIMIT]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            default_limit: self.default_limit.clamp(1, MAX_LIMIT),
        }
    }
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Turn a wire request into a [`PageRequest`].
///
/// A zero page or limit means "use the default"; an empty search means no
/// filter.
pub fn validate_list_request(
    req: &ListItemsRequest,
    defaults: ListDefaults,
) -> Result<PageRequest, RequestError> {
    let page = match req.page {
        0 => 1,
        p => usize::try_from(p).map_err(|_| RequestError::InvalidPage(p))?,
    };

    let limit = match req.limit {
        0 => defaults.default_limit,
        l => usize::try_from(l)
            .ok()
            .filter(|l| *l <= MAX_LIMIT)
            .ok_or(RequestError::InvalidLimit {
                limit: l,
                max: MAX_LIMIT,
            })?,
    };

    let mut request = PageRequest::new(page, limit);
    if !req.search.is_empty() {
        let len = req.search.chars().count();
        if len > MAX_SEARCH_LEN {
            return Err(RequestError::SearchTooLong {
                len,
                max: MAX_SEARCH_LEN,
            });
        }
        if !SEARCH_REGEX.is_match(&req.search) {
            return Err(RequestError::InvalidSearchCharacters);
        }
        request = request.with_search(req.search.clone());
    }
    Ok(request)
}
