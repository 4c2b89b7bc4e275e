//! Limit/offset pagination for list endpoints.
//!
//! Event and notification reads are always newest-first, so callers page
//! through results with a bounded limit and an offset.

use serde::{Deserialize, Serialize};

/// Default page size for notification listings.
const DEFAULT_LIMIT: i64 = 20;
/// Upper bound on a single page.
const MAX_LIMIT: i64 = 100;

/// Limit/offset parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: i64,
}

impl PageRequest {
    /// Create a new page request with clamped bounds.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_is_twenty() {
        let page = PageRequest::default();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_new_clamps_out_of_range_values() {
        let page = PageRequest::new(5000, -3);
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);
    }
}
