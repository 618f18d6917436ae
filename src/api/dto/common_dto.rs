//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to 1–100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Builds pagination metadata for a total item count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn meta(&self, total: usize) -> PaginationMeta {
        let total = total as u32;
        PaginationMeta {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages: if total == 0 {
                0
            } else {
                total.div_ceil(self.per_page)
            },
        }
    }

    /// Number of items to skip for the current page.
    ///
    /// Widened to `u64` so extreme `page` values from the query string
    /// cannot overflow; the result saturates instead.
    #[must_use]
    pub fn offset(&self) -> usize {
        let skip = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page);
        usize::try_from(skip).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_inputs() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
    }

    #[test]
    fn meta_computes_total_pages() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        assert_eq!(params.meta(0).total_pages, 0);
        assert_eq!(params.meta(20).total_pages, 1);
        assert_eq!(params.meta(21).total_pages, 2);
    }

    #[test]
    fn offset_is_zero_based() {
        let params = PaginationParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn offset_survives_extreme_page_values() {
        let params = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        };
        let expected = (u64::from(u32::MAX) - 1) * 100;
        assert_eq!(params.offset() as u64, expected);

        // Page zero skips nothing rather than underflowing
        let params = PaginationParams {
            page: 0,
            per_page: 100,
        };
        assert_eq!(params.offset(), 0);
    }
}
