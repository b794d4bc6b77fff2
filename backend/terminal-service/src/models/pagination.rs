use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 50;
/// Highest page served; keeps the skip offset well inside `i64`
pub const MAX_PAGE: u64 = 100_000;

/// `?page&limit` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Clamp into a valid page: 1 <= page <= [`MAX_PAGE`],
    /// 1 <= limit <= [`MAX_LIMIT`]
    pub fn resolve(&self) -> Page {
        Page {
            page: self.page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

/// Resolved 1-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        PageQuery::default().resolve()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: Page, total: u64) -> Self {
        Self {
            items,
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(page.limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_and_bounds() {
        assert_eq!(PageQuery::default().resolve(), Page { page: 1, limit: 10 });

        let q = PageQuery {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!(q.resolve(), Page { page: 1, limit: 50 });

        let q = PageQuery {
            page: Some(3),
            limit: Some(0),
        };
        let page = q.resolve();
        assert_eq!(page, Page { page: 3, limit: 1 });
        assert_eq!(page.skip(), 2);
    }

    #[test]
    fn test_huge_page_is_capped() {
        let q = PageQuery {
            page: Some(u64::MAX),
            limit: Some(50),
        };
        let page = q.resolve();
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.skip(), (MAX_PAGE - 1) * 50);

        // Unclamped pages saturate instead of overflowing
        let raw = Page {
            page: u64::MAX,
            limit: MAX_LIMIT,
        };
        assert_eq!(raw.skip(), u64::MAX);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Paginated::new(vec![1, 2], Page { page: 1, limit: 10 }, 21);
        assert_eq!(p.total_pages, 3);
        let empty: Paginated<u8> = Paginated::new(vec![], Page::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }
}
