//! Shared list-query parameters: pagination, free-text search, and sort.
//!
//! Clamping rules: `page < 1` falls back to 1, `limit < 1` falls back to
//! the default of 10, `limit > 100` is capped at 100. The raw fields are
//! signed so that negative inputs clamp instead of failing to parse.

use serde::Deserialize;

use crate::response::PaginationMeta;
use taskshelf_db::{Direction, OrderBy, Window};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    /// Effective 1-indexed page number.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1) as u64
    }

    /// Effective page size after defaulting and capping.
    pub fn limit(&self) -> u64 {
        let raw = self.limit.unwrap_or(DEFAULT_LIMIT);
        if raw < 1 {
            DEFAULT_LIMIT as u64
        } else if raw > MAX_LIMIT {
            MAX_LIMIT as u64
        } else {
            raw as u64
        }
    }

    /// `skip = (page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// The store window for the current page.
    pub fn window(&self) -> Window {
        Window::new(self.skip(), self.limit())
    }

    /// The trimmed search term, if one was supplied and is non-blank.
    /// A present search term supersedes structured filters entirely.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Parse the `sort` parameter (`field:direction` tokens, comma
    /// separated; direction `-1` means descending, anything else
    /// ascending) into ordering terms.
    ///
    /// `resolve` maps API field names onto store columns; tokens it does
    /// not recognize are dropped.
    pub fn sort_order(&self, resolve: impl Fn(&str) -> Option<&'static str>) -> Vec<OrderBy> {
        let Some(raw) = self.sort.as_deref() else {
            return Vec::new();
        };

        raw.split(',')
            .filter_map(|token| {
                let token = token.trim();
                if token.is_empty() {
                    return None;
                }
                let (field, direction) = match token.split_once(':') {
                    Some((field, direction)) => (field.trim(), direction.trim()),
                    None => (token, ""),
                };
                let column = resolve(field)?;
                let direction = if direction == "-1" {
                    Direction::Desc
                } else {
                    Direction::Asc
                };
                Some(OrderBy {
                    field: column,
                    direction,
                })
            })
            .collect()
    }

    /// Pagination metadata for a list response over `total` matches.
    pub fn pagination(&self, total: u64) -> PaginationMeta {
        PaginationMeta::new(self.page(), self.limit(), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(field: &str) -> Option<&'static str> {
        match field {
            "title" => Some("title"),
            "createdAt" => Some("created_at"),
            "publishedYear" => Some("published_year"),
            _ => None,
        }
    }

    #[test]
    fn defaults_are_page_one_limit_ten() {
        let params = ListParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn page_below_one_clamps_to_one() {
        let params = ListParams {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(params.page(), 1);

        let params = ListParams {
            page: Some(-3),
            ..Default::default()
        };
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn limit_below_one_restores_default_not_one() {
        let params = ListParams {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(params.limit(), 10);

        let params = ListParams {
            limit: Some(-5),
            ..Default::default()
        };
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn limit_above_hundred_caps_at_hundred() {
        let params = ListParams {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        let params = ListParams {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(params.skip(), 50);
    }

    #[test]
    fn blank_search_is_ignored() {
        let params = ListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), None);

        let params = ListParams {
            search: Some("  ring ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("ring"));
    }

    #[test]
    fn sort_tokens_parse_field_and_direction() {
        let params = ListParams {
            sort: Some("title:-1,createdAt:1".to_string()),
            ..Default::default()
        };
        let order = params.sort_order(resolve);
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].field, "title");
        assert_eq!(order[0].direction, Direction::Desc);
        assert_eq!(order[1].field, "created_at");
        assert_eq!(order[1].direction, Direction::Asc);
    }

    #[test]
    fn missing_direction_defaults_to_ascending() {
        let params = ListParams {
            sort: Some("publishedYear".to_string()),
            ..Default::default()
        };
        let order = params.sort_order(resolve);
        assert_eq!(order[0].field, "published_year");
        assert_eq!(order[0].direction, Direction::Asc);
    }

    #[test]
    fn unknown_sort_fields_are_dropped() {
        let params = ListParams {
            sort: Some("hacker; DROP:1,title:-1".to_string()),
            ..Default::default()
        };
        let order = params.sort_order(resolve);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].field, "title");
    }

    #[test]
    fn pagination_meta_uses_effective_values() {
        let params = ListParams {
            page: Some(-1),
            limit: Some(1000),
            ..Default::default()
        };
        let meta = params.pagination(250);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 100);
        assert_eq!(meta.pages, 3);
    }
}
