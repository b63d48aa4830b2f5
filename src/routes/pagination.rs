// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page-number pagination shared by the list endpoints.

use crate::error::{AppError, Result};
use crate::search::parse_limit;
use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// A validated page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Result<Self> {
        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| {
                    AppError::BadRequest("page must be a positive integer".to_string())
                })?,
        };
        let per_page = parse_limit(per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE)?;

        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> Result<u32> {
        (self.page - 1)
            .checked_mul(self.per_page)
            .ok_or_else(|| AppError::BadRequest("page is too large".to_string()))
    }

    /// Documents to read: one past the page, to detect a next page.
    pub fn fetch_limit(&self) -> u32 {
        self.per_page + 1
    }

    /// Wrap up to `fetch_limit()` items, trimming the lookahead.
    pub fn respond<T>(self, mut items: Vec<T>) -> ListResponse<T> {
        let has_more = items.len() > self.per_page as usize;
        items.truncate(self.per_page as usize);
        ListResponse {
            items,
            page: self.page,
            per_page: self.per_page,
            has_more,
        }
    }
}

impl TryFrom<&PageParams> for Page {
    type Error = AppError;

    fn try_from(params: &PageParams) -> Result<Self> {
        Page::parse(params.page.as_deref(), params.per_page.as_deref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}
