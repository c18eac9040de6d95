//! Querying the indexed collection: date range, keyword, pages.
//!
//! Filtering never copies or mutates messages. A filtered view is a list of
//! positions into the master collection, and a page is a sub-slice of that
//! list.

pub mod filter;
pub mod keyword;
pub mod page;

use chrono::NaiveDate;

use crate::error::{ChatError, Result};

/// A date range plus an optional keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    /// First day to include.
    pub start: NaiveDate,
    /// Last day to include.
    pub end: NaiveDate,
    /// Whole-word keyword; `None` or blank means no keyword filter.
    pub keyword: Option<String>,
}

impl Query {
    /// A query covering `start..=end` with no keyword.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            keyword: None,
        }
    }

    /// Same range, with a keyword (blank keywords are dropped).
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = if keyword.trim().is_empty() {
            None
        } else {
            Some(keyword)
        };
        self
    }

    /// The keyword to apply, if any.
    pub fn active_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Parse a `YYYY-MM-DD` date as typed by the user.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| ChatError::InvalidDate(trimmed.to_string()))
}
