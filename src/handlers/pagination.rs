//! List pagination
//!
//! `offset`/`limit` handling shared by every list endpoint.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Raw `?offset=&limit=` query parameters
///
/// Kept as strings so that bad values surface as our own 400 response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    /// Everything up to `max_limit`
    pub fn first_page(max_limit: usize) -> Self {
        Self {
            offset: 0,
            limit: max_limit,
        }
    }

    pub fn from_query(query: &PageQuery, max_limit: usize) -> AppResult<Self> {
        let offset = parse_param("offset", query.offset.as_deref())?.unwrap_or(0);
        // A zero limit means no limit beyond the cap
        let limit = parse_param("limit", query.limit.as_deref())?
            .filter(|limit| *limit > 0)
            .map(|limit| limit.min(max_limit))
            .unwrap_or(max_limit);

        Ok(Self { offset, limit })
    }

    /// Slice `items` down to this window
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

fn parse_param(name: &str, value: Option<&str>) -> AppResult<Option<usize>> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let parsed: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("{} param must be an integer", name)))?;
    let parsed = usize::try_from(parsed)
        .map_err(|_| AppError::InvalidRequest(format!("{} param must be positive", name)))?;

    Ok(Some(parsed))
}
