//! Data model for the reading client.
//!
//! The article API is the single source of truth: summaries and details are
//! deserialized straight from its JSON responses and are never patched or
//! merged locally. The list is replaced wholesale on every successful fetch
//! so read/star state observed on the server is always current.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Read/star status used to scope the article list query.
///
/// Mutated only by explicit user selection, never derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStatus {
    #[default]
    Unread,
    All,
    Read,
    Starred,
}

impl FilterStatus {
    /// All filters in sidebar display order.
    pub const ALL: [FilterStatus; 4] = [
        FilterStatus::Unread,
        FilterStatus::All,
        FilterStatus::Read,
        FilterStatus::Starred,
    ];

    /// Value sent as the `status` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            FilterStatus::Unread => "unread",
            FilterStatus::All => "all",
            FilterStatus::Read => "read",
            FilterStatus::Starred => "starred",
        }
    }

    /// Human-readable label for the filter bar.
    pub fn label(&self) -> &'static str {
        match self {
            FilterStatus::Unread => "Unread",
            FilterStatus::All => "All",
            FilterStatus::Read => "Read",
            FilterStatus::Starred => "Starred",
        }
    }

    /// Next filter in display order, wrapping around.
    pub fn next(&self) -> FilterStatus {
        match self {
            FilterStatus::Unread => FilterStatus::All,
            FilterStatus::All => FilterStatus::Read,
            FilterStatus::Read => FilterStatus::Starred,
            FilterStatus::Starred => FilterStatus::Unread,
        }
    }

    /// Previous filter in display order, wrapping around.
    pub fn prev(&self) -> FilterStatus {
        match self {
            FilterStatus::Unread => FilterStatus::Starred,
            FilterStatus::All => FilterStatus::Unread,
            FilterStatus::Read => FilterStatus::All,
            FilterStatus::Starred => FilterStatus::Read,
        }
    }
}

impl std::str::FromStr for FilterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unread" => Ok(FilterStatus::Unread),
            "all" => Ok(FilterStatus::All),
            "read" => Ok(FilterStatus::Read),
            "starred" => Ok(FilterStatus::Starred),
            other => Err(format!(
                "unknown filter '{}' (expected unread, all, read, or starred)",
                other
            )),
        }
    }
}

impl std::fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

/// One row of the article list.
///
/// Produced only by the list query. Unknown JSON fields are ignored and
/// missing optional fields deserialize to `None`, so the client tolerates
/// both older and richer server payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Full content of a single article, produced only by the detail query.
///
/// `content` is the server's rich-text/HTML payload; flattening it for
/// terminal display is the presentation layer's concern.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// List pane state.
///
/// `Ready(vec![])` covers both a genuinely empty result and a failed fetch
/// (the read path fails soft); the two are deliberately indistinguishable
/// here. `ViewState::last_error` is the diagnostic side channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// A list fetch for the current filter is outstanding.
    Loading,
    /// Committed result of the most recent list fetch.
    Ready(Vec<ArticleSummary>),
}

impl ListState {
    /// Committed articles, or an empty slice while loading.
    pub fn articles(&self) -> &[ArticleSummary] {
        match self {
            ListState::Loading => &[],
            ListState::Ready(items) => items,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }
}

/// Aggregate view state owned by the fetch coordinator.
///
/// The presentation layer reads snapshots of this and requests changes
/// through the coordinator's mutators; it never writes fields directly.
///
/// Invariant: `detail` is `Some` only while `selection` is `Some` and the
/// detail's id equals the selected id. A cleared selection always means a
/// cleared detail.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub filter: FilterStatus,
    pub list: ListState,
    pub selection: Option<String>,
    pub detail: Option<ArticleDetail>,
    /// Most recent swallowed fetch error, for the status line. Purely
    /// diagnostic: the rendered list/detail state is already degraded to
    /// empty by the time this is set.
    pub last_error: Option<String>,
}

impl ViewState {
    /// Session-start state: unread filter, list fetch active immediately.
    pub fn new(filter: FilterStatus) -> Self {
        Self {
            filter,
            list: ListState::Loading,
            selection: None,
            detail: None,
            last_error: None,
        }
    }
}
