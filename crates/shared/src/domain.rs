use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of repositories requested per page.
pub const PAGE_SIZE: u32 = 5;

/// Public metadata of one account, as returned by `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    pub avatar_url: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Display name, falling back to the login when none is set.
    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(&self.login)
    }
}

/// One entry of `GET /users/{username}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub html_url: String,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
}

/// Treats `None` and `Some("")` alike; the API sends `""` for unset fields such as `blog`.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Page position for incremental "load more" fetches within one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
    total: u32,
    exhausted: bool,
}

impl PageCursor {
    pub fn new(total: u32) -> Self {
        Self::with_page_size(total, PAGE_SIZE)
    }

    pub fn with_page_size(total: u32, page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            total,
            exhausted: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Moves to the next page and returns its number.
    pub fn advance(&mut self) -> u32 {
        self.page += 1;
        self.page
    }

    /// Records the length of the page just fetched. More pages stay available only while
    /// `page * page_size < total` and the page came back full; once that fails the cursor
    /// stays exhausted for the rest of the search.
    pub fn record_page(&mut self, fetched: usize) {
        let seen = u64::from(self.page) * u64::from(self.page_size);
        let full = fetched == self.page_size as usize;
        if seen >= u64::from(self.total) || !full {
            self.exhausted = true;
        }
    }

    pub fn exhaust(&mut self) {
        self.exhausted = true;
    }

    pub fn more_available(&self) -> bool {
        !self.exhausted
    }
}
