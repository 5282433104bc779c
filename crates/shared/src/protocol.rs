use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositorySort {
    #[default]
    Updated,
}

/// Query string of `GET /users/{username}/repos`.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryListQuery {
    pub sort: RepositorySort,
    pub per_page: u32,
    pub page: u32,
}

impl RepositoryListQuery {
    pub fn recently_updated(page: u32, per_page: u32) -> Self {
        Self {
            sort: RepositorySort::Updated,
            per_page,
            page,
        }
    }
}
