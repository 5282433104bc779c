use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    FetchFailed,
    Transport,
}

/// Failure of one lookup action. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter a GitHub username.")]
    Validation,
    #[error("User not found.")]
    NotFound { status: u16 },
    #[error("Failed to fetch repos...")]
    FetchFailed { status: u16 },
    #[error("An error occurred.")]
    Transport { detail: String },
}

impl LookupError {
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status } | Self::FetchFailed { status } => Some(*status),
            Self::Validation | Self::Transport { .. } => None,
        }
    }
}
