use thiserror::Error;

use crate::steam::{InvalidProfileUrl, SteamError};
use crate::storage::StoreError;

/// Display strings of the first three variants are client-facing messages.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("steam api: {0}")]
    Upstream(#[from] SteamError),
    #[error("record store: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
    pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }
}

impl From<InvalidProfileUrl> for ServiceError {
    fn from(e: InvalidProfileUrl) -> Self { Self::Validation(e.to_string()) }
}
