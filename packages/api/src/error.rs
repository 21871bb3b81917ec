//! # MemoError — one failure type for every memo operation
//!
//! Each variant carries an HTTP-style status code ([`MemoError::status`]) and a
//! stable machine-readable code ([`MemoError::code`]). The GraphQL layer turns a
//! `MemoError` into a field error whose `extensions` hold both, so clients can
//! handle a 401 on `createMemo` the same way as a 500 on `memos`.
//!
//! | Variant | Status | Code |
//! |---------|--------|------|
//! | [`Unauthorized`](MemoError::Unauthorized) | 401 | `UNAUTHORIZED` |
//! | [`InvalidLimit`](MemoError::InvalidLimit) | 400 | `BAD_USER_INPUT` |
//! | [`InvalidTimestamp`](MemoError::InvalidTimestamp) | 400 | `BAD_USER_INPUT` |
//! | [`Store`](MemoError::Store) | 500 | `INTERNAL_SERVER_ERROR` |

use async_graphql::ErrorExtensions;
use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoError {
    #[error("authentication required")]
    Unauthorized,

    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(i32),

    #[error("invalid createdAt timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("memo store failure: {0}")]
    Store(#[from] StoreError),
}

impl MemoError {
    pub fn status(&self) -> u16 {
        match self {
            MemoError::Unauthorized => 401,
            MemoError::InvalidLimit(_) | MemoError::InvalidTimestamp(_) => 400,
            MemoError::Store(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MemoError::Unauthorized => "UNAUTHORIZED",
            MemoError::InvalidLimit(_) | MemoError::InvalidTimestamp(_) => "BAD_USER_INPUT",
            MemoError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for MemoError {
    fn extend(&self) -> async_graphql::Error {
        // Store details stay in the server log.
        let message = match self {
            MemoError::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        async_graphql::Error::new(message).extend_with(|_, e| {
            e.set("code", self.code());
            e.set("status", i32::from(self.status()));
        })
    }
}
