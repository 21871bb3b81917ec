//! # MemoService — the memo query/mutation/subscription contract
//!
//! `MemoService` owns the three collaborators every operation needs: the
//! [`MemoStore`], the [`MemoBroker`] and a [`MemoPolicy`]. It is built once at
//! startup and handed to the GraphQL schema; cloning it is cheap.
//!
//! ## Operations
//!
//! | Method | Auth | Result |
//! |--------|------|--------|
//! | [`memos`](MemoService::memos) | — | Newest-first [`MemoPage`]; a malformed cursor short-circuits to an empty page without touching the store. |
//! | [`memo`](MemoService::memo) | — | One memo, or `None` for an unknown or malformed id. |
//! | [`create_memo`](MemoService::create_memo) | required | Stores the memo with `writer` from the identity, then publishes it. |
//! | [`update_memo`](MemoService::update_memo) | per policy | Replaces the content; `None` for an unknown or malformed id. |
//! | [`subscribe`](MemoService::subscribe) | — | Memos created after the call. |
//!
//! Store failures are logged here, once, and returned as [`MemoError::Store`].

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use store::{Memo, MemoId, MemoStore, NewMemo, StoreError};

use crate::auth::Identity;
use crate::error::MemoError;
use crate::pubsub::{MemoBroker, MemoStream};

/// Switches for the two trust decisions the memo API has to make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoPolicy {
    /// Reject `updateMemo` without an identity. Off reproduces the legacy
    /// behaviour where anyone could edit any memo.
    pub require_auth_for_update: bool,
    /// Keep the caller's `createdAt`. Off stamps memos with the server clock.
    pub client_timestamps: bool,
}

impl Default for MemoPolicy {
    fn default() -> Self {
        Self {
            require_auth_for_update: true,
            client_timestamps: true,
        }
    }
}

/// One page of memos plus the total number of pages at this page size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoPage {
    pub memos: Vec<Memo>,
    pub last_page: u64,
}

#[derive(Clone)]
pub struct MemoService {
    store: Arc<dyn MemoStore>,
    broker: MemoBroker,
    policy: MemoPolicy,
}

impl MemoService {
    pub fn new(store: Arc<dyn MemoStore>, broker: MemoBroker, policy: MemoPolicy) -> Self {
        Self {
            store,
            broker,
            policy,
        }
    }

    pub fn broker(&self) -> &MemoBroker {
        &self.broker
    }

    pub fn policy(&self) -> MemoPolicy {
        self.policy
    }

    /// A page of memos older than `cursor` (or the newest, without one).
    pub async fn memos(&self, limit: i32, cursor: Option<&str>) -> Result<MemoPage, MemoError> {
        if limit < 1 {
            return Err(MemoError::InvalidLimit(limit));
        }
        let before = match cursor.filter(|c| !c.is_empty()) {
            Some(raw) => match raw.parse::<MemoId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!(cursor = raw, "Malformed cursor, returning empty page");
                    return Ok(MemoPage::default());
                }
            },
            None => None,
        };

        let limit = limit.unsigned_abs();
        let memos = self
            .store
            .list(before, limit)
            .await
            .map_err(|e| store_failure("memos", e))?;
        let count = self
            .store
            .count()
            .await
            .map_err(|e| store_failure("memos", e))?;

        Ok(MemoPage {
            memos,
            last_page: count.div_ceil(u64::from(limit)),
        })
    }

    pub async fn memo(&self, id: &str) -> Result<Option<Memo>, MemoError> {
        let Ok(id) = id.parse::<MemoId>() else {
            return Ok(None);
        };
        self.store
            .find(id)
            .await
            .map_err(|e| store_failure("memo", e))
    }

    pub async fn create_memo(
        &self,
        identity: Option<&Identity>,
        content: &str,
        created_at: &str,
    ) -> Result<Memo, MemoError> {
        let Some(identity) = identity else {
            return Err(MemoError::Unauthorized);
        };
        let created_at = if self.policy.client_timestamps {
            parse_timestamp(created_at)?
        } else {
            Utc::now()
        };

        let memo = self
            .store
            .insert(NewMemo::new(content, identity.name.as_str(), created_at))
            .await
            .map_err(|e| store_failure("createMemo", e))?;
        tracing::info!(memo_id = %memo.id, writer = %memo.writer, "Memo created");

        self.broker.publish(&memo);
        Ok(memo)
    }

    pub async fn update_memo(
        &self,
        identity: Option<&Identity>,
        id: &str,
        content: &str,
    ) -> Result<Option<Memo>, MemoError> {
        if self.policy.require_auth_for_update && identity.is_none() {
            return Err(MemoError::Unauthorized);
        }
        let Ok(id) = id.parse::<MemoId>() else {
            return Ok(None);
        };
        self.store
            .update_content(id, content)
            .await
            .map_err(|e| store_failure("updateMemo", e))
    }

    pub fn subscribe(&self) -> MemoStream {
        self.broker.subscribe()
    }
}

fn store_failure(operation: &'static str, err: StoreError) -> MemoError {
    tracing::error!(operation, "Memo store failure: {}", err);
    MemoError::Store(err)
}

/// Accepts RFC 3339 or milliseconds since the Unix epoch.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MemoError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .ok_or_else(|| MemoError::InvalidTimestamp(raw.to_string()))
}
