//! # MemoStore — the persistence seam
//!
//! Every resolver talks to storage through [`MemoStore`]. Implementations live in
//! sibling modules ([`crate::memory`] for tests and database-less runs,
//! `crate::postgres` behind the `postgres` feature).
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`insert`](MemoStore::insert) | Persists a [`NewMemo`], assigning its [`MemoId`] and `updated_at`. |
//! | [`find`](MemoStore::find) | Looks up a single memo. |
//! | [`list`](MemoStore::list) | Newest-first page, optionally strictly older than a cursor. |
//! | [`count`](MemoStore::count) | Total number of memos. |
//! | [`update_content`](MemoStore::update_content) | Replaces the content of one memo and refreshes `updated_at`. |
//!
//! The trait uses `async_trait` so it can be held as `Arc<dyn MemoStore>` and
//! awaited from `Send` futures.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Memo, MemoId, NewMemo};

#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn insert(&self, memo: NewMemo) -> Result<Memo, StoreError>;

    async fn find(&self, id: MemoId) -> Result<Option<Memo>, StoreError>;

    /// Memos ordered by id descending, restricted to `id < before` when a
    /// cursor is given, at most `limit` of them.
    async fn list(&self, before: Option<MemoId>, limit: u32) -> Result<Vec<Memo>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Returns the updated memo, or `None` if no memo has this id.
    async fn update_content(&self, id: MemoId, content: &str)
        -> Result<Option<Memo>, StoreError>;
}
