use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;
use crate::models::{Memo, MemoId, NewMemo};
use crate::repo::MemoStore;

/// In-memory MemoStore for testing and runs without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    memos: Arc<Mutex<BTreeMap<MemoId, Memo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn memos(&self) -> Result<MutexGuard<'_, BTreeMap<MemoId, Memo>>, StoreError> {
        self.memos
            .lock()
            .map_err(|_| {
                tracing::error!("memory store lock poisoned");
                StoreError::Unavailable("memory store lock poisoned".to_string())
            })
    }
}

#[async_trait]
impl MemoStore for MemoryStore {
    async fn insert(&self, memo: NewMemo) -> Result<Memo, StoreError> {
        let mut memos = self.memos()?;
        let stored = Memo {
            id: MemoId::generate(),
            content: memo.content,
            writer: memo.writer,
            created_at: memo.created_at,
            updated_at: Utc::now(),
        };
        memos.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: MemoId) -> Result<Option<Memo>, StoreError> {
        Ok(self.memos()?.get(&id).cloned())
    }

    async fn list(&self, before: Option<MemoId>, limit: u32) -> Result<Vec<Memo>, StoreError> {
        let memos = self.memos()?;
        let page = match before {
            Some(cursor) => memos
                .range(..cursor)
                .rev()
                .take(limit as usize)
                .map(|(_, m)| m.clone())
                .collect(),
            None => memos
                .values()
                .rev()
                .take(limit as usize)
                .cloned()
                .collect(),
        };
        Ok(page)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.memos()?.len() as u64)
    }

    async fn update_content(
        &self,
        id: MemoId,
        content: &str,
    ) -> Result<Option<Memo>, StoreError> {
        let mut memos = self.memos()?;
        Ok(memos.get_mut(&id).map(|memo| {
            memo.content = content.to_string();
            memo.updated_at = Utc::now();
            memo.clone()
        }))
    }
}
