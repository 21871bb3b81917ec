//! # Domain models for memos
//!
//! Defines the records handled by every [`crate::MemoStore`] backend.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`MemoId`] | Store-assigned identifier. Wraps a UUID v7, so ids sort in creation order and double as pagination cursors. |
//! | [`Memo`] | A persisted note: content, writer, and both timestamps. |
//! | [`NewMemo`] | The fields a caller supplies on creation. The writer is filled in by the service from the decoded token, never from client input. |
//!
//! `MemoId` parses from and prints as the hyphenated UUID form. A string that
//! fails [`MemoId::from_str`](std::str::FromStr) is not a well-formed identifier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, totally ordered memo identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(Uuid);

impl MemoId {
    /// Generate a fresh id. Ids generated by one process are strictly increasing.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for MemoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A memo as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    /// Free-form body. The only field that changes after creation.
    pub content: String,
    /// Display name of the authenticated creator.
    pub writer: String,
    pub created_at: DateTime<Utc>,
    /// Maintained by the store on insert and on every update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a memo.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMemo {
    pub content: String,
    pub writer: String,
    pub created_at: DateTime<Utc>,
}

impl NewMemo {
    pub fn new(
        content: impl Into<String>,
        writer: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            writer: writer.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_id_display_roundtrips() {
        let id = MemoId::generate();
        let parsed: MemoId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_memo_id_rejects_garbage() {
        assert!("not-an-id".parse::<MemoId>().is_err());
        assert!("".parse::<MemoId>().is_err());
        assert!("5f1d7c1e2b3a4c5d6e7f8091".parse::<MemoId>().is_err());
    }

    #[test]
    fn test_generated_ids_increase() {
        let ids: Vec<MemoId> = (0..100).map(|_| MemoId::generate()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
