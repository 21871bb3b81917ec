//! # PostgreSQL backend
//!
//! [`PgStore`] keeps memos in the `memos` table created by the embedded
//! migrations under `packages/store/migrations`. Ids are generated in Rust
//! ([`MemoId::generate`]) so ordering by the `uuid` column matches creation
//! order; `updated_at` is set by the database with `now()`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Memo, MemoId, NewMemo};
use crate::repo::MemoStore;

/// Row shape of the `memos` table.
#[derive(Debug, FromRow)]
struct MemoRow {
    id: Uuid,
    content: String,
    writer: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MemoRow> for Memo {
    fn from(row: MemoRow) -> Self {
        Memo {
            id: MemoId::from_uuid(row.id),
            content: row.content,
            writer: row.writer,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// MemoStore backed by a PostgreSQL connection pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MemoStore for PgStore {
    async fn insert(&self, memo: NewMemo) -> Result<Memo, StoreError> {
        let id = MemoId::generate();
        let row: MemoRow = sqlx::query_as(
            "INSERT INTO memos (id, content, writer, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, now()) \
             RETURNING id, content, writer, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(&memo.content)
        .bind(&memo.writer)
        .bind(memo.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find(&self, id: MemoId) -> Result<Option<Memo>, StoreError> {
        let row: Option<MemoRow> = sqlx::query_as(
            "SELECT id, content, writer, created_at, updated_at FROM memos WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Memo::from))
    }

    async fn list(&self, before: Option<MemoId>, limit: u32) -> Result<Vec<Memo>, StoreError> {
        let rows: Vec<MemoRow> = sqlx::query_as(
            "SELECT id, content, writer, created_at, updated_at FROM memos \
             WHERE ($1::uuid IS NULL OR id < $1) \
             ORDER BY id DESC \
             LIMIT $2",
        )
        .bind(before.map(|id| *id.as_uuid()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Memo::from).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM memos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn update_content(
        &self,
        id: MemoId,
        content: &str,
    ) -> Result<Option<Memo>, StoreError> {
        let row: Option<MemoRow> = sqlx::query_as(
            "UPDATE memos SET content = $2, updated_at = now() WHERE id = $1 \
             RETURNING id, content, writer, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Memo::from))
    }
}
