//! # GraphQL schema
//!
//! Binds the [`MemoService`] operations to GraphQL:
//!
//! ```graphql
//! type Query {
//!   memos(limit: Int!, cursor: String): MemoPage!
//!   memo(_id: ID!): Memo
//! }
//! type Mutation {
//!   createMemo(content: String!, createdAt: String!): CreateMemoResult!
//!   updateMemo(_id: ID!, content: String!): Memo
//! }
//! type Subscription {
//!   memoCreated: Memo!
//! }
//! ```
//!
//! The service is schema data; the caller's [`Identity`] is request data,
//! attached by the transport when a valid bearer token is present.
//!
//! Every [`MemoError`](crate::MemoError) becomes a field error with `code` and
//! `status` extensions. `createMemo` also copies the status into
//! `CreateMemoResult.error`, the shape existing clients check for `401`.

use async_graphql::{Context, ErrorExtensions, Object, Result, Schema, SimpleObject, Subscription, ID};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::{Stream, StreamExt};
use store::Memo;

use crate::auth::Identity;
use crate::service::{MemoPage, MemoService};

pub type MemoSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the schema around an explicitly constructed service.
pub fn build_schema(service: MemoService) -> MemoSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(service)
        .finish()
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GraphQL view of a [`Memo`].
pub struct MemoNode(pub Memo);

#[Object(name = "Memo")]
impl MemoNode {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn writer(&self) -> &str {
        &self.0.writer
    }

    async fn created_at(&self) -> String {
        timestamp(&self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        timestamp(&self.0.updated_at)
    }
}

#[derive(SimpleObject)]
#[graphql(name = "MemoPage")]
pub struct MemoPageNode {
    memos: Vec<MemoNode>,
    last_page: i32,
}

impl From<MemoPage> for MemoPageNode {
    fn from(page: MemoPage) -> Self {
        Self {
            memos: page.memos.into_iter().map(MemoNode).collect(),
            last_page: i32::try_from(page.last_page).unwrap_or(i32::MAX),
        }
    }
}

#[derive(SimpleObject)]
pub struct CreateMemoResult {
    memo: Option<MemoNode>,
    error: Option<i32>,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Newest-first page of memos strictly older than `cursor`.
    async fn memos(
        &self,
        ctx: &Context<'_>,
        limit: i32,
        cursor: Option<String>,
    ) -> Result<MemoPageNode> {
        let service = ctx.data::<MemoService>()?;
        let page = service
            .memos(limit, cursor.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(page.into())
    }

    async fn memo(&self, ctx: &Context<'_>, #[graphql(name = "_id")] id: ID) -> Result<Option<MemoNode>> {
        let service = ctx.data::<MemoService>()?;
        let memo = service.memo(&id).await.map_err(|e| e.extend())?;
        Ok(memo.map(MemoNode))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_memo(
        &self,
        ctx: &Context<'_>,
        content: String,
        created_at: String,
    ) -> Result<CreateMemoResult> {
        let service = ctx.data::<MemoService>()?;
        let identity = ctx.data_opt::<Identity>();
        match service.create_memo(identity, &content, &created_at).await {
            Ok(memo) => Ok(CreateMemoResult {
                memo: Some(MemoNode(memo)),
                error: None,
            }),
            Err(err) => {
                let status = i32::from(err.status());
                ctx.add_error(err.extend().into_server_error(ctx.item.pos));
                Ok(CreateMemoResult {
                    memo: None,
                    error: Some(status),
                })
            }
        }
    }

    async fn update_memo(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: ID,
        content: String,
    ) -> Result<Option<MemoNode>> {
        let service = ctx.data::<MemoService>()?;
        let identity = ctx.data_opt::<Identity>();
        let memo = service
            .update_memo(identity, &id, &content)
            .await
            .map_err(|e| e.extend())?;
        Ok(memo.map(MemoNode))
    }
}

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Memos created after the subscription starts.
    async fn memo_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = MemoNode>> {
        let service = ctx.data::<MemoService>()?;
        Ok(service.subscribe().map(MemoNode))
    }
}

/// Schema definition language for the memo API.
pub fn sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .finish()
        .sdl()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::MemoBroker;
    use crate::service::MemoPolicy;
    use async_graphql::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use store::MemoryStore;
    use tokio::time::timeout;

    fn schema() -> MemoSchema {
        let service = MemoService::new(
            Arc::new(MemoryStore::new()),
            MemoBroker::default(),
            MemoPolicy::default(),
        );
        build_schema(service)
    }

    async fn run(schema: &MemoSchema, request: impl Into<Request>) -> (Value, Vec<Value>) {
        let response = schema.execute(request).await;
        let errors = response
            .errors
            .iter()
            .map(|e| serde_json::to_value(e).unwrap())
            .collect();
        (response.data.into_json().unwrap(), errors)
    }

    fn create(content: &str) -> Request {
        Request::new(format!(
            r#"mutation {{ createMemo(content: "{content}", createdAt: "2024-05-01T12:00:00Z") {{ memo {{ _id content writer createdAt }} error }} }}"#
        ))
    }

    #[tokio::test]
    async fn test_create_without_token_returns_401() {
        let schema = schema();
        let (data, errors) = run(&schema, create("hello")).await;

        assert_eq!(data, json!({ "createMemo": { "memo": null, "error": 401 } }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["extensions"]["status"], json!(401));
        assert_eq!(errors[0]["extensions"]["code"], json!("UNAUTHORIZED"));

        let (data, _) = run(&schema, "{ memos(limit: 10) { memos { _id } lastPage } }").await;
        assert_eq!(data, json!({ "memos": { "memos": [], "lastPage": 0 } }));
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let schema = schema();
        for content in ["one", "two", "three"] {
            let (data, errors) =
                run(&schema, create(content).data(Identity::new("Alice"))).await;
            assert!(errors.is_empty());
            assert_eq!(data["createMemo"]["memo"]["writer"], json!("Alice"));
            assert_eq!(data["createMemo"]["memo"]["content"], json!(content));
            assert_eq!(
                data["createMemo"]["memo"]["createdAt"],
                json!("2024-05-01T12:00:00.000Z")
            );
            assert_eq!(data["createMemo"]["error"], Value::Null);
        }

        let (data, _) =
            run(&schema, "{ memos(limit: 2) { memos { _id content } lastPage } }").await;
        assert_eq!(data["memos"]["lastPage"], json!(2));
        let memos = data["memos"]["memos"].as_array().unwrap();
        assert_eq!(memos.len(), 2);
        assert_eq!(memos[0]["content"], json!("three"));
        assert_eq!(memos[1]["content"], json!("two"));

        // Next page through the cursor
        let cursor = memos[1]["_id"].as_str().unwrap();
        let (data, _) = run(
            &schema,
            format!(r#"{{ memos(limit: 2, cursor: "{cursor}") {{ memos {{ content }} lastPage }} }}"#),
        )
        .await;
        assert_eq!(
            data,
            json!({ "memos": { "memos": [{ "content": "one" }], "lastPage": 2 } })
        );
    }

    #[tokio::test]
    async fn test_malformed_cursor_returns_empty_page() {
        let schema = schema();
        run(&schema, create("one").data(Identity::new("Alice"))).await;

        let (data, errors) = run(
            &schema,
            r#"{ memos(limit: 5, cursor: "bogus") { memos { _id } lastPage } }"#,
        )
        .await;
        assert!(errors.is_empty());
        assert_eq!(data, json!({ "memos": { "memos": [], "lastPage": 0 } }));
    }

    #[tokio::test]
    async fn test_invalid_limit_is_a_field_error() {
        let schema = schema();
        let (_, errors) = run(&schema, "{ memos(limit: 0) { lastPage } }").await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["extensions"]["status"], json!(400));
    }

    #[tokio::test]
    async fn test_memo_and_update() {
        let schema = schema();
        let (data, _) = run(&schema, create("draft").data(Identity::new("Alice"))).await;
        let id = data["createMemo"]["memo"]["_id"].as_str().unwrap().to_string();

        let (data, _) = run(
            &schema,
            format!(r#"{{ memo(_id: "{id}") {{ _id content writer }} }}"#),
        )
        .await;
        assert_eq!(
            data,
            json!({ "memo": { "_id": id, "content": "draft", "writer": "Alice" } })
        );

        let update =
            format!(r#"mutation {{ updateMemo(_id: "{id}", content: "final") {{ content writer }} }}"#);

        // Anonymous updates are refused
        let (data, errors) = run(&schema, update.as_str()).await;
        assert_eq!(data, json!({ "updateMemo": null }));
        assert_eq!(errors[0]["extensions"]["status"], json!(401));

        let (data, errors) =
            run(&schema, Request::new(update).data(Identity::new("Bob"))).await;
        assert!(errors.is_empty());
        assert_eq!(
            data,
            json!({ "updateMemo": { "content": "final", "writer": "Alice" } })
        );

        let (data, _) = run(&schema, r#"{ memo(_id: "missing") { _id } }"#).await;
        assert_eq!(data, json!({ "memo": null }));
    }

    #[tokio::test]
    async fn test_memo_created_subscription() {
        let schema = schema();
        let mut stream = schema.execute_stream("subscription { memoCreated { content writer } }");

        // Give the subscription a moment to register before publishing
        let pending = timeout(Duration::from_millis(50), stream.next()).await;
        assert!(pending.is_err());

        run(&schema, create("live").data(Identity::new("Alice"))).await;

        let response = timeout(Duration::from_millis(500), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "memoCreated": { "content": "live", "writer": "Alice" } })
        );
    }

    #[test]
    fn test_sdl_uses_underscore_id_and_camel_case() {
        let sdl = sdl();
        assert!(sdl.contains("_id: ID!"));
        assert!(sdl.contains("memos(limit: Int!, cursor: String): MemoPage!"));
        assert!(sdl.contains("lastPage: Int!"));
        assert!(sdl.contains("createMemo(content: String!, createdAt: String!): CreateMemoResult!"));
        assert!(sdl.contains("memoCreated: Memo!"));
    }
}
