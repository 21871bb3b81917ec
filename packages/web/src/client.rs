//! # GraphQL client for the memo API
//!
//! Plain GraphQL-over-HTTP with `reqwest`, which works both natively and in the
//! browser. The endpoint is baked in at build time from `MEMO_API_URL`, falling
//! back to a local server.
//!
//! Errors are returned as display strings; the pages only ever show them.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4000/graphql";

const MEMOS_QUERY: &str = "query Memos($limit: Int!, $cursor: String) {
  memos(limit: $limit, cursor: $cursor) { memos { _id content writer createdAt } lastPage }
}";

const CREATE_MEMO_MUTATION: &str = "mutation CreateMemo($content: String!, $createdAt: String!) {
  createMemo(content: $content, createdAt: $createdAt) { memo { _id content writer createdAt } error }
}";

pub fn endpoint() -> &'static str {
    option_env!("MEMO_API_URL").unwrap_or(DEFAULT_ENDPOINT)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemoView {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub writer: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoPageView {
    pub memos: Vec<MemoView>,
    pub last_page: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateMemoView {
    pub memo: Option<MemoView>,
    pub error: Option<i32>,
}

#[derive(Serialize)]
struct GraphQLRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

impl<T> GraphQLResponse<T> {
    /// Data when present (even alongside field errors), otherwise the joined messages.
    fn into_result(self) -> Result<T, String> {
        match self.data {
            Some(data) => Ok(data),
            None if self.errors.is_empty() => Err("empty GraphQL response".to_string()),
            None => Err(self
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ")),
        }
    }
}

async fn execute<V: Serialize, T: DeserializeOwned>(
    query: &str,
    variables: V,
    token: Option<&str>,
) -> Result<T, String> {
    let mut request = reqwest::Client::new()
        .post(endpoint())
        .json(&GraphQLRequest { query, variables });
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response: GraphQLResponse<T> = request
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json()
        .await
        .map_err(|e| e.to_string())?;
    response.into_result()
}

#[derive(Serialize)]
struct MemosVariables {
    limit: i32,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemosData {
    memos: MemoPageView,
}

/// Fetch one page of memos older than `cursor`.
pub async fn fetch_memos(limit: i32, cursor: Option<String>) -> Result<MemoPageView, String> {
    let data: MemosData = execute(MEMOS_QUERY, MemosVariables { limit, cursor }, None).await?;
    Ok(data.memos)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMemoVariables<'a> {
    content: &'a str,
    created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMemoData {
    create_memo: CreateMemoView,
}

/// Create a memo stamped with the current time.
pub async fn create_memo(token: &str, content: &str) -> Result<CreateMemoView, String> {
    let variables = CreateMemoVariables {
        content,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let data: CreateMemoData = execute(CREATE_MEMO_MUTATION, variables, Some(token)).await?;
    Ok(data.create_memo)
}
