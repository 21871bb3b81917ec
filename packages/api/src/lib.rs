//! # API crate — the memo GraphQL API
//!
//! Everything between the transport and the store lives here.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Bearer-token decoding into an [`Identity`], token issuing for development |
//! | [`error`] | [`MemoError`], the single failure type of every memo operation |
//! | [`pubsub`] | [`MemoBroker`], in-process fan-out of created memos |
//! | [`service`] | [`MemoService`], the query/mutation/subscription contract over a [`store::MemoStore`] |
//! | [`schema`] | async-graphql bindings: [`build_schema`] and the [`MemoSchema`] type |
//!
//! ## Wiring
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use api::{build_schema, MemoBroker, MemoPolicy, MemoService};
//!
//! let service = MemoService::new(
//!     Arc::new(store::MemoryStore::new()),
//!     MemoBroker::default(),
//!     MemoPolicy::default(),
//! );
//! let schema = build_schema(service);
//! ```

pub mod auth;
pub mod error;
pub mod pubsub;
pub mod schema;
pub mod service;

pub use auth::{Identity, TokenKeys};
pub use error::MemoError;
pub use pubsub::MemoBroker;
pub use schema::{build_schema, MemoSchema};
pub use service::{MemoPage, MemoPolicy, MemoService};
