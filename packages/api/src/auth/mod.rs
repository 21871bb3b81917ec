//! Bearer-token authentication for memo requests.
//!
//! The transport layer decodes the `Authorization: Bearer …` header once per
//! request with [`TokenKeys::identify`] and attaches the resulting
//! [`Identity`] (the decoded token) to the GraphQL request. A missing or
//! invalid token simply means "no identity"; resolvers decide what that costs.

mod bearer;
mod token;

pub use bearer::bearer_token;
pub use token::{AuthError, Claims, Identity, TokenKeys};
