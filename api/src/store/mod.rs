use async_trait::async_trait;
use diesel_async::pooled_connection::deadpool::PoolError;
use uuid::Uuid;

use crate::{
    blog::models::blog_comment::{BlogComment, CommentWithAuthor},
    identity::models::identity::Identity,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Cast to UUID failed for value \"{value}\" at path \"{path}\"")]
    InvalidId { value: String, path: &'static str },

    #[error("No comment found with id \"{0}\"")]
    CommentNotFound(String),

    #[error("Path `{0}` is required.")]
    MissingField(&'static str),

    #[error(transparent)]
    Query(#[from] diesel::result::Error),

    #[error("Could not get a database connection: {0}")]
    Pool(#[from] PoolError),
}

/// Identifiers reach the store as the client sent them. A malformed one is a
/// store error, same as a failed query.
pub fn parse_id(value: &str, path: &'static str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|_| StoreError::InvalidId {
        value: value.to_owned(),
        path,
    })
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// All comments of a post in insertion order, authors resolved.
    async fn find_by_post(&self, post: &str) -> Result<Vec<CommentWithAuthor>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogComment>, StoreError>;

    async fn insert(
        &self,
        user_id: Uuid,
        post: &str,
        content: String,
    ) -> Result<BlogComment, StoreError>;

    /// Persists the mutable fields of an existing comment.
    async fn save(&self, comment: &BlogComment) -> Result<BlogComment, StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The identity owning an active, unexpired session with this token.
    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, StoreError>;
}
