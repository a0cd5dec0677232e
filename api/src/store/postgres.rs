use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{
    AsyncPgConnection, RunQueryDsl,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{BuildError, Pool},
    },
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{
    blog::models::blog_comment::{
        BlogComment, CommentWithAuthor, NewBlogComment, UpdateBlogComment,
    },
    identity::models::{identity::Identity, session::Session},
    schema::{blog_comments, identities, sessions},
};

use super::{CommentStore, SessionStore, StoreError, parse_id};

pub type DieselPool = Pool<AsyncPgConnection>;

pub fn build_pool(database_url: &str, max_connections: usize) -> Result<DieselPool, BuildError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    Pool::builder(manager)
        .max_size(max_connections)
        .wait_timeout(Some(Duration::from_secs(10)))
        .create_timeout(Some(Duration::from_secs(10)))
        .recycle_timeout(Some(Duration::from_secs(120)))
        .runtime(deadpool_runtime::Runtime::Tokio1)
        .build()
}

#[derive(Clone)]
pub struct PgStore {
    pool: DieselPool,
}

impl PgStore {
    pub fn new(pool: DieselPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn find_by_post(&self, post: &str) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let post_id = parse_id(post, "post")?;
        let mut conn = self.pool.get().await?;

        let rows = blog_comments::table
            .left_join(identities::table)
            .filter(blog_comments::post_id.eq(post_id))
            .order(blog_comments::seq.asc())
            .select((BlogComment::as_select(), identities::traits.nullable()))
            .load::<(BlogComment, Option<JsonValue>)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(comment, traits)| CommentWithAuthor::from_joined(comment, traits))
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogComment>, StoreError> {
        let id = parse_id(id, "id")?;
        let mut conn = self.pool.get().await?;

        Ok(blog_comments::table
            .find(id)
            .select(BlogComment::as_select())
            .first::<BlogComment>(&mut conn)
            .await
            .optional()?)
    }

    async fn insert(
        &self,
        user_id: Uuid,
        post: &str,
        content: String,
    ) -> Result<BlogComment, StoreError> {
        let post_id = parse_id(post, "post")?;
        let mut conn = self.pool.get().await?;

        Ok(diesel::insert_into(blog_comments::table)
            .values(&NewBlogComment {
                user_id,
                post_id,
                content,
            })
            .returning(BlogComment::as_returning())
            .get_result(&mut conn)
            .await?)
    }

    async fn save(&self, comment: &BlogComment) -> Result<BlogComment, StoreError> {
        let mut conn = self.pool.get().await?;

        diesel::update(blog_comments::table.find(comment.id))
            .set(UpdateBlogComment {
                content: &comment.content,
                updated_at: chrono::Utc::now().naive_utc(),
            })
            .returning(BlogComment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            // deleted between lookup and save
            .ok_or_else(|| StoreError::CommentNotFound(comment.id.to_string()))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, StoreError> {
        let mut conn = self.pool.get().await?;

        let found = sessions::table
            .inner_join(identities::table)
            .filter(sessions::token.eq(token))
            .filter(sessions::active.eq(true))
            .select((Session::as_select(), Identity::as_select()))
            .first::<(Session, Identity)>(&mut conn)
            .await
            .optional()?;

        let now = chrono::Utc::now().naive_utc();

        Ok(found
            .filter(|(session, _)| session.is_valid_at(now))
            .map(|(_, identity)| identity))
    }
}
