use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    blog::models::blog_comment::{BlogComment, CommentWithAuthor},
    identity::models::{
        identity::{Identity, Traits},
        session::Session,
    },
};

use super::{CommentStore, SessionStore, StoreError, parse_id};

/// Keeps everything in process, used by the handler tests. Listing order is
/// insertion order, same as the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    comments: RwLock<Vec<BlogComment>>,
    identities: RwLock<HashMap<Uuid, Identity>>,
    sessions: RwLock<HashMap<String, Session>>,
    failing: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an identity with a fresh active session, returns it and the
    /// session token.
    pub async fn add_identity(&self, name: &str) -> (Identity, String) {
        let now = chrono::Utc::now().naive_utc();
        let identity = Identity {
            id: Uuid::new_v4(),
            traits: serde_json::Value::from(&Traits {
                email: None,
                name: Some(name.to_owned()),
            }),
            created_at: now,
            updated_at: now,
        };

        let token = format!("session_{}", Uuid::new_v4().simple());
        let session = Session {
            id: self.sessions.read().await.len() as i32 + 1,
            token: token.clone(),
            active: true,
            issued_at: now - chrono::Duration::try_seconds(1).unwrap_or_default(),
            expires_at: now + chrono::Duration::try_days(365).unwrap_or_default(),
            identity_id: identity.id,
            created_at: now,
            updated_at: now,
        };

        self.identities
            .write()
            .await
            .insert(identity.id, identity.clone());
        self.sessions.write().await.insert(token.clone(), session);

        (identity, token)
    }

    pub async fn revoke_session(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.active = false;
        }
    }

    pub async fn remove_identity(&self, id: Uuid) {
        self.identities.write().await.remove(&id);
    }

    /// Makes every subsequent store call fail like a lost database.
    pub async fn fail_all(&self) {
        *self.failing.write().await = true;
    }

    pub async fn comments(&self) -> Vec<BlogComment> {
        self.comments.read().await.clone()
    }

    async fn check_available(&self) -> Result<(), StoreError> {
        if *self.failing.read().await {
            return Err(StoreError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ClosedConnection,
                Box::new("connection closed".to_owned()),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_by_post(&self, post: &str) -> Result<Vec<CommentWithAuthor>, StoreError> {
        let post_id = parse_id(post, "post")?;
        self.check_available().await?;

        let identities = self.identities.read().await;

        Ok(self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| {
                let traits = identities.get(&c.user_id).map(|i| i.traits.clone());
                CommentWithAuthor::from_joined(c.clone(), traits)
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogComment>, StoreError> {
        let id = parse_id(id, "id")?;
        self.check_available().await?;

        Ok(self
            .comments
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: Uuid,
        post: &str,
        content: String,
    ) -> Result<BlogComment, StoreError> {
        let post_id = parse_id(post, "post")?;
        self.check_available().await?;

        let now = chrono::Utc::now().naive_utc();
        let comment = BlogComment {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            content,
            created_at: now,
            updated_at: now,
        };

        self.comments.write().await.push(comment.clone());

        Ok(comment)
    }

    async fn save(&self, comment: &BlogComment) -> Result<BlogComment, StoreError> {
        self.check_available().await?;

        let mut comments = self.comments.write().await;
        let stored = comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or_else(|| StoreError::CommentNotFound(comment.id.to_string()))?;

        stored.content = comment.content.clone();
        stored.updated_at = chrono::Utc::now().naive_utc();

        Ok(stored.clone())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, StoreError> {
        self.check_available().await?;

        let now = chrono::Utc::now().naive_utc();
        let identity_id = match self.sessions.read().await.get(token) {
            Some(session) if session.is_valid_at(now) => session.identity_id,
            _ => return Ok(None),
        };

        Ok(self.identities.read().await.get(&identity_id).cloned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_listing_keeps_insertion_order() {
        let store = MemoryStore::new();
        let (ada, _) = store.add_identity("Ada").await;
        let post = Uuid::new_v4().to_string();

        for content in ["first", "second", "third"] {
            store.insert(ada.id, &post, content.into()).await.unwrap();
        }

        let listed: Vec<String> = store
            .find_by_post(&post)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.content)
            .collect();

        assert_eq!(listed, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_revoked_session_resolves_to_nobody() {
        let store = MemoryStore::new();
        let (ada, token) = store.add_identity("Ada").await;

        let found = store.identity_for_token(&token).await.unwrap();
        assert_eq!(found.map(|i| i.id), Some(ada.id));

        store.revoke_session(&token).await;
        assert!(store.identity_for_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_unknown_comment_fails() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now().naive_utc();
        let ghost = BlogComment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            content: "boo".into(),
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(
            store.save(&ghost).await,
            Err(StoreError::CommentNotFound(_))
        ));
    }
}
