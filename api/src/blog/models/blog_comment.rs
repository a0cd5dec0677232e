use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::identity::models::identity::Traits;

// The model that maps to the database table, also what create and update
// return to the client
#[derive(Queryable, Selectable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::blog_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct BlogComment {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "post")]
    pub post_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::blog_comments)]
pub struct NewBlogComment {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::blog_comments)]
pub struct UpdateBlogComment<'a> {
    pub content: &'a str,
    pub updated_at: NaiveDateTime,
}

/// A comment with its `user` reference resolved to the author's public
/// fields, as returned by the listing endpoint.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    pub id: Uuid,
    /// `None` when the authoring identity no longer exists.
    pub user: Option<Author>,
    pub post: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub name: Option<String>,
}

impl CommentWithAuthor {
    /// Joins a comment with the traits of its author, if the author was found.
    pub fn from_joined(comment: BlogComment, author_traits: Option<serde_json::Value>) -> Self {
        let user = author_traits.map(|traits| Author {
            id: comment.user_id,
            name: Traits::from(traits).name,
        });

        CommentWithAuthor {
            id: comment.id,
            user,
            post: comment.post_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
