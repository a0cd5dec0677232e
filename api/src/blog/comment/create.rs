use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{App, blog::models::blog_comment::BlogComment, error::AppError, identity::AuthUser};

#[debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    Path(post): Path<String>,
    AuthUser(auth_user): AuthUser,
    crate::json::Json(submission): crate::json::Json<CommentSubmission>,
) -> Result<Json<BlogComment>, AppError> {
    let content = submission
        .validate()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    // the author and the post come from the session and the path, never the body
    let comment = ctx.comments.insert(auth_user.id, &post, content).await?;

    tracing::debug!(
        comment_id = %comment.id,
        post_id = %comment.post_id,
        identity_id = %auth_user.id,
        "Comment created"
    );

    Ok(Json(comment))
}

#[derive(Deserialize, Debug)]
pub struct CommentSubmission {
    content: Option<String>,
}

impl CommentSubmission {
    /// Returns the content to store, or the message of the first rule broken.
    fn validate(self) -> Result<String, &'static str> {
        match self.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err("Content is required"),
        }
    }
}
