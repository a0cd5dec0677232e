use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    App, blog::models::blog_comment::BlogComment, error::AppError, identity::AuthUser,
    store::StoreError,
};

#[debug_handler]
pub async fn update_comment(
    State(ctx): State<App>,
    Path(id): Path<String>,
    AuthUser(auth_user): AuthUser,
    // read only once the caller is known to own the comment
    patch: Result<crate::json::Json<CommentPatch>, AppError>,
) -> Result<Json<BlogComment>, AppError> {
    let mut comment = ctx
        .comments
        .find_by_id(&id)
        .await?
        .ok_or_else(|| StoreError::CommentNotFound(id.clone()))?;

    if comment.user_id != auth_user.id {
        tracing::debug!(
            comment_id = %comment.id,
            identity_id = %auth_user.id,
            "Refused update of a comment owned by someone else"
        );
        return Err(("Unauthorized", StatusCode::UNAUTHORIZED).into());
    }

    // Unlike creation, an empty string is accepted here. A body that is not
    // `{content: string}` counts as a missing content.
    let content = patch
        .ok()
        .and_then(|crate::json::Json(patch)| patch.content)
        .ok_or(StoreError::MissingField("content"))?;

    if content == comment.content {
        return Ok(Json(comment));
    }

    comment.content = content;
    let comment = ctx.comments.save(&comment).await?;

    Ok(Json(comment))
}

#[derive(Deserialize, Debug)]
pub struct CommentPatch {
    content: Option<String>,
}
