use axum::{
    Json, debug_handler,
    extract::{Path, State},
};

use crate::{App, blog::models::blog_comment::CommentWithAuthor, error::AppError};

/// Lists every comment of a post, each with its author's name. A post that
/// doesn't exist simply has no comments.
#[debug_handler]
pub async fn get_comments(
    State(ctx): State<App>,
    Path(post): Path<String>,
) -> Result<Json<Vec<CommentWithAuthor>>, AppError> {
    let comments = ctx.comments.find_by_post(&post).await?;

    Ok(Json(comments))
}
