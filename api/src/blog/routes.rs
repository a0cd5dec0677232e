use axum::{Router, routing::get};

use crate::App;

use super::comment::{create::create_comment, get::get_comments, update::update_comment};

pub fn route() -> Router<App> {
    // `{id}` is the post id for GET and POST, the comment id for PUT
    Router::<App>::new().route(
        "/{id}",
        get(get_comments).post(create_comment).put(update_comment),
    )
}
