use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use quill_db::NewComment;
use quill_types::forms::CommentForm;
use quill_types::models::{Comment, Post};

use crate::auth::AppState;
use crate::error::BlogError;
use crate::extract::EntityId;
use crate::policy::{require_comment_author, require_login};
use crate::posts::permalink_url;
use crate::session::Session;
use crate::views::{CommentFormPage, PermalinkPage};

const BLANK_COMMENT: &str = "You can't leave a blank comment!";

pub async fn new_comment_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    let user = require_login(&session)?;

    Ok(CommentFormPage {
        user: Some(&user.name),
        post: &post,
        action: format!("/blog/newcomment/{}", post.id),
        content: "",
        error: None,
    }
    .render()
    .into_response())
}

/// A blank comment re-renders the permalink with the error under the post.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
    Form(form): Form<CommentForm>,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    let user = require_login(&session)?;

    if form.content.is_empty() {
        let comments = state.store.comments_for_post(post.id)?;
        return Ok(PermalinkPage {
            user: Some(&user.name),
            post: &post,
            comments: &comments,
            error: Some(BLANK_COMMENT),
        }
        .render()
        .into_response());
    }

    let comment = state.store.create_comment(NewComment {
        post_id: post.id,
        content: form.content,
        author: user.name.clone(),
    })?;
    info!(comment_id = comment.id, post_id = post.id, author = %comment.author, "Comment created");

    Ok(Redirect::to(&permalink_url(post.id)).into_response())
}

pub async fn edit_comment_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(comment_id): EntityId,
) -> Result<Response, BlogError> {
    let (comment, post) = comment_with_post(&state, comment_id)?;
    let user = require_comment_author(&session, &comment)?;

    Ok(CommentFormPage {
        user: Some(&user.name),
        post: &post,
        action: format!("/blog/editcomment/{}", comment.id),
        content: &comment.content,
        error: None,
    }
    .render()
    .into_response())
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(comment_id): EntityId,
    Form(form): Form<CommentForm>,
) -> Result<Response, BlogError> {
    let (comment, post) = comment_with_post(&state, comment_id)?;
    let user = require_comment_author(&session, &comment)?;

    if form.content.is_empty() {
        return Ok(CommentFormPage {
            user: Some(&user.name),
            post: &post,
            action: format!("/blog/editcomment/{}", comment.id),
            content: "",
            error: Some(BLANK_COMMENT),
        }
        .render()
        .into_response());
    }

    if !state.store.update_comment(comment.id, &form.content)? {
        return Err(BlogError::NotFound);
    }
    info!(comment_id = comment.id, "Comment edited");

    Ok(Redirect::to(&permalink_url(post.id)).into_response())
}

/// Non-authors are bounced back to the post without any change.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(comment_id): EntityId,
) -> Result<Redirect, BlogError> {
    let user = require_login(&session)?;
    let comment = state.store.comment_by_id(comment_id)?.ok_or(BlogError::NotFound)?;

    if comment.is_authored_by(&user.name) {
        state.store.delete_comment(comment.id)?;
        info!(comment_id = comment.id, "Comment deleted");
    }

    Ok(Redirect::to(&permalink_url(comment.post_id)))
}

/// A comment and the post it hangs off. A comment whose post is gone counts
/// as missing.
fn comment_with_post(state: &AppState, comment_id: i64) -> Result<(Comment, Post), BlogError> {
    let comment = state.store.comment_by_id(comment_id)?.ok_or(BlogError::NotFound)?;
    let post = state.store.post_by_id(comment.post_id)?.ok_or(BlogError::NotFound)?;
    Ok((comment, post))
}
