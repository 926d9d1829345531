use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use quill_db::NewPost;
use quill_types::forms::{BlogFrontForm, PostForm};

use crate::auth::AppState;
use crate::error::BlogError;
use crate::extract::{EntityId, parse_id};
use crate::policy::{require_login, require_post_author};
use crate::session::Session;
use crate::views::{FrontPage, PermalinkPage, PostFormPage};

pub fn permalink_url(post_id: i64) -> String {
    format!("/blog/{}", post_id)
}

pub async fn root() -> Redirect {
    Redirect::to("/blog")
}

pub async fn front(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, BlogError> {
    let posts = state.store.list_posts()?;
    Ok(FrontPage {
        user: session.name(),
        posts: &posts,
    }
    .render()
    .into_response())
}

/// Legacy: the front page form posts an id to jump to. Anything that is not
/// an id lands back on the front page.
pub async fn front_jump(Form(form): Form<BlogFrontForm>) -> Redirect {
    match parse_id(form.id.trim()) {
        Some(post_id) => Redirect::to(&permalink_url(post_id)),
        None => Redirect::to("/blog"),
    }
}

pub async fn permalink(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    let comments = state.store.comments_for_post(post.id)?;
    Ok(PermalinkPage {
        user: session.name(),
        post: &post,
        comments: &comments,
        error: None,
    }
    .render()
    .into_response())
}

pub async fn new_post_form(Extension(session): Extension<Session>) -> Result<Response, BlogError> {
    let user = require_login(&session)?;
    Ok(PostFormPage {
        user: Some(&user.name),
        heading: "new post",
        action: "/blog/newpost".to_string(),
        subject: "",
        content: "",
        error: None,
    }
    .render()
    .into_response())
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<PostForm>,
) -> Result<Response, BlogError> {
    let user = require_login(&session)?;

    if !form.is_complete() {
        return Ok(PostFormPage {
            user: Some(&user.name),
            heading: "new post",
            action: "/blog/newpost".to_string(),
            subject: &form.subject,
            content: &form.content,
            error: Some("subject and content, please!"),
        }
        .render()
        .into_response());
    }

    let post = state.store.create_post(NewPost {
        subject: form.subject,
        content: form.content,
        author: user.name.clone(),
    })?;
    info!(post_id = post.id, author = %post.author, "Post created");

    Ok(Redirect::to(&permalink_url(post.id)).into_response())
}

pub async fn edit_post_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    let user = require_post_author(&session, &post)?;

    Ok(PostFormPage {
        user: Some(&user.name),
        heading: "edit post",
        action: format!("/blog/edit/{}", post.id),
        subject: &post.subject,
        content: &post.content,
        error: None,
    }
    .render()
    .into_response())
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
    Form(form): Form<PostForm>,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    let user = require_post_author(&session, &post)?;

    if !form.is_complete() {
        return Ok(PostFormPage {
            user: Some(&user.name),
            heading: "edit post",
            action: format!("/blog/edit/{}", post.id),
            subject: &form.subject,
            content: &form.content,
            error: Some("Please fill in the subject and content."),
        }
        .render()
        .into_response());
    }

    // The post may have been deleted since the lookup above.
    if !state.store.update_post(post.id, &form.subject, &form.content)? {
        return Err(BlogError::NotFound);
    }
    info!(post_id = post.id, "Post edited");

    Ok(Redirect::to(&permalink_url(post.id)).into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
) -> Result<Response, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;
    require_post_author(&session, &post)?;

    state.store.delete_post(post.id)?;
    info!(post_id = post.id, "Post deleted");

    Ok(Redirect::to("/blog").into_response())
}
