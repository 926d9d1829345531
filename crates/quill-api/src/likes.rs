use axum::{
    Extension,
    extract::State,
    response::Redirect,
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::BlogError;
use crate::extract::EntityId;
use crate::policy::{LikeAction, like_action};
use crate::posts::permalink_url;
use crate::session::Session;

/// Flip the current user's like on a post. Authors liking their own post is
/// a no-op that still lands back on the permalink.
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    EntityId(post_id): EntityId,
) -> Result<Redirect, BlogError> {
    let post = state.store.post_by_id(post_id)?.ok_or(BlogError::NotFound)?;

    match like_action(&session, &post)? {
        LikeAction::OwnPost => {}
        LikeAction::Toggle(name) => {
            let added = state.store.toggle_like(post.id, name)?;
            debug!(post_id = post.id, user = %name, added, "Like toggled");
        }
    }

    Ok(Redirect::to(&permalink_url(post.id)))
}
