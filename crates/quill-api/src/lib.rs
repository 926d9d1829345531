pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod likes;
pub mod policy;
pub mod posts;
pub mod session;
pub mod validation;
pub mod views;

use axum::{Router, middleware, routing::get};

pub use auth::{AppState, AppStateInner};

/// The full blog surface. Every route sees a resolved [`session::Session`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::root))
        .route("/blog", get(posts::front).post(posts::front_jump))
        .route("/blog/", get(posts::front).post(posts::front_jump))
        .route("/blog/{post_id}", get(posts::permalink))
        .route("/blog/newpost", get(posts::new_post_form).post(posts::create_post))
        .route("/blog/edit/{post_id}", get(posts::edit_post_form).post(posts::update_post))
        .route("/blog/delete/{post_id}", get(posts::delete_post))
        .route("/blog/likes/{post_id}", get(likes::toggle_like))
        .route(
            "/blog/newcomment/{post_id}",
            get(comments::new_comment_form).post(comments::create_comment),
        )
        .route(
            "/blog/editcomment/{comment_id}",
            get(comments::edit_comment_form).post(comments::update_comment),
        )
        .route("/blog/deletecomment/{comment_id}", get(comments::delete_comment))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .layer(middleware::from_fn_with_state(state.clone(), session::resolve_session))
        .with_state(state)
}
