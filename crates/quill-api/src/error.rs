use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::error;

/// Request failures. Only `Store` is ever shown to the visitor; every
/// authorization and lookup failure turns into a plain redirect.
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("not the author")]
    NotOwner,

    #[error("entity not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        match self {
            Self::NotLoggedIn | Self::NotOwner => Redirect::to("/login").into_response(),
            Self::NotFound => Redirect::to("/blog").into_response(),
            Self::Store(e) => {
                error!("Store failure: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Something went wrong</h1>"),
                )
                    .into_response()
            }
        }
    }
}
