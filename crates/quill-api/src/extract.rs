//! Path id extraction. Ids arrive as raw path text and anything that is not
//! a plain decimal `i64` counts as a missing entity.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::BlogError;

/// Numeric id taken from the single path parameter of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = BlogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| BlogError::NotFound)?;
        parse_id(&raw).map(Self).ok_or(BlogError::NotFound)
    }
}

/// Digits only: no sign, no whitespace, and it must fit in an `i64`.
pub fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
