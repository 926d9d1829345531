use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use quill_crypto::CookieSigner;
use quill_db::Store;
use quill_types::models::User;

use crate::auth::AppState;

pub const SESSION_COOKIE: &str = "user_id";

/// Who is making the request. Lives in request extensions, inserted by
/// [`resolve_session`].
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.user().map(|u| u.name.as_str())
    }
}

/// Resolve the signed `user_id` cookie into a [`Session`] for every request.
/// Nothing is rejected here; handlers decide what anonymous visitors may do.
pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie = jar.get(SESSION_COOKIE).map(|c| c.value());
    let session = identify(&state.signer, state.store.as_ref(), cookie);
    req.extensions_mut().insert(session);
    next.run(req).await
}

pub fn identify(signer: &CookieSigner, store: &dyn Store, cookie: Option<&str>) -> Session {
    let Some(raw) = cookie.filter(|v| !v.is_empty()) else {
        return Session::Anonymous;
    };

    let Some(value) = signer.unsign(raw) else {
        warn!("Rejected session cookie with bad signature");
        return Session::Anonymous;
    };

    let Ok(user_id) = value.parse::<i64>() else {
        warn!("Signed session cookie holds a non-numeric id '{}'", value);
        return Session::Anonymous;
    };

    match store.user_by_id(user_id) {
        Ok(Some(user)) => {
            debug!(user = %user.name, "Session resolved");
            Session::Authenticated(user)
        }
        Ok(None) => {
            debug!(user_id, "Session cookie points at a missing user");
            Session::Anonymous
        }
        Err(e) => {
            warn!("User lookup failed during session resolution: {:#}", e);
            Session::Anonymous
        }
    }
}

/// `user_id=<signed id>; Path=/`, plus `HttpOnly; SameSite=Lax` when hardened.
pub fn login_cookie(signer: &CookieSigner, user: &User, hardened: bool) -> Cookie<'static> {
    session_cookie(signer.sign(&user.id.to_string()), hardened)
}

pub fn logout_cookie(hardened: bool) -> Cookie<'static> {
    session_cookie(String::new(), hardened)
}

fn session_cookie(value: String, hardened: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value)).path("/");
    if hardened {
        builder = builder.http_only(true).same_site(SameSite::Lax);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_db::{MemoryStore, NewUser, UserRepo};

    fn setup() -> (CookieSigner, MemoryStore, User) {
        let signer = CookieSigner::new("test-secret");
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                name: "alice".into(),
                pw_hash: "a,b".into(),
                email: None,
            })
            .unwrap();
        (signer, store, user)
    }

    #[test]
    fn valid_cookie_authenticates() {
        let (signer, store, user) = setup();
        let token = signer.sign(&user.id.to_string());
        let session = identify(&signer, &store, Some(&token));
        assert_eq!(session.name(), Some("alice"));
    }

    #[test]
    fn missing_or_empty_cookie_is_anonymous() {
        let (signer, store, _) = setup();
        assert!(identify(&signer, &store, None).user().is_none());
        assert!(identify(&signer, &store, Some("")).user().is_none());
    }

    #[test]
    fn forged_cookie_is_anonymous() {
        let (signer, store, user) = setup();
        let forged = format!("{}|{}", user.id, "0".repeat(64));
        assert!(identify(&signer, &store, Some(&forged)).user().is_none());

        let unsigned = user.id.to_string();
        assert!(identify(&signer, &store, Some(&unsigned)).user().is_none());
    }

    #[test]
    fn stale_user_is_anonymous() {
        let (signer, store, _) = setup();
        let token = signer.sign("999");
        assert!(identify(&signer, &store, Some(&token)).user().is_none());
    }

    #[test]
    fn non_numeric_payload_is_anonymous() {
        let (signer, store, _) = setup();
        let token = signer.sign("alice");
        assert!(identify(&signer, &store, Some(&token)).user().is_none());
    }

    #[test]
    fn cookie_flags() {
        let (signer, _, user) = setup();
        let plain = login_cookie(&signer, &user, false);
        assert_eq!(plain.name(), "user_id");
        assert_eq!(plain.path(), Some("/"));
        assert_eq!(plain.http_only(), None);
        assert_eq!(signer.unsign(plain.value()), Some(user.id.to_string()));

        let hardened = login_cookie(&signer, &user, true);
        assert_eq!(hardened.http_only(), Some(true));
        assert_eq!(hardened.same_site(), Some(SameSite::Lax));

        let cleared = logout_cookie(false);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.path(), Some("/"));
    }
}
