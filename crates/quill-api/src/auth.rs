use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use quill_crypto::{CookieSigner, PasswordScheme, verify_password};
use quill_db::{NewUser, Store};
use quill_types::forms::{LoginForm, SignupForm};
use quill_types::models::User;

use crate::error::BlogError;
use crate::session::{Session, login_cookie, logout_cookie};
use crate::validation::{SignupErrors, check_signup};
use crate::views::{LoginPage, SignupPage};

pub type AppState = Arc<AppStateInner>;

/// Process-wide, read-only after startup.
pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    pub signer: CookieSigner,
    pub password_scheme: PasswordScheme,
    /// Adds `HttpOnly; SameSite=Lax` to the session cookie.
    pub cookie_hardened: bool,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>, signer: CookieSigner) -> Self {
        Self {
            store,
            signer,
            password_scheme: PasswordScheme::default(),
            cookie_hardened: false,
        }
    }
}

pub async fn signup_form() -> impl IntoResponse {
    SignupPage::default().render()
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, BlogError> {
    let errors = check_signup(&form);
    if !errors.is_empty() {
        return Ok(SignupPage {
            username: &form.username,
            email: &form.email,
            errors,
        }
        .render()
        .into_response());
    }

    if state.store.user_by_name(&form.username)?.is_some() {
        return Ok(SignupPage {
            username: &form.username,
            email: &form.email,
            errors: SignupErrors {
                username: Some("That user already exists."),
                ..Default::default()
            },
        }
        .render()
        .into_response());
    }

    let pw_hash = state
        .password_scheme
        .hash(&form.username, &form.password)
        .map_err(anyhow::Error::from)?;
    let email = Some(form.email).filter(|e| !e.is_empty());
    let user = state.store.create_user(NewUser {
        name: form.username,
        pw_hash,
        email,
    })?;
    info!(user = %user.name, id = user.id, "User registered");

    let jar = jar.add(login_cookie(&state.signer, &user, state.cookie_hardened));
    Ok((jar, Redirect::to("/blog")).into_response())
}

pub async fn login_form(Extension(session): Extension<Session>) -> Response {
    if session.user().is_some() {
        return Redirect::to("/blog").into_response();
    }
    LoginPage::default().render().into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, BlogError> {
    let Some(user) = authenticate(state.store.as_ref(), &form.username, &form.password)? else {
        warn!(user = %form.username, "Failed login");
        return Ok(LoginPage {
            error: Some("Invalid login"),
        }
        .render()
        .into_response());
    };

    let jar = jar.add(login_cookie(&state.signer, &user, state.cookie_hardened));
    Ok((jar, Redirect::to("/blog")).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Response {
    let jar = if session.user().is_some() {
        jar.add(logout_cookie(state.cookie_hardened))
    } else {
        jar
    };
    (jar, Redirect::to("/blog")).into_response()
}

/// The user named `name`, if the password matches their stored token.
pub fn authenticate(store: &dyn Store, name: &str, password: &str) -> anyhow::Result<Option<User>> {
    Ok(store
        .user_by_name(name)?
        .filter(|user| verify_password(name, password, &user.pw_hash)))
}
