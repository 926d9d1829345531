use regex::Regex;

use quill_types::forms::SignupForm;

pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").is_ok_and(|re| re.is_match(username))
}

pub fn valid_password(password: &str) -> bool {
    Regex::new(r"^.{3,20}$").is_ok_and(|re| re.is_match(password))
}

/// Email is optional: an empty value is valid.
pub fn valid_email(email: &str) -> bool {
    email.is_empty() || Regex::new(r"^[\S]+@[\S]+\.[\S]+$").is_ok_and(|re| re.is_match(email))
}

/// Per-field messages for the signup form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignupErrors {
    pub username: Option<&'static str>,
    pub password: Option<&'static str>,
    pub verify: Option<&'static str>,
    pub email: Option<&'static str>,
}

impl SignupErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.verify.is_none() && self.email.is_none()
    }
}

/// Format checks only; name availability is checked against the store afterwards.
pub fn check_signup(form: &SignupForm) -> SignupErrors {
    let mut errors = SignupErrors::default();

    if !valid_username(&form.username) {
        errors.username = Some("That's not a valid username.");
    }

    if !valid_password(&form.password) {
        errors.password = Some("That wasn't a valid password.");
    } else if form.password != form.verify {
        errors.verify = Some("Your passwords didn't match.");
    }

    if !valid_email(&form.email) {
        errors.email = Some("That's not a valid email.");
    }

    errors
}
