//! Who may touch what. Ownership is a name comparison against the
//! denormalized `author` field.

use quill_types::models::{Comment, Post, User};

use crate::error::BlogError;
use crate::session::Session;

pub fn require_login(session: &Session) -> Result<&User, BlogError> {
    session.user().ok_or(BlogError::NotLoggedIn)
}

/// Edit and delete rights on a post.
pub fn require_post_author<'a>(session: &'a Session, post: &Post) -> Result<&'a User, BlogError> {
    let user = require_login(session)?;
    if post.is_authored_by(&user.name) {
        Ok(user)
    } else {
        Err(BlogError::NotOwner)
    }
}

pub fn require_comment_author<'a>(
    session: &'a Session,
    comment: &Comment,
) -> Result<&'a User, BlogError> {
    let user = require_login(session)?;
    if comment.is_authored_by(&user.name) {
        Ok(user)
    } else {
        Err(BlogError::NotOwner)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LikeAction<'a> {
    /// Flip this name in the like set.
    Toggle(&'a str),
    /// Authors cannot like their own post; nothing changes.
    OwnPost,
}

pub fn like_action<'a>(session: &'a Session, post: &Post) -> Result<LikeAction<'a>, BlogError> {
    let user = require_login(session)?;
    if post.is_authored_by(&user.name) {
        Ok(LikeAction::OwnPost)
    } else {
        Ok(LikeAction::Toggle(&user.name))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    fn user(id: i64, name: &str) -> Session {
        Session::Authenticated(User {
            id,
            name: name.into(),
            pw_hash: "x,y".into(),
            email: None,
        })
    }

    fn post_by(author: &str) -> Post {
        Post {
            id: 1,
            subject: "s".into(),
            content: "c".into(),
            author: author.into(),
            created: Utc::now(),
            last_modified: Utc::now(),
            likes: BTreeSet::new(),
        }
    }

    fn comment_by(author: &str) -> Comment {
        Comment {
            id: 2,
            post_id: 1,
            content: "c".into(),
            author: author.into(),
            created: Utc::now(),
        }
    }

    #[test]
    fn only_author_modifies_post() {
        let post = post_by("alice");
        assert!(require_post_author(&user(1, "alice"), &post).is_ok());
        assert!(matches!(
            require_post_author(&user(2, "bob"), &post),
            Err(BlogError::NotOwner)
        ));
        assert!(matches!(
            require_post_author(&Session::Anonymous, &post),
            Err(BlogError::NotLoggedIn)
        ));
    }

    #[test]
    fn only_author_modifies_comment() {
        let comment = comment_by("bob");
        assert!(require_comment_author(&user(2, "bob"), &comment).is_ok());
        assert!(matches!(
            require_comment_author(&user(1, "alice"), &comment),
            Err(BlogError::NotOwner)
        ));
    }

    #[test]
    fn ownership_follows_the_name_not_the_id() {
        // A different account holding the same name owns the post.
        let post = post_by("alice");
        assert!(require_post_author(&user(99, "alice"), &post).is_ok());
    }

    #[test]
    fn likes_exclude_author() {
        let post = post_by("alice");
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        assert_eq!(like_action(&alice, &post).unwrap(), LikeAction::OwnPost);
        assert_eq!(like_action(&bob, &post).unwrap(), LikeAction::Toggle("bob"));
        assert!(like_action(&Session::Anonymous, &post).is_err());
    }
}
