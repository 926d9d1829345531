//! Repository traits
//!
//! The handlers only ever see these; `Database` and `MemoryStore` both
//! implement all three.

use anyhow::Result;
use quill_types::models::{Comment, Post, User};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub pw_hash: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub subject: String,
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub content: String,
    pub author: String,
}

pub trait UserRepo: Send + Sync {
    fn user_by_id(&self, id: i64) -> Result<Option<User>>;

    fn user_by_name(&self, name: &str) -> Result<Option<User>>;

    fn create_user(&self, user: NewUser) -> Result<User>;
}

pub trait PostRepo: Send + Sync {
    fn post_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Newest first.
    fn list_posts(&self) -> Result<Vec<Post>>;

    fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Replaces subject and content and bumps `last_modified`.
    /// Returns false when the post does not exist.
    fn update_post(&self, id: i64, subject: &str, content: &str) -> Result<bool>;

    /// Removes the post together with its likes and comments.
    fn delete_post(&self, id: i64) -> Result<bool>;

    /// Flip `name` in the post's like set. Returns true if the name was added.
    fn toggle_like(&self, post_id: i64, name: &str) -> Result<bool>;
}

pub trait CommentRepo: Send + Sync {
    fn comment_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Oldest first.
    fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>>;

    fn create_comment(&self, comment: NewComment) -> Result<Comment>;

    fn update_comment(&self, id: i64, content: &str) -> Result<bool>;

    fn delete_comment(&self, id: i64) -> Result<bool>;
}

/// Everything the blog needs from persistence.
pub trait Store: UserRepo + PostRepo + CommentRepo {}

impl<T: UserRepo + PostRepo + CommentRepo> Store for T {}
