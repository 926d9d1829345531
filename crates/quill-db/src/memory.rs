//! In-memory store with the same ordering and cascade rules as `Database`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use quill_types::models::{Comment, Post, User};

use crate::repo::{CommentRepo, NewComment, NewPost, NewUser, PostRepo, UserRepo};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|e| anyhow!("Store lock poisoned: {}", e))
    }
}

impl UserRepo for MemoryStore {
    fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    fn user_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.lock()?.users.values().find(|u| u.name == name).cloned())
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.name == user.name) {
            bail!("user name '{}' already taken", user.name);
        }
        let id = tables.allocate_id();
        let user = User {
            id,
            name: user.name,
            pw_hash: user.pw_hash,
            email: user.email,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }
}

impl PostRepo for MemoryStore {
    fn post_by_id(&self, id: i64) -> Result<Option<Post>> {
        Ok(self.lock()?.posts.get(&id).cloned())
    }

    fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.lock()?.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.lock()?;
        let id = tables.allocate_id();
        let now = Utc::now();
        let post = Post {
            id,
            subject: post.subject,
            content: post.content,
            author: post.author,
            created: now,
            last_modified: now,
            likes: BTreeSet::new(),
        };
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    fn update_post(&self, id: i64, subject: &str, content: &str) -> Result<bool> {
        let mut tables = self.lock()?;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(false);
        };
        post.subject = subject.to_string();
        post.content = content.to_string();
        post.last_modified = Utc::now();
        Ok(true)
    }

    fn delete_post(&self, id: i64) -> Result<bool> {
        let mut tables = self.lock()?;
        let removed = tables.posts.remove(&id).is_some();
        if removed {
            tables.comments.retain(|_, c| c.post_id != id);
        }
        Ok(removed)
    }

    fn toggle_like(&self, post_id: i64, name: &str) -> Result<bool> {
        let mut tables = self.lock()?;
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| anyhow!("post {} not found", post_id))?;
        if post.likes.remove(name) {
            Ok(false)
        } else {
            post.likes.insert(name.to_string());
            Ok(true)
        }
    }
}

impl CommentRepo for MemoryStore {
    fn comment_by_id(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.lock()?.comments.get(&id).cloned())
    }

    fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .lock()?
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.lock()?;
        if !tables.posts.contains_key(&comment.post_id) {
            bail!("post {} not found", comment.post_id);
        }
        let id = tables.allocate_id();
        let comment = Comment {
            id,
            post_id: comment.post_id,
            content: comment.content,
            author: comment.author,
            created: Utc::now(),
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    fn update_comment(&self, id: i64, content: &str) -> Result<bool> {
        let mut tables = self.lock()?;
        let Some(comment) = tables.comments.get_mut(&id) else {
            return Ok(false);
        };
        comment.content = content.to_string();
        Ok(true)
    }

    fn delete_comment(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.comments.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_post_drops_comments() {
        let store = MemoryStore::new();
        let post = store
            .create_post(NewPost {
                subject: "s".into(),
                content: "c".into(),
                author: "alice".into(),
            })
            .unwrap();
        let comment = store
            .create_comment(NewComment {
                post_id: post.id,
                content: "hi".into(),
                author: "bob".into(),
            })
            .unwrap();

        assert!(store.delete_post(post.id).unwrap());
        assert_eq!(store.comment_by_id(comment.id).unwrap(), None);
    }

    #[test]
    fn toggle_like_on_missing_post_errors() {
        let store = MemoryStore::new();
        assert!(store.toggle_like(1, "bob").is_err());
    }

    #[test]
    fn names_are_unique() {
        let store = MemoryStore::new();
        let new = NewUser {
            name: "alice".into(),
            pw_hash: "a,b".into(),
            email: None,
        };
        store.create_user(new.clone()).unwrap();
        assert!(store.create_user(new).is_err());
    }
}
