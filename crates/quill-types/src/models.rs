use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every entity lives under this namespace unless a store is opened with another.
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// `salt,hexdigest` or an argon2 PHC string.
    pub pw_hash: String,
    pub email: Option<String>,
}

/// Ownership is by author *name*, not by user id. Renaming a user would
/// silently hand their posts to whoever takes the old name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub subject: String,
    pub content: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub likes: BTreeSet<String>,
}

impl Post {
    pub fn is_authored_by(&self, name: &str) -> bool {
        self.author == name
    }

    pub fn is_liked_by(&self, name: &str) -> bool {
        self.likes.contains(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn is_authored_by(&self, name: &str) -> bool {
        self.author == name
    }
}
