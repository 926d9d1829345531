use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use chrono::{DateTime, Utc};
use quill_types::models::{Comment, Post, User};
use rusqlite::{Connection, Row};

use crate::Database;
use crate::repo::{CommentRepo, NewComment, NewPost, NewUser, PostRepo, UserRepo};

const USER_COLUMNS: &str = "id, name, pw_hash, email";
const POST_COLUMNS: &str = "id, subject, content, author, created, last_modified";
const COMMENT_COLUMNS: &str = "id, post_id, content, author, created";

// -- Users --

impl UserRepo for Database {
    fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND namespace = ?2"),
                rusqlite::params![id, self.namespace()],
                user_from_row,
            )
            .optional()
        })
    }

    fn user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE name = ?1 AND namespace = ?2"),
                rusqlite::params![name, self.namespace()],
                user_from_row,
            )
            .optional()
        })
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (namespace, name, pw_hash, email) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![self.namespace(), user.name, user.pw_hash, user.email],
            )?;
            Ok(User {
                id: conn.last_insert_rowid(),
                name: user.name,
                pw_hash: user.pw_hash,
                email: user.email,
            })
        })
    }
}

// -- Posts --

impl PostRepo for Database {
    fn post_by_id(&self, id: i64) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let post = conn
                .query_row(
                    &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1 AND namespace = ?2"),
                    rusqlite::params![id, self.namespace()],
                    post_from_row,
                )
                .optional()?;

            let Some(mut post) = post else {
                return Ok(None);
            };
            post.likes = query_likes(conn, id)?;
            Ok(Some(post))
        })
    }

    fn list_posts(&self) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM posts WHERE namespace = ?1
                 ORDER BY created DESC, id DESC"
            ))?;
            let mut posts = stmt
                .query_map([self.namespace()], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            // One pass over the like table instead of a query per post
            let mut likes = query_all_likes(conn, self.namespace())?;
            for post in &mut posts {
                if let Some(names) = likes.remove(&post.id) {
                    post.likes = names;
                }
            }
            Ok(posts)
        })
    }

    fn create_post(&self, post: NewPost) -> Result<Post> {
        let now = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (namespace, subject, content, author, created, last_modified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                rusqlite::params![self.namespace(), post.subject, post.content, post.author, now],
            )?;
            Ok(Post {
                id: conn.last_insert_rowid(),
                subject: post.subject,
                content: post.content,
                author: post.author,
                created: now,
                last_modified: now,
                likes: BTreeSet::new(),
            })
        })
    }

    fn update_post(&self, id: i64, subject: &str, content: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE posts SET subject = ?1, content = ?2, last_modified = ?3
                 WHERE id = ?4 AND namespace = ?5",
                rusqlite::params![subject, content, Utc::now(), id, self.namespace()],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            // Likes and comments cascade
            let changed = conn.execute(
                "DELETE FROM posts WHERE id = ?1 AND namespace = ?2",
                rusqlite::params![id, self.namespace()],
            )?;
            Ok(changed > 0)
        })
    }

    /// Removes the like if it exists, inserts it if not.
    fn toggle_like(&self, post_id: i64, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM post_likes WHERE post_id = ?1 AND name = ?2",
                rusqlite::params![post_id, name],
            )?;
            if removed > 0 {
                return Ok(false);
            }

            conn.execute(
                "INSERT INTO post_likes (post_id, name) VALUES (?1, ?2)",
                rusqlite::params![post_id, name],
            )?;
            Ok(true)
        })
    }
}

// -- Comments --

impl CommentRepo for Database {
    fn comment_by_id(&self, id: i64) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1 AND namespace = ?2"),
                rusqlite::params![id, self.namespace()],
                comment_from_row,
            )
            .optional()
        })
    }

    fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 AND namespace = ?2
                 ORDER BY created ASC, id ASC"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![post_id, self.namespace()], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let now = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (namespace, post_id, content, author, created)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    self.namespace(),
                    comment.post_id,
                    comment.content,
                    comment.author,
                    now
                ],
            )?;
            Ok(Comment {
                id: conn.last_insert_rowid(),
                post_id: comment.post_id,
                content: comment.content,
                author: comment.author,
                created: now,
            })
        })
    }

    fn update_comment(&self, id: i64, content: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE comments SET content = ?1 WHERE id = ?2 AND namespace = ?3",
                rusqlite::params![content, id, self.namespace()],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM comments WHERE id = ?1 AND namespace = ?2",
                rusqlite::params![id, self.namespace()],
            )?;
            Ok(changed > 0)
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        pw_hash: row.get(2)?,
        email: row.get(3)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        subject: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        created: row.get::<_, DateTime<Utc>>(4)?,
        last_modified: row.get::<_, DateTime<Utc>>(5)?,
        likes: BTreeSet::new(),
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        created: row.get::<_, DateTime<Utc>>(4)?,
    })
}

fn query_likes(conn: &Connection, post_id: i64) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM post_likes WHERE post_id = ?1")?;
    let names = stmt
        .query_map([post_id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<BTreeSet<_>, _>>()?;
    Ok(names)
}

fn query_all_likes(conn: &Connection, namespace: &str) -> Result<HashMap<i64, BTreeSet<String>>> {
    let mut stmt = conn.prepare(
        "SELECT l.post_id, l.name FROM post_likes l
         JOIN posts p ON p.id = l.post_id
         WHERE p.namespace = ?1",
    )?;
    let mut map: HashMap<i64, BTreeSet<String>> = HashMap::new();
    let rows = stmt.query_map([namespace], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (post_id, name) = row?;
        map.entry(post_id).or_default().insert(name);
    }
    Ok(map)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn alice_post(db: &Database) -> Post {
        db.create_post(NewPost {
            subject: "Hello".into(),
            content: "World".into(),
            author: "alice".into(),
        })
        .unwrap()
    }

    #[test]
    fn users_by_id_and_name() {
        let db = db();
        let user = db
            .create_user(NewUser {
                name: "alice".into(),
                pw_hash: "salt,hash".into(),
                email: None,
            })
            .unwrap();

        assert_eq!(db.user_by_id(user.id).unwrap(), Some(user.clone()));
        assert_eq!(db.user_by_name("alice").unwrap(), Some(user));
        assert_eq!(db.user_by_name("bob").unwrap(), None);
        assert_eq!(db.user_by_id(999).unwrap(), None);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let db = db();
        let new = NewUser {
            name: "alice".into(),
            pw_hash: "x,y".into(),
            email: Some("a@b.cd".into()),
        };
        db.create_user(new.clone()).unwrap();
        assert!(db.create_user(new).is_err());
    }

    #[test]
    fn posts_crud_and_ordering() {
        let db = db();
        let first = alice_post(&db);
        let second = alice_post(&db);

        let listed: Vec<i64> = db.list_posts().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);

        assert!(db.update_post(first.id, "Edited", "Body").unwrap());
        let edited = db.post_by_id(first.id).unwrap().unwrap();
        assert_eq!(edited.subject, "Edited");
        assert_eq!(edited.created, first.created);
        assert!(edited.last_modified >= first.last_modified);

        assert!(db.delete_post(first.id).unwrap());
        assert!(!db.delete_post(first.id).unwrap());
        assert_eq!(db.post_by_id(first.id).unwrap(), None);
    }

    #[test]
    fn toggle_like_twice_restores() {
        let db = db();
        let post = alice_post(&db);

        assert!(db.toggle_like(post.id, "bob").unwrap());
        assert!(db.post_by_id(post.id).unwrap().unwrap().is_liked_by("bob"));
        assert_eq!(db.list_posts().unwrap()[0].likes.len(), 1);

        assert!(!db.toggle_like(post.id, "bob").unwrap());
        assert!(db.post_by_id(post.id).unwrap().unwrap().likes.is_empty());
    }

    #[test]
    fn comments_follow_their_post() {
        let db = db();
        let post = alice_post(&db);
        let c1 = db
            .create_comment(NewComment {
                post_id: post.id,
                content: "first".into(),
                author: "bob".into(),
            })
            .unwrap();
        let c2 = db
            .create_comment(NewComment {
                post_id: post.id,
                content: "second".into(),
                author: "carol".into(),
            })
            .unwrap();

        let ids: Vec<i64> = db.comments_for_post(post.id).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c1.id, c2.id]);

        assert!(db.update_comment(c1.id, "edited").unwrap());
        assert_eq!(db.comment_by_id(c1.id).unwrap().unwrap().content, "edited");

        db.toggle_like(post.id, "bob").unwrap();
        db.delete_post(post.id).unwrap();
        assert_eq!(db.comment_by_id(c2.id).unwrap(), None);
        assert!(db.comments_for_post(post.id).unwrap().is_empty());
    }
}
