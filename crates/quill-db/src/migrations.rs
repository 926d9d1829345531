use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace   TEXT NOT NULL,
                name        TEXT NOT NULL,
                pw_hash     TEXT NOT NULL,
                email       TEXT,
                UNIQUE(namespace, name)
            );

            CREATE TABLE posts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace       TEXT NOT NULL,
                subject         TEXT NOT NULL,
                content         TEXT NOT NULL,
                author          TEXT NOT NULL,
                created         TEXT NOT NULL,
                last_modified   TEXT NOT NULL
            );

            CREATE INDEX idx_posts_created ON posts(namespace, created);

            CREATE TABLE post_likes (
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                name        TEXT NOT NULL,
                PRIMARY KEY (post_id, name)
            );

            CREATE TABLE comments (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace   TEXT NOT NULL,
                post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                content     TEXT NOT NULL,
                author      TEXT NOT NULL,
                created     TEXT NOT NULL
            );

            CREATE INDEX idx_comments_post ON comments(post_id, created);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
