use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS blogs (
            id          INTEGER PRIMARY KEY,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            excerpt     TEXT NOT NULL,
            author      TEXT NOT NULL,
            tags        TEXT NOT NULL,
            cover_image TEXT NOT NULL DEFAULT '',
            slug        TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'published',
            views       INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_blogs_slug ON blogs(slug);
        CREATE INDEX IF NOT EXISTS idx_blogs_status ON blogs(status);
        ",
    )
}

// ── Posts ──

/// A parsed post, ready to insert. Has no row id until stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    pub author: String,
    pub tags: String,
    pub cover_image: String,
    pub status: String,
}

pub fn slug_exists(conn: &Connection, slug: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM blogs WHERE slug = ?1 LIMIT 1", [slug], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_post(conn: &Connection, post: &PostRow) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO blogs (title, content, excerpt, author, tags, cover_image, slug, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            post.title, post.content, post.excerpt, post.author, post.tags,
            post.cover_image, post.slug, post.status,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Remove every post in one transaction. Returns the number of rows deleted.
pub fn delete_all_posts(conn: &Connection) -> rusqlite::Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute("DELETE FROM blogs", [])?;
    tx.commit()?;
    Ok(deleted)
}

pub fn count_posts(conn: &Connection) -> rusqlite::Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM blogs", [], |r| r.get(0))
}

pub fn fetch_post(conn: &Connection, slug: &str) -> rusqlite::Result<Option<PostRow>> {
    conn.query_row(
        "SELECT title, content, excerpt, slug, author, tags, cover_image, status
         FROM blogs WHERE slug = ?1",
        [slug],
        |row| {
            Ok(PostRow {
                title: row.get(0)?,
                content: row.get(1)?,
                excerpt: row.get(2)?,
                slug: row.get(3)?,
                author: row.get(4)?,
                tags: row.get(5)?,
                cover_image: row.get(6)?,
                status: row.get(7)?,
            })
        },
    )
    .optional()
}

// ── Overview ──

pub struct OverviewRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub status: String,
    pub created_at: String,
}

pub fn fetch_overview(conn: &Connection, limit: usize) -> rusqlite::Result<Vec<OverviewRow>> {
    let sql = format!(
        "SELECT id, slug, title, status, created_at
         FROM blogs
         ORDER BY created_at DESC, id DESC
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OverviewRow {
                id: row.get(0)?,
                slug: row.get(1)?,
                title: row.get(2)?,
                status: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub by_status: Vec<(String, usize)>,
}

pub fn get_stats(conn: &Connection) -> rusqlite::Result<Stats> {
    let total = count_posts(conn)?;
    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM blogs GROUP BY status ORDER BY status")?;
    let by_status = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stats { total, by_status })
}

#[cfg(test)]
pub(crate) fn memory() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[cfg(test)]
pub(crate) fn sample_post(slug: &str) -> PostRow {
    PostRow {
        title: format!("Post {}", slug),
        content: format!("# Post {}\nbody", slug),
        excerpt: "body".into(),
        slug: slug.to_string(),
        author: "admin".into(),
        tags: "rust".into(),
        cover_image: String::new(),
        status: "published".into(),
    }
}
