use rusqlite::{Connection, Row};
use scribe_crypto::CredentialHasher;

use crate::models::{CommentRow, PostRow, Stats, UserRow};
use crate::{Database, DbError};

impl Database {
    // -- Users --

    /// Fails with `DbError::Conflict` when the username or email is taken.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    /// Looks the user up by name and checks the password against the stored
    /// digest. Salted digests cannot be matched inside SQL, so the comparison
    /// happens here rather than in the WHERE clause.
    pub fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
        hasher: &dyn CredentialHasher,
    ) -> Result<Option<UserRow>, DbError> {
        let user = self.get_user_by_username(username)?;
        Ok(user.filter(|u| hasher.verify(password, &u.password_hash)))
    }

    // -- Posts --

    pub fn create_post(&self, title: &str, content: &str, author_id: i64) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (title, content, author_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![title, content, author_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first. Posts whose author row is missing are left out by the join.
    pub fn list_posts(&self) -> Result<Vec<PostRow>, DbError> {
        self.with_conn(query_posts)
    }

    // -- Comments --

    /// Inserts without checking that the post exists.
    pub fn create_comment(&self, post_id: i64, author_id: i64, content: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (post_id, author_id, content) VALUES (?1, ?2, ?3)",
                rusqlite::params![post_id, author_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Oldest first. An unknown post id yields an empty list, not an error.
    pub fn list_comments(&self, post_id: i64) -> Result<Vec<CommentRow>, DbError> {
        self.with_conn(|conn| query_comments(conn, post_id))
    }

    // -- Counts --

    pub fn count_users(&self) -> Result<i64, DbError> {
        self.with_conn(count_users)
    }

    pub fn count_posts(&self) -> Result<i64, DbError> {
        self.with_conn(count_posts)
    }

    pub fn count_comments(&self) -> Result<i64, DbError> {
        self.with_conn(count_comments)
    }

    /// All three counts read under a single lock acquisition.
    pub fn count_all(&self) -> Result<Stats, DbError> {
        self.with_conn(|conn| {
            Ok(Stats {
                users: count_users(conn)?,
                posts: count_posts(conn)?,
                comments: count_comments(conn)?,
            })
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_posts(conn: &Connection) -> Result<Vec<PostRow>, DbError> {
    // Ties on created_at fall back to id so the order is total.
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.content, p.author_id, p.created_at, u.username
         FROM posts p
         JOIN users u ON p.author_id = u.id
         ORDER BY p.created_at DESC, p.id DESC",
    )?;

    let rows = stmt
        .query_map([], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        created_at: row.get(4)?,
        author_name: row.get(5)?,
    })
}

fn query_comments(conn: &Connection, post_id: i64) -> Result<Vec<CommentRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.post_id, c.author_id, c.content, c.created_at, u.username
         FROM comments c
         JOIN users u ON c.author_id = u.id
         WHERE c.post_id = ?1
         ORDER BY c.created_at ASC, c.id ASC",
    )?;

    let rows = stmt
        .query_map([post_id], |row| {
            Ok(CommentRow {
                id: row.get(0)?,
                post_id: row.get(1)?,
                author_id: row.get(2)?,
                content: row.get(3)?,
                created_at: row.get(4)?,
                author_name: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn count_users(conn: &Connection) -> Result<i64, DbError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
}

fn count_posts(conn: &Connection) -> Result<i64, DbError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?)
}

fn count_comments(conn: &Connection) -> Result<i64, DbError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DbError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, DbError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
