use crate::db::DbConn;
use crate::models::{Category, NewPost, SavedPost, Tag, UserSummary};
use crate::services::posts::{PostLookups, PostStore, SaveError};
use crate::services::taxonomy::{row_to_category, row_to_tag};
use crate::Database;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension, ToSql};

/// Storage handle for a single request. Holds one pooled connection, which
/// goes back to the pool when the store is dropped.
pub struct SqliteStore {
    conn: DbConn,
}

impl SqliteStore {
    pub fn new(db: &Database) -> Result<Self> {
        Ok(Self { conn: db.get()? })
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl PostLookups for SqliteStore {
    fn find_user(&self, id: i64) -> Result<Option<UserSummary>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, full_name FROM users WHERE id = ?",
                [id],
                |row| {
                    Ok(UserSummary {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        full_name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, slug, description, created_at FROM categories WHERE id = ?",
                [id],
                |row| row_to_category(row, 0),
            )
            .optional()?;
        Ok(category)
    }

    fn find_tags_by_id(&self, ids: &[i64]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name, slug, created_at FROM tags WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let tags = stmt
            .query_map(params.as_slice(), |row| row_to_tag(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn find_tags_by_slug(&self, slugs: &[String]) -> Result<Vec<Tag>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name, slug, created_at FROM tags WHERE slug IN ({}) ORDER BY id",
            placeholders(slugs.len())
        );
        let params: Vec<&dyn ToSql> = slugs.iter().map(|s| s as &dyn ToSql).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let tags = stmt
            .query_map(params.as_slice(), |row| row_to_tag(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn slug_exists(&self, slug: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE slug = ?)",
            [slug],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl PostStore for SqliteStore {
    fn save(&self, post: &NewPost) -> Result<SavedPost, SaveError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(anyhow::Error::from)?;
        let now = Utc::now();

        let inserted = tx.execute(
            r#"
            INSERT INTO posts (title, slug, excerpt, content, featured_image, author_id, category_id, status, published_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            (
                &post.title,
                &post.slug,
                &post.excerpt,
                &post.content,
                &post.featured_image,
                post.author_id,
                post.category_id,
                post.status.to_string(),
                post.published_at,
                now,
                now,
            ),
        );
        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                return Err(SaveError::SlugTaken(post.slug.clone()));
            }
            return Err(anyhow::Error::from(e).into());
        }

        let post_id = tx.last_insert_rowid();
        for tag_id in &post.tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)",
                (post_id, tag_id),
            )
            .map_err(anyhow::Error::from)?;
        }
        tx.commit().map_err(anyhow::Error::from)?;

        Ok(SavedPost {
            id: post_id,
            created_at: now,
            updated_at: now,
        })
    }
}
