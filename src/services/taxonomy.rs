use crate::models::{Category, Tag};
use crate::services::slug::slugify;
use crate::Database;
use anyhow::{bail, Result};
use rusqlite::Connection;

fn resolve_slug(name: &str, slug: Option<&str>) -> Result<String> {
    let slug = slug.map(String::from).unwrap_or_else(|| slugify(name));
    if slug.is_empty() {
        bail!("Could not derive a slug from '{}'; provide one explicitly", name);
    }
    Ok(slug)
}

pub(crate) fn row_to_tag(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        slug: row.get(offset + 2)?,
        created_at: row.get(offset + 3)?,
    })
}

pub(crate) fn row_to_category(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        slug: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        created_at: row.get(offset + 4)?,
    })
}

pub(crate) fn tags_for_post(conn: &Connection, post_id: i64) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.created_at FROM tags t JOIN post_tags pt ON t.id = pt.tag_id WHERE pt.post_id = ? ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map([post_id], |row| row_to_tag(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn create_category(
    db: &Database,
    name: &str,
    slug: Option<&str>,
    description: Option<&str>,
) -> Result<i64> {
    let slug = resolve_slug(name, slug)?;
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO categories (name, slug, description) VALUES (?, ?, ?)",
        (name, &slug, description),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_categories(db: &Database) -> Result<Vec<Category>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, name, slug, description, created_at FROM categories ORDER BY name",
    )?;
    let categories = stmt
        .query_map([], |row| row_to_category(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn create_tag(db: &Database, name: &str, slug: Option<&str>) -> Result<i64> {
    let slug = resolve_slug(name, slug)?;
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO tags (name, slug) VALUES (?, ?)",
        (name, &slug),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_tag_by_slug(db: &Database, slug: &str) -> Result<Option<Tag>> {
    let conn = db.get()?;
    let tag = conn.query_row(
        "SELECT id, name, slug, created_at FROM tags WHERE slug = ?",
        [slug],
        |row| row_to_tag(row, 0),
    );
    match tag {
        Ok(tag) => Ok(Some(tag)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_tags(db: &Database) -> Result<Vec<Tag>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, name, slug, created_at FROM tags ORDER BY name")?;
    let tags = stmt
        .query_map([], |row| row_to_tag(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}
