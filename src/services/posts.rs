use crate::models::{
    Category, NewPost, PostDraft, PostStatus, ResolvedPost, SavedPost, Tag, UserSummary,
};
use crate::services::slug::{ensure_unique_slug, slugify, MAX_SLUG_LENGTH};
use crate::services::taxonomy::{row_to_category, tags_for_post};
use crate::Database;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

const TITLE_LENGTH: (usize, usize) = (3, 200);
const SLUG_LENGTH: (usize, usize) = (3, MAX_SLUG_LENGTH);
const MAX_EXCERPT_LENGTH: usize = 1000;
const MAX_FEATURED_IMAGE_LENGTH: usize = 255;

/// Read-only lookups the post workflow needs from storage.
pub trait PostLookups {
    fn find_user(&self, id: i64) -> anyhow::Result<Option<UserSummary>>;
    fn find_category(&self, id: i64) -> anyhow::Result<Option<Category>>;
    fn find_tags_by_id(&self, ids: &[i64]) -> anyhow::Result<Vec<Tag>>;
    fn find_tags_by_slug(&self, slugs: &[String]) -> anyhow::Result<Vec<Tag>>;
    fn slug_exists(&self, slug: &str) -> anyhow::Result<bool>;
}

pub trait PostStore {
    /// Persists the post and its tag links atomically.
    fn save(&self, post: &NewPost) -> Result<SavedPost, SaveError>;
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("slug '{0}' is already taken")]
    SlugTaken(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Which kind of reference failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Category,
    TagIds,
    TagSlugs,
}

impl Reference {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Category => "category_id",
            Self::TagIds => "tag_ids",
            Self::TagSlugs => "tag_slugs",
        }
    }
}

/// References that did not resolve, kept in the type the caller sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Missing {
    Ids(Vec<i64>),
    Slugs(Vec<String>),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = match self {
            Self::Ids(ids) => ids.iter().map(i64::to_string).collect(),
            Self::Slugs(slugs) => slugs.clone(),
        };
        write!(f, "{}", items.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("{field} must be {min}-{max} characters long")]
    FieldLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{field} must not be empty when provided")]
    EmptyList { field: &'static str },
    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("could not generate slug from title; provide slug explicitly")]
    SlugGeneration,
    #[error("published_at can only be set when status is 'published' (status is '{status}')")]
    InconsistentState {
        published_at: DateTime<Utc>,
        status: PostStatus,
    },
    #[error("unknown {}: {missing}", .kind.field())]
    NotFound { kind: Reference, missing: Missing },
    #[error("user {0} no longer exists")]
    AuthorNotFound(i64),
    #[error("a post with slug '{0}' already exists")]
    SlugConflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PostError {
    /// Request body field the failure is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::FieldLength { field, .. }
            | Self::EmptyList { field }
            | Self::InvalidEnum { field, .. } => Some(field),
            Self::SlugGeneration | Self::SlugConflict(_) => Some("slug"),
            Self::InconsistentState { .. } => Some("published_at"),
            Self::NotFound { kind, .. } => Some(kind.field()),
            Self::AuthorNotFound(_) | Self::Internal(_) => None,
        }
    }
}

/// Everything the validator derived from a draft.
#[derive(Debug, Clone)]
pub struct ResolvedFields {
    pub slug: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

fn check_length(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), PostError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(PostError::FieldLength { field, min, max });
    }
    Ok(())
}

fn check_fields(draft: &PostDraft) -> Result<(), PostError> {
    check_length("title", &draft.title, TITLE_LENGTH)?;
    if let Some(slug) = &draft.slug {
        check_length("slug", slug, SLUG_LENGTH)?;
    }
    if let Some(excerpt) = &draft.excerpt {
        check_length("excerpt", excerpt, (0, MAX_EXCERPT_LENGTH))?;
    }
    if let Some(image) = &draft.featured_image {
        check_length("featured_image", image, (0, MAX_FEATURED_IMAGE_LENGTH))?;
    }
    if draft.tag_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
        return Err(PostError::EmptyList { field: "tag_ids" });
    }
    if draft.tag_slugs.as_ref().is_some_and(|slugs| slugs.is_empty()) {
        return Err(PostError::EmptyList { field: "tag_slugs" });
    }
    Ok(())
}

fn parse_status(raw: Option<&str>) -> Result<PostStatus, PostError> {
    match raw {
        None => Ok(PostStatus::Draft),
        Some(value) => value.parse().map_err(|_| PostError::InvalidEnum {
            field: "status",
            value: value.to_string(),
            allowed: &PostStatus::ALLOWED,
        }),
    }
}

fn resolve_tags<L: PostLookups + ?Sized>(
    draft: &PostDraft,
    lookups: &L,
) -> Result<Vec<Tag>, PostError> {
    // tag_ids wins when both lists are supplied; tag_slugs is then ignored.
    if let Some(ids) = &draft.tag_ids {
        let tags = lookups.find_tags_by_id(ids)?;
        let found: BTreeSet<i64> = tags.iter().map(|t| t.id).collect();
        let missing: BTreeSet<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            return Err(PostError::NotFound {
                kind: Reference::TagIds,
                missing: Missing::Ids(missing.into_iter().collect()),
            });
        }
        return Ok(tags);
    }

    if let Some(slugs) = &draft.tag_slugs {
        let tags = lookups.find_tags_by_slug(slugs)?;
        let found: BTreeSet<&str> = tags.iter().map(|t| t.slug.as_str()).collect();
        let missing: BTreeSet<&str> = slugs
            .iter()
            .map(String::as_str)
            .filter(|slug| !found.contains(slug))
            .collect();
        if !missing.is_empty() {
            return Err(PostError::NotFound {
                kind: Reference::TagSlugs,
                missing: Missing::Slugs(missing.into_iter().map(String::from).collect()),
            });
        }
        return Ok(tags);
    }

    Ok(Vec::new())
}

/// Checks a draft and resolves every reference it makes. Fails on the first
/// violated rule; missing tag or category references are reported together.
pub fn validate<L: PostLookups + ?Sized>(
    draft: &PostDraft,
    lookups: &L,
    now: DateTime<Utc>,
) -> Result<ResolvedFields, PostError> {
    check_fields(draft)?;
    let status = parse_status(draft.status.as_deref())?;

    let category = match draft.category_id {
        Some(id) => Some(lookups.find_category(id)?.ok_or_else(|| PostError::NotFound {
            kind: Reference::Category,
            missing: Missing::Ids(vec![id]),
        })?),
        None => None,
    };

    let candidate = match &draft.slug {
        Some(slug) => slug.clone(),
        None => slugify(&draft.title),
    };
    if candidate.is_empty() {
        return Err(PostError::SlugGeneration);
    }
    let slug = ensure_unique_slug(&candidate, |s| lookups.slug_exists(s))?;

    let published_at = match (status, draft.published_at) {
        (PostStatus::Published, None) => Some(now),
        (PostStatus::Published, Some(at)) => Some(at),
        (_, Some(at)) => {
            return Err(PostError::InconsistentState {
                published_at: at,
                status,
            })
        }
        (_, None) => None,
    };

    let tags = resolve_tags(draft, lookups)?;

    Ok(ResolvedFields {
        slug,
        status,
        published_at,
        category,
        tags,
    })
}

/// Validates a draft on behalf of `author_id` and persists it.
///
/// A slug taken between the uniqueness check and the insert comes back as
/// [`PostError::SlugConflict`]; the caller decides whether to resubmit.
pub fn create_post<L, S>(
    draft: PostDraft,
    author_id: i64,
    lookups: &L,
    store: &S,
) -> Result<ResolvedPost, PostError>
where
    L: PostLookups + ?Sized,
    S: PostStore + ?Sized,
{
    let author = lookups
        .find_user(author_id)?
        .ok_or(PostError::AuthorNotFound(author_id))?;

    let fields = validate(&draft, lookups, Utc::now())?;

    let new_post = NewPost {
        title: draft.title,
        slug: fields.slug,
        excerpt: draft.excerpt,
        content: draft.content,
        featured_image: draft.featured_image,
        author_id: author.id,
        category_id: fields.category.as_ref().map(|c| c.id),
        status: fields.status,
        published_at: fields.published_at,
        tag_ids: fields.tags.iter().map(|t| t.id).collect(),
    };

    let saved = match store.save(&new_post) {
        Ok(saved) => saved,
        Err(SaveError::SlugTaken(slug)) => {
            tracing::warn!("Slug '{}' was taken concurrently", slug);
            return Err(PostError::SlugConflict(slug));
        }
        Err(SaveError::Other(e)) => return Err(PostError::Internal(e)),
    };

    tracing::info!(
        post_id = saved.id,
        author_id = author.id,
        slug = %new_post.slug,
        "Post created"
    );

    Ok(ResolvedPost {
        id: saved.id,
        title: new_post.title,
        slug: new_post.slug,
        excerpt: new_post.excerpt,
        content: new_post.content,
        featured_image: new_post.featured_image,
        status: new_post.status,
        view_count: 0,
        published_at: new_post.published_at,
        created_at: saved.created_at,
        updated_at: saved.updated_at,
        author: Some(author),
        category: fields.category,
        tags: fields.tags,
    })
}

const POST_COLUMNS: &str = r#"
    p.id, p.title, p.slug, p.excerpt, p.content, p.featured_image, p.status,
    p.view_count, p.published_at, p.created_at, p.updated_at,
    u.id, u.username, u.full_name,
    c.id, c.name, c.slug, c.description, c.created_at
"#;

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<ResolvedPost> {
    let author = match row.get::<_, Option<i64>>(11)? {
        Some(id) => Some(UserSummary {
            id,
            username: row.get(12)?,
            full_name: row.get(13)?,
        }),
        None => None,
    };
    let category = match row.get::<_, Option<i64>>(14)? {
        Some(_) => Some(row_to_category(row, 14)?),
        None => None,
    };

    Ok(ResolvedPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        featured_image: row.get(5)?,
        status: row
            .get::<_, String>(6)?
            .parse()
            .unwrap_or(PostStatus::Draft),
        view_count: row.get(7)?,
        published_at: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        author,
        category,
        tags: Vec::new(),
    })
}

/// Published posts, newest first, optionally limited to one author.
pub fn list_published_posts(db: &Database, author: Option<&str>) -> anyhow::Result<Vec<ResolvedPost>> {
    let conn = db.get()?;
    let sql = format!(
        r#"
        SELECT {}
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE p.status = 'published' AND (?1 IS NULL OR u.username = ?1)
        ORDER BY p.published_at DESC, p.id DESC
        "#,
        POST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut posts = stmt
        .query_map([author], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;

    for post in &mut posts {
        post.tags = tags_for_post(&conn, post.id)?;
    }
    Ok(posts)
}

pub fn get_published_post(db: &Database, slug: &str) -> anyhow::Result<Option<ResolvedPost>> {
    let conn = db.get()?;
    let sql = format!(
        r#"
        SELECT {}
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE p.slug = ? AND p.status = 'published'
        "#,
        POST_COLUMNS
    );
    let post = conn.query_row(&sql, [slug], row_to_post);

    match post {
        Ok(mut post) => {
            post.tags = tags_for_post(&conn, post.id)?;
            Ok(Some(post))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
