use super::{Category, Tag, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const ALLOWED: [&'static str; 3] = ["archived", "draft", "published"];
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Caller-supplied input for a new post. Nothing in here has been checked yet.
///
/// `status` stays a raw string so an unknown value surfaces as a validation
/// failure naming the field instead of a body deserialization error. It may
/// be omitted but not sent as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostDraft {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub tag_ids: Option<Vec<i64>>,
    pub tag_slugs: Option<Vec<String>>,
}

fn non_null<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// Row about to be inserted into `posts`, plus its tag links.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedPost {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted post with its author, category and tags resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Option<UserSummary>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}
