//! Content models shared across the workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// VISIBILITY
// =============================================================================

/// Access tier of a content item.
///
/// Stored lowercase in the `content.visibility` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the owner can see it.
    Private,
    /// Privileged (AWS employee) callers.
    AwsOnly,
    /// Any authenticated community member.
    AwsCommunity,
    /// Everyone, including anonymous callers.
    Public,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::Private,
        Visibility::AwsOnly,
        Visibility::AwsCommunity,
        Visibility::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::AwsOnly => "aws_only",
            Visibility::AwsCommunity => "aws_community",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "aws_only" => Ok(Visibility::AwsOnly),
            "aws_community" => Ok(Visibility::AwsCommunity),
            "public" => Ok(Visibility::Public),
            other => Err(Error::Serialization(format!(
                "unknown visibility '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// CONTENT TYPE
// =============================================================================

/// Kind of aggregated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Blog,
    Video,
    Repository,
    Talk,
    Podcast,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Video => "video",
            ContentType::Repository => "repository",
            ContentType::Talk => "talk",
            ContentType::Podcast => "podcast",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(ContentType::Blog),
            "video" => Ok(ContentType::Video),
            "repository" => Ok(ContentType::Repository),
            "talk" => Ok(ContentType::Talk),
            "podcast" => Ok(ContentType::Podcast),
            other => Err(Error::Serialization(format!(
                "unknown content type '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// CONTENT RECORD
// =============================================================================

/// Summary of the user who owns a content item, present when the
/// `users` row was joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub username: String,
    pub email: Option<String>,
    pub is_aws_employee: bool,
}

/// An aggregated content item as read by search.
///
/// Search never mutates these rows; `rank` is computed per query and is
/// not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub visibility: Visibility,
    pub publish_date: Option<DateTime<Utc>>,
    pub capture_date: DateTime<Utc>,
    /// Engagement metrics (views, likes, stars, ...).
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_claimed: bool,
    pub original_author: Option<String>,
    /// First associated URL, if any.
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Relevance for the current query.
    pub rank: Option<f64>,
    pub author: Option<AuthorSummary>,
}

/// Extract the numeric entries of a JSON metrics object.
///
/// Non-numeric values are skipped; a non-object yields an empty map.
pub fn metrics_from_json(value: &serde_json::Value) -> BTreeMap<String, f64> {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}
