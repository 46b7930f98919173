use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps are informational; anything that is not RFC 3339 becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(value = %text, error = %e, "Ignoring unparseable timestamp");
                None
            }
        },
        Some(other) => {
            tracing::debug!(value = %other, "Ignoring non-string timestamp");
            None
        }
    })
}

// ============================================================================
// Read Models
// ============================================================================

/// A category as returned by `GET /category`.
///
/// `children_categories` and `posts` are only present when the server
/// includes nested data. Either may be missing or `null`, which deserializes
/// as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_category_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children_categories: Vec<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posts: Vec<PostSummary>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Build a bare category with no children, posts or timestamps.
    pub fn new(id: i64, name: impl Into<String>, parent_category_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_category_id,
            children_categories: Vec::new(),
            posts: Vec::new(),
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Attach children, replacing any existing ones.
    pub fn with_children(mut self, children: Vec<Category>) -> Self {
        self.children_categories = children;
        self
    }
}

/// Flat category reference embedded in a post. Never carries children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_category_id: Option<i64>,
}

/// A post as returned by `GET /post`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryRef>,
}

/// Envelope for list endpoints: `{ data, totalItem }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_item: u64,
}

/// Body of a successful delete.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

// ============================================================================
// Write Payloads
// ============================================================================

/// Body for `POST /category` and `PUT /category/{id}`.
///
/// `parent_category_id` is always serialized, as `null` for a root category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub parent_category_id: Option<i64>,
}

/// Body for `POST /post` and `PUT /post/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub categories: Vec<i64>,
}
