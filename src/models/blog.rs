//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// Blog post as listed by `GET /admin/api/blogs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Backend-assigned identifier
    #[serde(deserialize_with = "de::identifier")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Creation timestamp
    #[serde(rename = "date", alias = "created_at", deserialize_with = "de::timestamp")]
    pub created_at: DateTime<Utc>,
}
