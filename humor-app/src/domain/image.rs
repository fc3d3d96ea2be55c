use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: uuid::Uuid,
    pub url: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Image {
    pub fn new(id: uuid::Uuid, url: String, created_at: Option<chrono::DateTime<chrono::Utc>>) -> Self {
        Self { id, url, created_at }
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Newest first. Undated images lead, the way a descending Postgres sort
/// places nulls; equal timestamps fall back to id.
pub fn sort_newest_first(images: &mut [Image]) {
    images.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.id.cmp(&b.id),
    });
}
