use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Caption text used as a skip marker by the caption pipeline; never votable.
pub const PLACEHOLDER_CAPTION: &str = "next";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub id: Uuid,
    pub image_id: Uuid,
    pub content: Option<String>,
}

impl Caption {
    pub fn new(id: Uuid, image_id: Uuid, content: Option<String>) -> Self {
        Self { id, image_id, content }
    }

    /// Trimmed content when the caption can be shown and voted on.
    pub fn valid_content(&self) -> Option<&str> {
        let trimmed = self.content.as_deref()?.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER_CAPTION) {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid_content().is_some()
    }
}

/// First valid caption per image, in the order the captions were fetched.
/// Returned captions carry trimmed content.
pub fn representative_captions<I>(captions: I) -> HashMap<Uuid, Caption>
where
    I: IntoIterator<Item = Caption>,
{
    let mut by_image: HashMap<Uuid, Caption> = HashMap::new();
    for caption in captions {
        let Some(content) = caption.valid_content() else {
            continue;
        };
        if by_image.contains_key(&caption.image_id) {
            continue;
        }
        let trimmed = Caption::new(caption.id, caption.image_id, Some(content.to_string()));
        by_image.insert(caption.image_id, trimmed);
    }
    by_image
}
