use humor_errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thumbs up or down. Persisted and serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i16 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl From<VoteDirection> for i16 {
    fn from(direction: VoteDirection) -> Self {
        direction.value()
    }
}

impl TryFrom<i64> for VoteDirection {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(AppError::InvalidArgument(format!(
                "direction must be 1 or -1, got {other}"
            ))),
        }
    }
}

impl TryFrom<i16> for VoteDirection {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

/// Identity of a vote row: one per (user, caption).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteKey {
    pub user_id: Uuid,
    pub caption_id: Uuid,
}

impl VoteKey {
    pub fn new(user_id: Uuid, caption_id: Uuid) -> Self {
        Self { user_id, caption_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionVote {
    pub user_id: Uuid,
    pub caption_id: Uuid,
    pub direction: VoteDirection,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

impl CaptionVote {
    /// A fresh vote; both timestamps start at `now`.
    pub fn new(key: VoteKey, direction: VoteDirection, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            user_id: key.user_id,
            caption_id: key.caption_id,
            direction,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn key(&self) -> VoteKey {
        VoteKey::new(self.user_id, self.caption_id)
    }
}
