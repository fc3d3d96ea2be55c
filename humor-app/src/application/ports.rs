//! Seams to the hosted database and the identity provider.

use crate::domain::{Caption, CaptionVote, Category, Image, PageWindow, Viewer, VoteDirection, VoteKey};
use async_trait::async_trait;
use humor_errors::AppError;
use std::collections::HashSet;
use uuid::Uuid;

/// Failures of a store call. A uniqueness conflict on insert is not one of
/// them; see [`InsertOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store call timed out: {0}")]
    Timeout(String),

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("store error: {0}")]
    Other(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout(msg) => AppError::Timeout(msg),
            StoreError::Unreachable(msg) => AppError::Unreachable(msg),
            StoreError::Other(msg) => AppError::StoreUnavailable(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(CaptionVote),
    /// A row for the same (user, caption) already exists.
    Conflict,
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn insert_vote(&self, vote: &CaptionVote) -> Result<InsertOutcome, StoreError>;

    /// Sets direction and modified time on an existing row. The created
    /// time is left alone.
    async fn update_vote(
        &self,
        key: VoteKey,
        direction: VoteDirection,
        modified_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<CaptionVote, StoreError>;

    /// Deleting a missing row is not an error.
    async fn delete_vote(&self, key: VoteKey) -> Result<(), StoreError>;

    async fn voted_caption_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Captions whose content is not null, in natural fetch order.
    async fn captions_with_content(&self) -> Result<Vec<Caption>, StoreError>;

    async fn images_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Image>, StoreError>;

    async fn count_images(&self, category: Option<Uuid>) -> Result<u64, StoreError>;

    /// One page of images, newest first.
    async fn images_page(&self, category: Option<Uuid>, window: PageWindow) -> Result<Vec<Image>, StoreError>;

    async fn captions_for_images(&self, image_ids: &[Uuid]) -> Result<Vec<Caption>, StoreError>;

    async fn categories(&self) -> Result<Vec<Category>, StoreError>;
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolves a bearer token to a user. Fails with `Unauthenticated`,
    /// `Timeout` or `Unreachable`.
    async fn verify(&self, token: &str) -> Result<Viewer, AppError>;
}
