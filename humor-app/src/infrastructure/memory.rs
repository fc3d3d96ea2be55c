//! Process-local store behind the same ports as Postgres. Backs tests and
//! local runs without `DATABASE_URL`.

use crate::application::{CatalogStore, InsertOutcome, StoreError, VoteStore};
use crate::domain::{sort_newest_first, Caption, CaptionVote, Category, Image, PageWindow, VoteDirection, VoteKey};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    images: RwLock<Vec<Image>>,
    captions: RwLock<Vec<Caption>>,
    categories: RwLock<Vec<Category>>,
    image_categories: DashSet<(Uuid, Uuid)>,
    votes: DashMap<VoteKey, CaptionVote>,
    failure: RwLock<Option<StoreError>>,
    image_lookups: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&self, image: Image) {
        self.images.write().unwrap_or_else(PoisonError::into_inner).push(image);
    }

    /// Captions are returned in insertion order.
    pub fn insert_caption(&self, caption: Caption) {
        self.captions.write().unwrap_or_else(PoisonError::into_inner).push(caption);
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.write().unwrap_or_else(PoisonError::into_inner).push(category);
    }

    pub fn assign_category(&self, image_id: Uuid, category_id: Uuid) {
        self.image_categories.insert((image_id, category_id));
    }

    pub fn vote(&self, key: VoteKey) -> Option<CaptionVote> {
        self.votes.get(&key).map(|v| v.clone())
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Makes every subsequent call fail with `failure` until cleared.
    pub fn fail_with(&self, failure: Option<StoreError>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = failure;
    }

    pub fn image_lookups(&self) -> u64 {
        self.image_lookups.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn in_category(&self, image_id: Uuid, category: Option<Uuid>) -> bool {
        category.map_or(true, |c| self.image_categories.contains(&(image_id, c)))
    }

    fn images_in(&self, category: Option<Uuid>) -> Vec<Image> {
        self.images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|image| self.in_category(image.id, category))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn insert_vote(&self, vote: &CaptionVote) -> Result<InsertOutcome, StoreError> {
        self.check()?;
        match self.votes.entry(vote.key()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(vote.clone());
                Ok(InsertOutcome::Inserted(vote.clone()))
            }
        }
    }

    async fn update_vote(
        &self,
        key: VoteKey,
        direction: VoteDirection,
        modified_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<CaptionVote, StoreError> {
        self.check()?;
        let mut row = self
            .votes
            .get_mut(&key)
            .ok_or_else(|| StoreError::Other(format!("no vote for caption {}", key.caption_id)))?;
        row.direction = direction;
        row.modified_at = modified_at;
        Ok(row.clone())
    }

    async fn delete_vote(&self, key: VoteKey) -> Result<(), StoreError> {
        self.check()?;
        self.votes.remove(&key);
        Ok(())
    }

    async fn voted_caption_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        self.check()?;
        Ok(self
            .votes
            .iter()
            .filter(|entry| entry.key().user_id == user_id)
            .map(|entry| entry.key().caption_id)
            .collect())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn captions_with_content(&self) -> Result<Vec<Caption>, StoreError> {
        self.check()?;
        Ok(self
            .captions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| c.content.is_some())
            .cloned()
            .collect())
    }

    async fn images_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Image>, StoreError> {
        self.check()?;
        self.image_lookups.fetch_add(1, Ordering::Relaxed);
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        let mut images: Vec<Image> = self
            .images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|image| wanted.contains(&image.id))
            .cloned()
            .collect();
        sort_newest_first(&mut images);
        Ok(images)
    }

    async fn count_images(&self, category: Option<Uuid>) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.images_in(category).len() as u64)
    }

    async fn images_page(&self, category: Option<Uuid>, window: PageWindow) -> Result<Vec<Image>, StoreError> {
        self.check()?;
        let mut images = self.images_in(category);
        sort_newest_first(&mut images);
        Ok(images
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.size).unwrap_or(usize::MAX))
            .collect())
    }

    async fn captions_for_images(&self, image_ids: &[Uuid]) -> Result<Vec<Caption>, StoreError> {
        self.check()?;
        let wanted: HashSet<&Uuid> = image_ids.iter().collect();
        Ok(self
            .captions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| wanted.contains(&c.image_id))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.check()?;
        let mut categories = self.categories.read().unwrap_or_else(PoisonError::into_inner).clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_insert_conflicts() {
        let store = MemoryStore::new();
        let key = VoteKey::new(Uuid::from_u128(1), Uuid::from_u128(2));
        let vote = CaptionVote::new(key, VoteDirection::Up, chrono::Utc::now());

        assert!(matches!(store.insert_vote(&vote).await.unwrap(), InsertOutcome::Inserted(_)));
        assert_eq!(store.insert_vote(&vote).await.unwrap(), InsertOutcome::Conflict);
        assert_eq!(store.vote_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_an_error() {
        let store = MemoryStore::new();
        let key = VoteKey::new(Uuid::from_u128(1), Uuid::from_u128(2));
        let err = store
            .update_vote(key, VoteDirection::Down, chrono::Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Other(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_not_fetched() {
        let store = MemoryStore::new();
        let image = Uuid::from_u128(9);
        store.insert_caption(Caption::new(Uuid::from_u128(1), image, None));
        store.insert_caption(Caption::new(Uuid::from_u128(2), image, Some(String::new())));
        let captions = store.captions_with_content().await.unwrap();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].id, Uuid::from_u128(2));
    }
}
