use super::ports::{InsertOutcome, VoteStore};
use crate::domain::{CaptionVote, Viewer, VoteDirection, VoteKey};
use humor_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Keeps exactly one vote row per (user, caption).
///
/// A vote is first inserted; if the store reports the row already exists the
/// existing row is updated in place, so the original creation time survives
/// a change of direction. The fallback runs once and is not retried.
#[derive(Clone)]
pub struct VoteRecorder {
    store: Arc<dyn VoteStore>,
}

impl VoteRecorder {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        viewer: Option<&Viewer>,
        caption_id: Option<&str>,
        direction: Option<i64>,
    ) -> Result<VoteDirection, AppError> {
        let viewer = require_viewer(viewer)?;
        let caption_id = parse_caption_id(caption_id)?;
        let direction = direction
            .ok_or_else(|| AppError::InvalidArgument("missing direction".to_string()))
            .and_then(VoteDirection::try_from)?;

        let key = VoteKey::new(viewer.id, caption_id);
        let now = chrono::Utc::now();

        let outcome = self
            .store
            .insert_vote(&CaptionVote::new(key, direction, now))
            .await
            .map_err(|e| {
                tracing::error!(user_id = %key.user_id, caption_id = %key.caption_id, "Error saving vote: {}", e);
                AppError::from(e)
            })?;

        match outcome {
            InsertOutcome::Inserted(vote) => {
                tracing::debug!(user_id = %key.user_id, caption_id = %key.caption_id, "Vote created");
                Ok(vote.direction)
            }
            InsertOutcome::Conflict => {
                let vote = self.store.update_vote(key, direction, now).await.map_err(|e| {
                    tracing::error!(user_id = %key.user_id, caption_id = %key.caption_id, "Error updating vote: {}", e);
                    AppError::from(e)
                })?;
                tracing::debug!(user_id = %key.user_id, caption_id = %key.caption_id, "Vote updated");
                Ok(vote.direction)
            }
        }
    }

    pub async fn retract(&self, viewer: Option<&Viewer>, caption_id: Option<&str>) -> Result<(), AppError> {
        let viewer = require_viewer(viewer)?;
        let caption_id = parse_caption_id(caption_id)?;
        let key = VoteKey::new(viewer.id, caption_id);

        self.store.delete_vote(key).await.map_err(|e| {
            tracing::error!(user_id = %key.user_id, caption_id = %key.caption_id, "Error deleting vote: {}", e);
            AppError::from(e)
        })
    }
}

fn require_viewer(viewer: Option<&Viewer>) -> Result<&Viewer, AppError> {
    viewer.ok_or_else(|| AppError::Unauthenticated("no verified user".to_string()))
}

fn parse_caption_id(raw: Option<&str>) -> Result<Uuid, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("missing caption id".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidArgument(format!("malformed caption id: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, VoteRecorder, Viewer, String) {
        let store = Arc::new(MemoryStore::new());
        let recorder = VoteRecorder::new(store.clone());
        let viewer = Viewer::new(Uuid::from_u128(1), Some("voter@example.com".to_string()));
        let caption = Uuid::from_u128(0xc).to_string();
        (store, recorder, viewer, caption)
    }

    #[tokio::test]
    async fn test_repeat_vote_keeps_single_row_and_created_time() {
        let (store, recorder, viewer, caption) = setup();
        let key = VoteKey::new(viewer.id, Uuid::from_u128(0xc));

        let first = recorder.record(Some(&viewer), Some(&caption), Some(1)).await.unwrap();
        assert_eq!(first, VoteDirection::Up);
        let before = store.vote(key).unwrap();

        let second = recorder.record(Some(&viewer), Some(&caption), Some(1)).await.unwrap();
        assert_eq!(second, VoteDirection::Up);
        let after = store.vote(key).unwrap();

        assert_eq!(store.vote_count(), 1);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.modified_at >= before.modified_at);
    }

    #[tokio::test]
    async fn test_flip_updates_existing_row() {
        let (store, recorder, viewer, caption) = setup();
        let key = VoteKey::new(viewer.id, Uuid::from_u128(0xc));

        recorder.record(Some(&viewer), Some(&caption), Some(1)).await.unwrap();
        let created = store.vote(key).unwrap().created_at;

        let flipped = recorder.record(Some(&viewer), Some(&caption), Some(-1)).await.unwrap();
        assert_eq!(flipped, VoteDirection::Down);

        let row = store.vote(key).unwrap();
        assert_eq!(store.vote_count(), 1);
        assert_eq!(row.direction, VoteDirection::Down);
        assert_eq!(row.created_at, created);
    }

    #[tokio::test]
    async fn test_invalid_direction_writes_nothing() {
        let (store, recorder, viewer, caption) = setup();
        for bad in [Some(0), Some(2), None] {
            let err = recorder.record(Some(&viewer), Some(&caption), bad).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_caption() {
        let (store, recorder, viewer, _) = setup();
        for bad in [None, Some(""), Some("  "), Some("not-a-uuid")] {
            let err = recorder.record(Some(&viewer), bad, Some(1)).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_is_rejected() {
        let (store, recorder, _, caption) = setup();
        let err = recorder.record(None, Some(&caption), Some(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
        let err = recorder.retract(None, Some(&caption)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_retract_is_idempotent() {
        let (store, recorder, viewer, caption) = setup();
        recorder.retract(Some(&viewer), Some(&caption)).await.unwrap();
        assert_eq!(store.vote_count(), 0);

        recorder.record(Some(&viewer), Some(&caption), Some(-1)).await.unwrap();
        recorder.retract(Some(&viewer), Some(&caption)).await.unwrap();
        recorder.retract(Some(&viewer), Some(&caption)).await.unwrap();
        assert_eq!(store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_votes_are_scoped_per_user() {
        let (store, recorder, viewer, caption) = setup();
        let other = Viewer::new(Uuid::from_u128(2), None);

        recorder.record(Some(&viewer), Some(&caption), Some(1)).await.unwrap();
        recorder.record(Some(&other), Some(&caption), Some(-1)).await.unwrap();
        recorder.retract(Some(&other), Some(&caption)).await.unwrap();

        assert_eq!(store.vote_count(), 1);
        let kept = store.vote(VoteKey::new(viewer.id, Uuid::from_u128(0xc))).unwrap();
        assert_eq!(kept.direction, VoteDirection::Up);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_race_to_one_row() {
        let (store, recorder, viewer, caption) = setup();

        let mut handles = Vec::new();
        for i in 0..16 {
            let recorder = recorder.clone();
            let viewer = viewer.clone();
            let caption = caption.clone();
            let direction = if i % 2 == 0 { 1 } else { -1 };
            handles.push(tokio::spawn(async move {
                recorder.record(Some(&viewer), Some(&caption), Some(direction)).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(store.vote_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let (store, recorder, viewer, caption) = setup();
        store.fail_with(Some(crate::application::StoreError::Other("disk full".to_string())));

        let err = recorder.record(Some(&viewer), Some(&caption), Some(1)).await.unwrap_err();
        assert_eq!(err, AppError::StoreUnavailable("disk full".to_string()));

        store.fail_with(Some(crate::application::StoreError::Timeout("slow".to_string())));
        let err = recorder.retract(Some(&viewer), Some(&caption)).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
