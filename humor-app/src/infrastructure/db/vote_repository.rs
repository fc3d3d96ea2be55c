use super::entities::{caption_vote, CaptionVote};
use super::{bounded, store_error, with_deadline};
use crate::application::{InsertOutcome, StoreError, VoteStore};
use crate::domain::{self, VoteDirection, VoteKey};
use async_trait::async_trait;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, SqlErr};
use std::collections::HashSet;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    is_conflict(err.sql_err())
}

fn is_conflict(sql_err: Option<SqlErr>) -> bool {
    matches!(sql_err, Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl VoteStore for VoteRepository {
    async fn insert_vote(&self, vote: &domain::CaptionVote) -> Result<InsertOutcome, StoreError> {
        let active = caption_vote::ActiveModel {
            profile_id: Set(vote.user_id),
            caption_id: Set(vote.caption_id),
            vote_value: Set(vote.direction.value()),
            created_datetime_utc: Set(vote.created_at),
            modified_datetime_utc: Set(vote.modified_at),
        };

        match with_deadline(self.timeout, "insert vote", active.insert(&self.db)).await? {
            Ok(model) => Ok(InsertOutcome::Inserted(model.try_into()?)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn update_vote(
        &self,
        key: VoteKey,
        direction: VoteDirection,
        modified_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<domain::CaptionVote, StoreError> {
        let active = caption_vote::ActiveModel {
            profile_id: Unchanged(key.user_id),
            caption_id: Unchanged(key.caption_id),
            vote_value: Set(direction.value()),
            created_datetime_utc: NotSet,
            modified_datetime_utc: Set(modified_at),
        };

        bounded(self.timeout, "update vote", active.update(&self.db))
            .await?
            .try_into()
    }

    async fn delete_vote(&self, key: VoteKey) -> Result<(), StoreError> {
        let delete = CaptionVote::delete_many()
            .filter(caption_vote::Column::ProfileId.eq(key.user_id))
            .filter(caption_vote::Column::CaptionId.eq(key.caption_id))
            .exec(&self.db);
        bounded(self.timeout, "delete vote", delete).await?;
        Ok(())
    }

    async fn voted_caption_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        let select = CaptionVote::find()
            .select_only()
            .column(caption_vote::Column::CaptionId)
            .filter(caption_vote::Column::ProfileId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(&self.db);
        let ids = bounded(self.timeout, "select votes", select).await?;
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn key() -> VoteKey {
        VoteKey::new(Uuid::from_u128(1), Uuid::from_u128(2))
    }

    fn row(value: i16) -> caption_vote::Model {
        let at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        caption_vote::Model {
            profile_id: key().user_id,
            caption_id: key().caption_id,
            vote_value: value,
            created_datetime_utc: at,
            modified_datetime_utc: at,
        }
    }

    fn repository(db: MockDatabase) -> VoteRepository {
        VoteRepository::new(db.into_connection(), Duration::from_secs(1))
    }

    #[test]
    fn test_only_unique_violations_are_conflicts() {
        assert!(is_conflict(Some(SqlErr::UniqueConstraintViolation(
            "caption_votes_pkey".to_string()
        ))));
        assert!(!is_conflict(Some(SqlErr::ForeignKeyConstraintViolation(
            "caption_votes_caption_id_fkey".to_string()
        ))));
        assert!(!is_conflict(None));
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let repo = repository(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row(1)]]));
        let vote = domain::CaptionVote::new(key(), VoteDirection::Up, row(1).created_datetime_utc);

        match repo.insert_vote(&vote).await.unwrap() {
            InsertOutcome::Inserted(stored) => assert_eq!(stored, vote),
            InsertOutcome::Conflict => panic!("expected an inserted row"),
        }
    }

    #[tokio::test]
    async fn test_insert_failure_other_than_conflict_is_an_error() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("relation does not exist".to_string())]),
        );
        let vote = domain::CaptionVote::new(key(), VoteDirection::Down, row(-1).created_datetime_utc);

        let err = repo.insert_vote(&vote).await.unwrap_err();
        assert!(matches!(err, StoreError::Other(_)));
    }

    #[tokio::test]
    async fn test_update_rewrites_direction() {
        let repo = repository(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row(-1)]]));

        let updated = repo
            .update_vote(key(), VoteDirection::Down, row(-1).modified_datetime_utc)
            .await
            .unwrap();
        assert_eq!(updated.direction, VoteDirection::Down);
        assert_eq!(updated.key(), key());
    }
}
