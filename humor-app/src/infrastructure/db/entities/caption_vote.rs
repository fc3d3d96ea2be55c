use crate::application::StoreError;
use crate::domain::VoteDirection;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per (profile, caption); `vote_value` is 1 or -1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "caption_votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub profile_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub caption_id: Uuid,
    pub vote_value: i16,
    pub created_datetime_utc: DateTimeUtc,
    pub modified_datetime_utc: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::caption::Entity",
        from = "Column::CaptionId",
        to = "super::caption::Column::Id",
        on_delete = "Cascade"
    )]
    Caption,
}

impl Related<super::caption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Caption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for crate::domain::CaptionVote {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let direction = VoteDirection::try_from(model.vote_value).map_err(|_| {
            StoreError::Other(format!(
                "caption_votes row for caption {} has vote_value {}",
                model.caption_id, model.vote_value
            ))
        })?;
        Ok(Self {
            user_id: model.profile_id,
            caption_id: model.caption_id,
            direction,
            created_at: model.created_datetime_utc,
            modified_at: model.modified_datetime_utc,
        })
    }
}
