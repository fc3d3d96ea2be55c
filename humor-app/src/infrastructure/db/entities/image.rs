use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub created_datetime_utc: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::caption::Entity")]
    Captions,
    #[sea_orm(has_many = "super::image_category::Entity")]
    ImageCategories,
}

impl Related<super::caption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Captions.def()
    }
}

impl Related<super::image_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImageCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Image {
    fn from(model: Model) -> Self {
        crate::domain::Image::new(model.id, model.url, model.created_datetime_utc)
    }
}
