use super::bounded;
use super::entities::{caption, category, image, image_category, Caption, Category, Image};
use crate::application::{CatalogStore, StoreError};
use crate::domain::{self, PageWindow};
use async_trait::async_trait;
use sea_orm::sea_query::{NullOrdering, Order, Query};
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait, Select};
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl CatalogRepository {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    fn images_in(category: Option<Uuid>) -> Select<Image> {
        let query = Image::find();
        match category {
            Some(category_id) => query.filter(
                image::Column::Id.in_subquery(
                    Query::select()
                        .column(image_category::Column::ImageId)
                        .from(image_category::Entity)
                        .and_where(image_category::Column::CategoryId.eq(category_id))
                        .to_owned(),
                ),
            ),
            None => query,
        }
    }

    fn newest_first(query: Select<Image>) -> Select<Image> {
        query
            .order_by_with_nulls(image::Column::CreatedDatetimeUtc, Order::Desc, NullOrdering::First)
            .order_by_asc(image::Column::Id)
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn captions_with_content(&self) -> Result<Vec<domain::Caption>, StoreError> {
        let select = Caption::find()
            .filter(caption::Column::Content.is_not_null())
            .all(&self.db);
        let rows = bounded(self.timeout, "select captions", select).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn images_by_ids(&self, ids: &[Uuid]) -> Result<Vec<domain::Image>, StoreError> {
        let select = Self::newest_first(Image::find().filter(image::Column::Id.is_in(ids.iter().copied()))).all(&self.db);
        let rows = bounded(self.timeout, "select images", select).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_images(&self, category: Option<Uuid>) -> Result<u64, StoreError> {
        bounded(self.timeout, "count images", Self::images_in(category).count(&self.db)).await
    }

    async fn images_page(&self, category: Option<Uuid>, window: PageWindow) -> Result<Vec<domain::Image>, StoreError> {
        let select = Self::newest_first(Self::images_in(category))
            .offset(window.offset)
            .limit(window.size)
            .all(&self.db);
        let rows = bounded(self.timeout, "select image page", select).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn captions_for_images(&self, image_ids: &[Uuid]) -> Result<Vec<domain::Caption>, StoreError> {
        let select = Caption::find()
            .filter(caption::Column::ImageId.is_in(image_ids.iter().copied()))
            .all(&self.db);
        let rows = bounded(self.timeout, "select captions for images", select).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn categories(&self) -> Result<Vec<domain::Category>, StoreError> {
        let select = Category::find().order_by_asc(category::Column::Name).all(&self.db);
        let rows = bounded(self.timeout, "select categories", select).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
