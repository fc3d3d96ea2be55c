use super::ports::CatalogStore;
use crate::domain::{Category, GalleryPage, PageNumber};
use humor_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_GALLERY_PAGE_SIZE: u64 = 12;

/// Paged, optionally category-scoped browsing of every image.
#[derive(Clone)]
pub struct Gallery {
    catalog: Arc<dyn CatalogStore>,
    page_size: u64,
}

impl Gallery {
    pub fn new(catalog: Arc<dyn CatalogStore>, page_size: u64) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
        }
    }

    pub async fn page(&self, page: PageNumber, category: Option<Uuid>) -> Result<GalleryPage, AppError> {
        let window = page.window(self.page_size);

        let total = self.catalog.count_images(category).await.map_err(|e| {
            tracing::error!(?category, "Error counting images: {}", e);
            AppError::from(e)
        })?;

        let images = self.catalog.images_page(category, window).await.map_err(|e| {
            tracing::error!(page = page.get(), ?category, "Error loading images: {}", e);
            AppError::from(e)
        })?;

        if images.is_empty() {
            return Ok(GalleryPage::assemble(images, Vec::new(), page, window, total, category));
        }

        let ids: Vec<Uuid> = images.iter().map(|i| i.id).collect();
        let captions = self.catalog.captions_for_images(&ids).await.map_err(|e| {
            tracing::error!(page = page.get(), "Error loading captions: {}", e);
            AppError::from(e)
        })?;

        Ok(GalleryPage::assemble(images, captions, page, window, total, category))
    }

    pub async fn categories(&self) -> Result<Vec<Category>, AppError> {
        self.catalog.categories().await.map_err(|e| {
            tracing::error!("Error loading categories: {}", e);
            AppError::from(e)
        })
    }
}
