use super::ports::{CatalogStore, VoteStore};
use crate::domain::{build_feed, Feed, FeedPage, PageNumber, Viewer};
use humor_errors::AppError;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// One card of the swipe-to-vote flow.
pub const VOTING_PAGE_SIZE: usize = 1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingPage {
    #[serde(flatten)]
    pub page: FeedPage,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub undo_caption_id: Option<Uuid>,
    pub authenticated: bool,
}

#[derive(Clone)]
pub struct VotingFeed {
    catalog: Arc<dyn CatalogStore>,
    votes: Arc<dyn VoteStore>,
}

impl VotingFeed {
    pub fn new(catalog: Arc<dyn CatalogStore>, votes: Arc<dyn VoteStore>) -> Self {
        Self { catalog, votes }
    }

    /// Feed of images the viewer has not voted on yet. Anonymous viewers get
    /// every votable image.
    pub async fn build(&self, viewer: Option<&Viewer>) -> Result<Feed, AppError> {
        let captions = self.catalog.captions_with_content().await.map_err(|e| {
            tracing::error!("Error loading captions: {}", e);
            AppError::from(e)
        })?;

        let votable: HashSet<Uuid> = captions
            .iter()
            .filter(|c| c.is_valid())
            .map(|c| c.image_id)
            .collect();
        if votable.is_empty() {
            return Ok(Feed::default());
        }

        let ids: Vec<Uuid> = votable.into_iter().collect();
        let images = self.catalog.images_by_ids(&ids).await.map_err(|e| {
            tracing::error!(images = ids.len(), "Error loading images: {}", e);
            AppError::from(e)
        })?;

        let voted = match viewer {
            Some(viewer) => Some(self.votes.voted_caption_ids(viewer.id).await.map_err(|e| {
                tracing::error!(user_id = %viewer.id, "Error loading votes: {}", e);
                AppError::from(e)
            })?),
            None => None,
        };

        Ok(build_feed(captions, images, voted.as_ref()))
    }

    pub async fn page(&self, viewer: Option<&Viewer>, page: PageNumber) -> Result<VotingPage, AppError> {
        let feed = self.build(viewer).await?;
        let resolved = feed.resolve_page(page, VOTING_PAGE_SIZE);
        tracing::debug!(
            page = resolved.page,
            total = resolved.total,
            authenticated = viewer.is_some(),
            "Resolved voting page"
        );

        Ok(VotingPage {
            next_page: resolved.next_page(),
            prev_page: resolved.prev_page(),
            undo_caption_id: resolved.undo_caption_id(viewer),
            authenticated: viewer.is_some(),
            page: resolved,
        })
    }
}
