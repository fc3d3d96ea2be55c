use super::caption::{representative_captions, Caption};
use super::image::{sort_newest_first, Image};
use super::pagination::PageNumber;
use super::viewer::Viewer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub image: Image,
    pub caption: Caption,
}

/// Images still awaiting a vote from one viewer, newest first, one
/// representative caption each. Any page can be resolved on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    items: Vec<FeedItem>,
}

/// Builds the voting feed.
///
/// `voted` holds the caption ids the viewer has already voted on; pass `None`
/// for anonymous viewers, who see the unfiltered feed.
pub fn build_feed(captions: Vec<Caption>, images: Vec<Image>, voted: Option<&HashSet<Uuid>>) -> Feed {
    let mut representatives = representative_captions(captions);

    let mut kept: Vec<Image> = images
        .into_iter()
        .filter(|image| image.has_url() && representatives.contains_key(&image.id))
        .collect();
    sort_newest_first(&mut kept);

    let items = kept
        .into_iter()
        .filter_map(|image| {
            let caption = representatives.remove(&image.id)?;
            Some(FeedItem { image, caption })
        })
        .filter(|item| !voted.is_some_and(|ids| ids.contains(&item.caption.id)))
        .collect();

    Feed { items }
}

impl Feed {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeedItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedItem> + '_ {
        self.items.iter()
    }

    /// Resolves a 1-indexed page. Pages past the end come back empty rather
    /// than clamped.
    pub fn resolve_page(&self, page: PageNumber, page_size: usize) -> FeedPage {
        let page_size = page_size.max(1);
        let total = self.items.len();
        let offset = (page.get() as usize).saturating_sub(1).saturating_mul(page_size);
        let has_prev = page.get() > 1;

        FeedPage {
            item: self.items.get(offset).cloned(),
            page: page.get(),
            page_size,
            total,
            total_pages: total.div_ceil(page_size).max(1),
            remaining: total.saturating_sub(page.get() as usize),
            has_next: offset.saturating_add(page_size) < total,
            has_prev,
            prev_item: if has_prev {
                offset
                    .checked_sub(page_size)
                    .and_then(|i| self.items.get(i))
                    .cloned()
            } else {
                None
            },
        }
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a FeedItem;
    type IntoIter = std::slice::Iter<'a, FeedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    /// `None` once every item has been voted on, or past the last page.
    pub item: Option<FeedItem>,
    pub page: u32,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub remaining: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub prev_item: Option<FeedItem>,
}

impl FeedPage {
    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev.then(|| self.page - 1)
    }

    /// Caption whose vote an undo on this page would retract.
    pub fn undo_caption_id(&self, viewer: Option<&Viewer>) -> Option<Uuid> {
        viewer
            .and(self.prev_item.as_ref())
            .map(|item| item.caption.id)
    }
}
