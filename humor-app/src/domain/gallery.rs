use super::caption::{representative_captions, Caption};
use super::image::Image;
use super::pagination::{PageNumber, PageWindow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub image: Image,
    /// Representative caption, if the image has a valid one.
    pub caption: Option<Caption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPage {
    pub items: Vec<GalleryItem>,
    pub page: u32,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub category_id: Option<uuid::Uuid>,
}

impl GalleryPage {
    /// Pairs an already ordered page of images with their captions.
    pub fn assemble(
        images: Vec<Image>,
        captions: Vec<Caption>,
        page: PageNumber,
        window: PageWindow,
        total_images: u64,
        category_id: Option<uuid::Uuid>,
    ) -> Self {
        let mut representatives = representative_captions(captions);
        let total_pages = window.total_pages(total_images);
        let items = images
            .into_iter()
            .map(|image| {
                let caption = representatives.remove(&image.id);
                GalleryItem { image, caption }
            })
            .collect();

        Self {
            items,
            page: page.get(),
            total_pages,
            has_prev: page.get() > 1,
            has_next: u64::from(page.get()) < total_pages,
            category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_assemble_attaches_representative_captions() {
        let a = Image::new(Uuid::from_u128(1), "https://a".to_string(), None);
        let b = Image::new(Uuid::from_u128(2), "https://b".to_string(), None);
        let captions = vec![
            Caption::new(Uuid::from_u128(10), a.id, Some("next".to_string())),
            Caption::new(Uuid::from_u128(11), a.id, Some(" hello ".to_string())),
        ];
        let page = PageNumber::new(2);
        let gallery = GalleryPage::assemble(vec![a, b], captions, page, page.window(2), 5, None);

        assert_eq!(gallery.items.len(), 2);
        let first = gallery.items[0].caption.as_ref().unwrap();
        assert_eq!(first.id, Uuid::from_u128(11));
        assert_eq!(first.content.as_deref(), Some("hello"));
        assert!(gallery.items[1].caption.is_none());
        assert_eq!(gallery.total_pages, 3);
        assert!(gallery.has_prev);
        assert!(gallery.has_next);
    }

    #[test]
    fn test_empty_gallery_has_one_page() {
        let page = PageNumber::FIRST;
        let gallery = GalleryPage::assemble(Vec::new(), Vec::new(), page, page.window(12), 0, None);
        assert_eq!(gallery.total_pages, 1);
        assert!(!gallery.has_next);
        assert!(!gallery.has_prev);
    }
}
