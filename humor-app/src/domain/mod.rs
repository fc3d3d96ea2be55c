mod caption;
mod category;
mod feed;
mod gallery;
mod image;
mod pagination;
mod viewer;
mod vote;

pub use caption::{representative_captions, Caption, PLACEHOLDER_CAPTION};
pub use category::Category;
pub use feed::{build_feed, Feed, FeedItem, FeedPage};
pub use gallery::{GalleryItem, GalleryPage};
pub use image::{sort_newest_first, Image};
pub use pagination::{PageNumber, PageWindow};
pub use viewer::Viewer;
pub use vote::{CaptionVote, VoteDirection, VoteKey};
