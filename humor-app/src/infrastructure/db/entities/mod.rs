pub mod caption;
pub mod caption_vote;
pub mod category;
pub mod image;
pub mod image_category;

pub use caption::Entity as Caption;
pub use caption_vote::Entity as CaptionVote;
pub use category::Entity as Category;
pub use image::Entity as Image;
pub use image_category::Entity as ImageCategory;
