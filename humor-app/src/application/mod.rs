mod gallery;
mod ports;
mod record_vote;
mod voting_feed;

pub use gallery::{Gallery, DEFAULT_GALLERY_PAGE_SIZE};
pub use ports::{CatalogStore, IdentityVerifier, InsertOutcome, StoreError, VoteStore};
pub use record_vote::VoteRecorder;
pub use voting_feed::{VotingFeed, VotingPage, VOTING_PAGE_SIZE};
