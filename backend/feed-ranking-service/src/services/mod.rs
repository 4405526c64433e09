pub mod feed;
pub mod profile;
pub mod ranking;
pub mod store;

pub use feed::{FeedError, FeedService};
pub use profile::AffinityAggregator;
pub use ranking::{PageRequest, Scorer};
pub use store::{CandidateSource, InMemoryContentStore, InteractionSource, StoreError};
