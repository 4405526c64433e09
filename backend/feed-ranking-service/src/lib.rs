pub mod config;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{Config, PipelineConfig, RankingConfig};
pub use services::{
    AffinityAggregator, CandidateSource, FeedError, FeedService, InMemoryContentStore,
    InteractionSource, PageRequest, Scorer, StoreError,
};
