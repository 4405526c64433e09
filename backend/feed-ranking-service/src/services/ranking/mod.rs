/// Ranking Module
///
/// Deterministic scoring and ordering of feed candidates.
///
/// # Architecture
/// - **Scorer**: engagement x recency decay x personalization boost
/// - **Ranker**: stable score-descending order with explicit tie-breaks
/// - **Paginator**: validated page/size slicing of the ranked sequence
///
/// # Workflow
/// 1. Score every candidate against the requester's affinity profile
/// 2. Sort by score (ties: newest first, then id)
/// 3. Slice out the requested page
pub mod ranker;
pub mod scorer;

pub use ranker::{sort_scored, PageRequest};
pub use scorer::Scorer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, RankingError>;
