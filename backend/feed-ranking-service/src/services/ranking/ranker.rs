use super::{RankingError, Result};
use crate::models::ScoredCandidate;
use std::cmp::Ordering;

/// Sort by score descending.
///
/// Equal scores fall back to newest first, then ascending id, so repeated
/// calls over the same input always produce the same order.
pub fn sort_scored(scored: &mut [ScoredCandidate]) {
    scored.sort_by(compare_ranked);
}

fn compare_ranked(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.candidate.created_at.cmp(&a.candidate.created_at))
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

/// A validated zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Rejects `size <= 0` and `page < 0`; never substitutes defaults.
    pub fn new(page: i64, size: i64) -> Result<Self> {
        if size <= 0 {
            return Err(RankingError::InvalidArgument(format!(
                "page size must be positive, got {}",
                size
            )));
        }
        if page < 0 {
            return Err(RankingError::InvalidArgument(format!(
                "page must not be negative, got {}",
                page
            )));
        }

        let page = usize::try_from(page).map_err(|_| {
            RankingError::InvalidArgument(format!("page {} is out of range", page))
        })?;
        let size = usize::try_from(size).map_err(|_| {
            RankingError::InvalidArgument(format!("page size {} is out of range", size))
        })?;

        Ok(Self { page, size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Elements `[page * size, page * size + size)`, clipped to `items`.
    /// A page past the end is empty.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset();
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.size).min(items.len());
        &items[start..end]
    }
}
