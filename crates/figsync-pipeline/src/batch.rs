//! Deterministic batch partitioning.

use std::ops::{Range, RangeInclusive};

/// Splits `total` items into 1-based batches of `size`.
///
/// Batch `k` always covers `[(k-1)*size, min(k*size, total))`, so a resumed
/// run sees exactly the same partition as a full one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    size: usize,
    total: usize,
}

/// Errors for invalid batch selections.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BatchRangeError {
    #[error("Batch size must be at least 1")]
    ZeroSize,

    #[error("Batch {0} is out of range (1..={1})")]
    OutOfRange(usize, usize),

    #[error("First batch {0} is after last batch {1}")]
    Inverted(usize, usize),
}

impl BatchPlan {
    /// Create a plan for `total` items.
    pub fn new(size: usize, total: usize) -> Result<Self, BatchRangeError> {
        if size == 0 {
            return Err(BatchRangeError::ZeroSize);
        }
        Ok(Self { size, total })
    }

    /// Number of items per batch.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of batches.
    pub fn total_batches(&self) -> usize {
        self.total.div_ceil(self.size)
    }

    /// Item index range of 1-based batch `k`.
    pub fn range(&self, k: usize) -> Range<usize> {
        let start = (k.saturating_sub(1) * self.size).min(self.total);
        let end = (k * self.size).min(self.total);
        start..end
    }

    /// Validate an optional `[from, to]` selection, defaulting to every batch.
    pub fn select(
        &self,
        from: Option<usize>,
        to: Option<usize>,
    ) -> Result<RangeInclusive<usize>, BatchRangeError> {
        let last = self.total_batches();
        let from = from.unwrap_or(1);
        let to = to.unwrap_or(last).min(last);

        if last == 0 {
            // Nothing to fetch; an empty selection
            return Ok(1..=0);
        }
        if from == 0 || from > last {
            return Err(BatchRangeError::OutOfRange(from, last));
        }
        if to < from {
            return Err(BatchRangeError::Inverted(from, to));
        }

        Ok(from..=to)
    }
}
