//! Batch progress reporting
//!
//! A cloneable poll handle the UI layer can watch while a batch decodes.
//! Advisory only: the phase string is user feedback, not part of the data
//! contract between the loader and the pipeline.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Current phase of a batch item, surfaced to the user as free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// Waiting to be processed
    Queued,
    /// Checking whether the item fits its byte budget
    Compressing,
    /// Rasterizing at the reduced size
    Resizing,
    /// Re-encoding attempt N at reduced quality
    Optimizing(u32),
    /// Decoding into a library-ready texture
    Decoding,
    /// Item resolved successfully
    Done,
    /// Item resolved as a failure
    Failed,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Compressing => write!(f, "compressing"),
            Self::Resizing => write!(f, "resizing"),
            Self::Optimizing(n) => write!(f, "optimizing-attempt-{n}"),
            Self::Decoding => write!(f, "decoding"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Shared handle tracking one load batch
///
/// Clones share state, so the loader can update it while the UI polls.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    phase: Arc<RwLock<BatchPhase>>,
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl BatchProgress {
    /// Create a handle for a batch of `total` items
    pub fn new(total: usize) -> Self {
        Self {
            phase: Arc::new(RwLock::new(BatchPhase::Queued)),
            completed: Arc::new(AtomicUsize::new(0)),
            total,
        }
    }

    /// Most recently reported phase
    pub fn phase(&self) -> BatchPhase {
        *self.phase.read()
    }

    /// Record the current phase
    pub fn set_phase(&self, phase: BatchPhase) {
        *self.phase.write() = phase;
    }

    /// Record one item as resolved (succeeded or failed)
    pub fn mark_resolved(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of items resolved so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of items in the batch
    pub fn total(&self) -> usize {
        self.total
    }

    /// Completion fraction in `[0.0, 1.0]`
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed() as f32 / self.total as f32
        }
    }

    /// Whether every item has resolved
    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels() {
        assert_eq!(BatchPhase::Queued.to_string(), "queued");
        assert_eq!(BatchPhase::Optimizing(3).to_string(), "optimizing-attempt-3");
        assert_eq!(BatchPhase::Done.to_string(), "done");
    }

    #[test]
    fn test_progress_counting() {
        let progress = BatchProgress::new(2);
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_complete());

        progress.mark_resolved();
        assert_eq!(progress.completed(), 1);
        assert_eq!(progress.fraction(), 0.5);

        progress.mark_resolved();
        assert!(progress.is_complete());
    }

    #[test]
    fn test_clones_share_state() {
        let progress = BatchProgress::new(1);
        let watcher = progress.clone();

        progress.set_phase(BatchPhase::Compressing);
        progress.mark_resolved();

        assert_eq!(watcher.phase(), BatchPhase::Compressing);
        assert!(watcher.is_complete());
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let progress = BatchProgress::new(0);
        assert!(progress.is_complete());
        assert_eq!(progress.fraction(), 1.0);
    }
}
