use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

/// Shared snapshot generation counter.
///
/// Every clone of the root database shares one `Generation`. The host advances it
/// *before* applying an edit, so readers holding an older `SnapshotToken` can notice
/// the change between pipeline stages and give up without emitting anything.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current generation number.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Moves to the next generation and returns it.
    pub fn advance(&self) -> u64 {
        let next = self.0.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("snapshot generation advanced to {next}");
        next
    }

    /// Records the current generation for later staleness checks.
    pub fn token(&self) -> SnapshotToken {
        SnapshotToken {
            generation: self.clone(),
            observed: self.current(),
        }
    }
}

/// The generation observed when a snapshot was taken.
#[derive(Debug, Clone)]
pub struct SnapshotToken {
    generation: Generation,
    observed: u64,
}

impl SnapshotToken {
    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn is_stale(&self) -> bool {
        self.generation.current() != self.observed
    }

    /// Fails with [`Stale`] once the shared generation moved past the observed one.
    pub fn check(&self) -> Result<(), Stale> {
        let current = self.generation.current();
        if current == self.observed {
            Ok(())
        } else {
            Err(Stale {
                observed: self.observed,
                current,
            })
        }
    }
}

/// The document changed while a snapshot was in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
#[error("snapshot generation {observed} is stale (current generation is {current})")]
#[diagnostic(
    code("SOURCE-STALE"),
    help("The document changed during the computation; run the assist again")
)]
pub struct Stale {
    pub observed: u64,
    pub current: u64,
}
