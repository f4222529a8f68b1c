//! Error types for a single timed trial.

use std::fmt;
use std::io;

/// Error returned when a trial cannot produce a sample.
///
/// All variants are fatal to the run. A benchmark that silently dropped a
/// failed trial would bias the statistics of its configuration, so there is
/// no retry path.
#[derive(Debug)]
pub enum SampleError {
    /// A heap allocation made while setting up or running the trial failed.
    Allocation {
        /// Size of the allocation that failed.
        bytes: usize,
    },

    /// A worker thread could not be spawned.
    Spawn(io::Error),

    /// A worker thread panicked before it finished.
    WorkerPanicked,

    /// The requested stack buffer is larger than the biggest supported bucket.
    StackCapacity {
        /// Requested element count.
        requested: usize,
        /// Largest supported element count.
        capacity: usize,
    },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { bytes } => write!(f, "failed to allocate {} bytes", bytes),
            Self::Spawn(e) => write!(f, "failed to spawn worker thread: {}", e),
            Self::WorkerPanicked => write!(f, "worker thread panicked"),
            Self::StackCapacity {
                requested,
                capacity,
            } => write!(
                f,
                "stack buffer of {} elements exceeds the supported maximum of {}",
                requested, capacity
            ),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
