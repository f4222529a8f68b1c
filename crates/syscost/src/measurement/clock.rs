//! Monotonic wall-clock timing in nanoseconds.
//!
//! Every sampler brackets its timed interval with a [`Stopwatch`], which reads
//! `std::time::Instant` (`CLOCK_MONOTONIC` on Linux). Cycle counters are not
//! used: thread and scheduler operations cross cores, where TSC readings
//! are not comparable, and the results must be in the same unit as the
//! other implementations of the harness.

use std::hint::black_box as std_black_box;
use std::time::Instant;

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Use this on buffers, accumulators and workload results so that the
/// measured work cannot be elided or moved out of the timed interval.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// A started monotonic timer.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start timing now.
    #[inline]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since [`Stopwatch::start`].
    #[inline]
    pub fn elapsed_ns(&self) -> f64 {
        self.start.elapsed().as_nanos() as f64
    }
}

/// Estimate the clock resolution in nanoseconds.
///
/// Takes the smallest non-zero difference between consecutive clock reads.
pub fn resolution_ns() -> f64 {
    let mut min_diff = u128::MAX;

    for _ in 0..1000 {
        let t1 = Instant::now();
        let t2 = Instant::now();
        let diff = t2.duration_since(t1).as_nanos();
        if diff > 0 && diff < min_diff {
            min_diff = diff;
        }
    }

    if min_diff == u128::MAX {
        1.0
    } else {
        min_diff as f64
    }
}
