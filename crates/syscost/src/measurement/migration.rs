//! Thread migration trial.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use syscost_core::Measurement;
use tracing::{debug, warn};

use super::affinity::{set_thread_affinity, AffinityError, NativeThread};
use super::clock::{black_box, Stopwatch};
use super::error::SampleError;
use super::workload::{busy_loop, BUSY_LOOP_STEPS};

/// CPUs the worker alternates between.
const MIGRATION_CPUS: [usize; 2] = [0, 1];

/// Set once the first rejected migration has been logged at `warn` level.
static REJECTION_WARNED: AtomicBool = AtomicBool::new(false);

/// Time `iterations` affinity changes applied to a running worker.
///
/// The worker busy-loops until told to stop. Once it has reported its
/// handle it is pinned to CPU 0 (untimed), then the timed loop moves it to
/// CPU `i % 2` on iteration `i`. Rejected changes do not fail the trial;
/// they are counted and logged once the timing is done.
pub fn thread_migration(iterations: usize) -> Result<Measurement, SampleError> {
    migration_trial(iterations, MIGRATION_CPUS, &REJECTION_WARNED)
}

/// Outcome of one timed migration loop.
#[derive(Debug)]
struct MigrationTiming {
    elapsed_ns: f64,
    rejected: usize,
    last_error: Option<AffinityError>,
}

fn migration_trial(
    iterations: usize,
    cpus: [usize; 2],
    warned: &AtomicBool,
) -> Result<Measurement, SampleError> {
    let stop = AtomicBool::new(false);
    let (handle_tx, handle_rx) = mpsc::channel();

    thread::scope(|scope| -> Result<Measurement, SampleError> {
        let stop_flag = &stop;
        let worker = thread::Builder::new()
            .name("migration-worker".into())
            .spawn_scoped(scope, move || {
                let _ = handle_tx.send(NativeThread::current());
                let mut total = 0u64;
                while !stop_flag.load(Ordering::Relaxed) {
                    total = total.wrapping_add(busy_loop(BUSY_LOOP_STEPS));
                }
                black_box(total);
            })
            .map_err(SampleError::Spawn)?;

        // The scope joins the worker on exit, so it must be told to stop on
        // every path out of here.
        let stopper = StopOnDrop(stop_flag);

        let target = match handle_rx.recv() {
            Ok(target) => target,
            Err(_) => {
                // The worker died before reporting in; join it here so the
                // scope does not re-raise its panic.
                drop(stopper);
                let _ = worker.join();
                return Err(SampleError::WorkerPanicked);
            }
        };

        if let Err(e) = set_thread_affinity(target, cpus[0]) {
            debug!(error = %e, cpu = cpus[0], "Could not pin migration worker");
        }

        let timing = migrate(target, cpus, iterations);

        drop(stopper);
        worker.join().map_err(|_| SampleError::WorkerPanicked)?;

        if let Some(e) = &timing.last_error {
            log_rejections(timing.rejected, iterations, e, warned);
        }

        Ok(Measurement::new(timing.elapsed_ns, iterations as u64))
    })
}

/// The timed loop: move `target` to `cpus[i % 2]` on iteration `i`.
fn migrate(target: NativeThread, cpus: [usize; 2], iterations: usize) -> MigrationTiming {
    let mut rejected = 0usize;
    let mut last_error = None;

    let stopwatch = Stopwatch::start();
    for i in 0..iterations {
        if let Err(e) = set_thread_affinity(target, cpus[i % 2]) {
            rejected += 1;
            last_error = Some(e);
        }
    }
    let elapsed_ns = stopwatch.elapsed_ns();

    MigrationTiming {
        elapsed_ns,
        rejected,
        last_error,
    }
}

/// Warn about the first trial with rejected changes, then drop to `debug`.
///
/// Returns whether this call logged at `warn` level.
fn log_rejections(
    rejected: usize,
    iterations: usize,
    error: &AffinityError,
    warned: &AtomicBool,
) -> bool {
    if warned.swap(true, Ordering::Relaxed) {
        debug!(rejected, iterations, error = %error, "CPU affinity changes were rejected");
        false
    } else {
        warn!(
            rejected,
            iterations,
            error = %error,
            "CPU affinity changes were rejected; keeping the samples, further rejections are logged at debug level"
        );
        true
    }
}

/// Sets the flag when dropped.
struct StopOnDrop<'a>(&'a AtomicBool);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}
