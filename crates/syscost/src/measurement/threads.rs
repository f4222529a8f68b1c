//! Thread creation and context switch trials.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use syscost_core::Measurement;

use super::clock::Stopwatch;
use super::error::SampleError;
use super::workload::{busy_loop, BUSY_LOOP_STEPS};

/// Time `iterations` spawn-and-join cycles of a busy-looping worker.
pub fn thread_creation(iterations: usize) -> Result<Measurement, SampleError> {
    let stopwatch = Stopwatch::start();
    for _ in 0..iterations {
        let worker = thread::Builder::new()
            .spawn(|| busy_loop(BUSY_LOOP_STEPS))
            .map_err(SampleError::Spawn)?;
        worker.join().map_err(|_| SampleError::WorkerPanicked)?;
    }
    let elapsed = stopwatch.elapsed_ns();

    Ok(Measurement::new(elapsed, iterations as u64))
}

/// Time two workers passing a turn token back and forth.
///
/// Each worker takes `iterations / 2` turns. The interval runs from before
/// the first spawn until both workers are joined, and the sample is
/// normalized by the number of hand-offs actually performed.
pub fn context_switch(iterations: usize) -> Result<Measurement, SampleError> {
    let rounds = iterations / 2;
    let baton = Baton::new();

    let stopwatch = Stopwatch::start();
    thread::scope(|scope| -> Result<(), SampleError> {
        let first = thread::Builder::new()
            .spawn_scoped(scope, || baton.relay(Seat::First, rounds))
            .map_err(SampleError::Spawn)?;

        let second = match thread::Builder::new()
            .spawn_scoped(scope, || baton.relay(Seat::Second, rounds))
        {
            Ok(handle) => handle,
            Err(e) => {
                baton.abandon();
                let _ = first.join();
                return Err(SampleError::Spawn(e));
            }
        };

        let first = first.join();
        let second = second.join();
        if first.is_err() || second.is_err() {
            return Err(SampleError::WorkerPanicked);
        }
        Ok(())
    })?;
    let elapsed = stopwatch.elapsed_ns();

    Ok(Measurement::new(elapsed, baton.handoffs()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seat {
    First,
    Second,
}

impl Seat {
    fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

#[derive(Debug)]
struct BatonState {
    turn: Seat,
    handoffs: u64,
    abandoned: bool,
}

/// Turn token shared by the two context-switch workers.
#[derive(Debug)]
struct Baton {
    state: Mutex<BatonState>,
    turn_changed: Condvar,
}

impl Baton {
    fn new() -> Self {
        Self {
            state: Mutex::new(BatonState {
                turn: Seat::First,
                handoffs: 0,
                abandoned: false,
            }),
            turn_changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BatonState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take `rounds` turns as `seat`, handing the turn over after each one.
    fn relay(&self, seat: Seat, rounds: usize) {
        for _ in 0..rounds {
            let mut state = self.lock();
            while state.turn != seat && !state.abandoned {
                state = self
                    .turn_changed
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            if state.abandoned {
                return;
            }
            state.turn = seat.other();
            state.handoffs += 1;
            self.turn_changed.notify_one();
        }
    }

    /// Release any worker waiting for a partner that will never arrive.
    fn abandon(&self) {
        self.lock().abandoned = true;
        self.turn_changed.notify_all();
    }

    fn handoffs(&self) -> u64 {
        self.lock().handoffs
    }
}
