//! Fixed-cost synthetic workload run by worker threads.

use super::clock::black_box;

/// Steps of the busy loop executed by spawned and migrated workers.
pub const BUSY_LOOP_STEPS: u64 = 1000;

/// Run a bounded arithmetic loop and return its sum.
///
/// Every step goes through `black_box`, so the loop survives optimization
/// and costs the same in every build.
#[inline(never)]
pub fn busy_loop(steps: u64) -> u64 {
    let mut sum = 0u64;
    for i in 0..steps {
        sum = black_box(sum.wrapping_add(i));
    }
    sum
}
