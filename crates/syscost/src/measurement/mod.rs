//! Timed trials of the measured operations.
//!
//! Each trial returns one [`Measurement`](syscost_core::Measurement): the
//! wall-clock duration of its timed interval and the number of units the
//! interval covered.

pub mod affinity;
mod clock;
mod error;
mod memory;
mod migration;
mod sampler;
mod threads;
mod workload;

pub use affinity::{AffinityError, AffinityGuard, AffinityResult, NativeThread};
pub use clock::{black_box, resolution_ns, Stopwatch};
pub use error::SampleError;
pub use memory::{allocation, deallocation, dynamic_access, static_access, MAX_STACK_ELEMENTS};
pub use migration::thread_migration;
pub use sampler::{Sampler, SystemSampler};
pub use threads::{context_switch, thread_creation};
pub use workload::{busy_loop, BUSY_LOOP_STEPS};
