//! The seam between the runner and the timed trials.

use syscost_core::{Measurement, Operation};

use super::error::SampleError;
use super::{memory, migration, threads};

/// Runs one timed trial of an operation.
///
/// The runner only sees this trait, so tests can drive it with synthetic
/// timings. Any `FnMut(Operation, usize) -> Result<Measurement, SampleError>`
/// closure is a sampler.
pub trait Sampler {
    /// Run one trial of `operation` with the given array size or iteration
    /// count.
    fn sample(&mut self, operation: Operation, parameter: usize)
        -> Result<Measurement, SampleError>;
}

impl<F> Sampler for F
where
    F: FnMut(Operation, usize) -> Result<Measurement, SampleError>,
{
    fn sample(
        &mut self,
        operation: Operation,
        parameter: usize,
    ) -> Result<Measurement, SampleError> {
        self(operation, parameter)
    }
}

/// Sampler that runs the real trials on this machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSampler;

impl Sampler for SystemSampler {
    fn sample(
        &mut self,
        operation: Operation,
        parameter: usize,
    ) -> Result<Measurement, SampleError> {
        match operation {
            Operation::StaticAccess => memory::static_access(parameter),
            Operation::DynamicAccess => memory::dynamic_access(parameter),
            Operation::Allocation => memory::allocation(parameter),
            Operation::Deallocation => memory::deallocation(parameter),
            Operation::ThreadCreation => threads::thread_creation(parameter),
            Operation::ContextSwitch => threads::context_switch(parameter),
            Operation::ThreadMigration => migration::thread_migration(parameter),
        }
    }
}
