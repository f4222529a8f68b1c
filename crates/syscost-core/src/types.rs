//! Operation kinds, configurations and raw measurements.

use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the seven measured micro-operations.
///
/// The declaration order is the order in which a full run measures them and
/// the order of the combined report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Sequential read of a buffer living on a call stack.
    StaticAccess,
    /// Sequential read of a heap buffer.
    DynamicAccess,
    /// Allocation of many single-element heap objects.
    Allocation,
    /// Deallocation of many single-element heap objects.
    Deallocation,
    /// Spawn and join of a short-lived worker thread.
    ThreadCreation,
    /// Mutex/condvar hand-off between two worker threads.
    ContextSwitch,
    /// CPU affinity changes applied to a running worker thread.
    ThreadMigration,
}

/// What the configuration parameter of an operation counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Element count of the buffer or number of heap objects.
    ArraySize,
    /// Repetitions of the timed thread operation.
    Iterations,
}

impl Operation {
    /// All operations in run order.
    pub const ALL: [Operation; 7] = [
        Operation::StaticAccess,
        Operation::DynamicAccess,
        Operation::Allocation,
        Operation::Deallocation,
        Operation::ThreadCreation,
        Operation::ContextSwitch,
        Operation::ThreadMigration,
    ];

    /// The `process_measured` tag shared with the other implementations.
    pub fn process_name(&self) -> &'static str {
        match self {
            Operation::StaticAccess => "Static Memory Access",
            Operation::DynamicAccess => "Dynamic Memory Access",
            Operation::Allocation => "Memory Allocation",
            Operation::Deallocation => "Memory Deallocation",
            Operation::ThreadCreation => "Thread Creation",
            Operation::ContextSwitch => "Context Switch",
            Operation::ThreadMigration => "Thread Migration",
        }
    }

    /// File-name stem used for the per-operation result file.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Operation::StaticAccess => "static_access",
            Operation::DynamicAccess => "dynamic_access",
            Operation::Allocation => "allocation",
            Operation::Deallocation => "deallocation",
            Operation::ThreadCreation => "thread_creation",
            Operation::ContextSwitch => "context_switch",
            Operation::ThreadMigration => "thread_migration",
        }
    }

    /// Which table the configuration parameter is drawn from.
    pub fn parameter_kind(&self) -> ParameterKind {
        match self {
            Operation::StaticAccess
            | Operation::DynamicAccess
            | Operation::Allocation
            | Operation::Deallocation => ParameterKind::ArraySize,
            Operation::ThreadCreation | Operation::ContextSwitch | Operation::ThreadMigration => {
                ParameterKind::Iterations
            }
        }
    }

    /// Numeric benchmark type used by the front ends (1..=7; 0 means "all").
    pub fn benchmark_type(&self) -> u8 {
        match self {
            Operation::StaticAccess => 1,
            Operation::DynamicAccess => 2,
            Operation::Allocation => 3,
            Operation::Deallocation => 4,
            Operation::ThreadCreation => 5,
            Operation::ContextSwitch => 6,
            Operation::ThreadMigration => 7,
        }
    }

    /// Inverse of [`Operation::benchmark_type`]. Returns `None` for 0 and
    /// anything above 7.
    pub fn from_benchmark_type(kind: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.benchmark_type() == kind)
    }

    /// Look up an operation by file stem, process name or short alias.
    ///
    /// Matching ignores ASCII case; `-` and `_` are interchangeable.
    pub fn by_name(name: &str) -> Option<Self> {
        let matches = |candidate: &str| {
            name.len() == candidate.len()
                && name.bytes().zip(candidate.bytes()).all(|(a, b)| {
                    let a = if a == b'-' { b'_' } else { a.to_ascii_lowercase() };
                    let b = if b == b'-' { b'_' } else { b.to_ascii_lowercase() };
                    a == b
                })
        };

        Self::ALL.iter().copied().find(|op| {
            matches(op.file_stem())
                || matches(op.process_name())
                || op.aliases().iter().any(|alias| matches(alias))
        })
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Operation::StaticAccess => &["static", "stack"],
            Operation::DynamicAccess => &["dynamic", "heap"],
            Operation::Allocation => &["alloc"],
            Operation::Deallocation => &["dealloc", "free"],
            Operation::ThreadCreation => &["spawn", "creation"],
            Operation::ContextSwitch => &["switch", "ctx"],
            Operation::ThreadMigration => &["migration", "affinity"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.process_name())
    }
}

/// One unit of measurement work: an operation, its parameter and a trial count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Configuration {
    /// Operation to measure.
    pub operation: Operation,
    /// Array size or iteration count, depending on the operation.
    pub parameter: usize,
    /// Number of trials requested.
    pub trials: usize,
}

impl Configuration {
    /// Create a configuration.
    pub fn new(operation: Operation, parameter: usize, trials: usize) -> Self {
        Self {
            operation,
            parameter,
            trials,
        }
    }

    /// The parameter if it is an array size.
    pub fn array_size(&self) -> Option<usize> {
        match self.operation.parameter_kind() {
            ParameterKind::ArraySize => Some(self.parameter),
            ParameterKind::Iterations => None,
        }
    }

    /// The parameter if it is an iteration count.
    pub fn iterations(&self) -> Option<usize> {
        match self.operation.parameter_kind() {
            ParameterKind::Iterations => Some(self.parameter),
            ParameterKind::ArraySize => None,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.operation.parameter_kind() {
            ParameterKind::ArraySize => "array size",
            ParameterKind::Iterations => "iterations",
        };
        write!(f, "{} ({} {})", self.operation, label, self.parameter)
    }
}

/// Raw output of one timed trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Elapsed time of the timed interval in nanoseconds.
    pub elapsed_ns: f64,
    /// Number of elements, objects, iterations or hand-offs covered by the interval.
    pub units: u64,
}

impl Measurement {
    /// Create a measurement. A zero unit count is stored as 1.
    pub fn new(elapsed_ns: f64, units: u64) -> Self {
        Self {
            elapsed_ns,
            units: units.max(1),
        }
    }

    /// A measurement that already is a single sample value.
    pub fn single(elapsed_ns: f64) -> Self {
        Self::new(elapsed_ns, 1)
    }
}

/// How a [`Measurement`] becomes a sample.
///
/// Per-unit normalization is the default contract; `Total` reports the raw
/// interval for comparison with front ends that do not normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide the elapsed time by the unit count.
    #[default]
    PerUnit,
    /// Report the elapsed time of the whole timed interval.
    Total,
}

impl Normalization {
    /// Turn a measurement into a sample in nanoseconds.
    #[inline]
    pub fn apply(&self, measurement: Measurement) -> f64 {
        match self {
            Normalization::PerUnit => measurement.elapsed_ns / measurement.units.max(1) as f64,
            Normalization::Total => measurement.elapsed_ns,
        }
    }
}
