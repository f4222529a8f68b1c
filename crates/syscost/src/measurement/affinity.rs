//! CPU affinity control.
//!
//! Two uses: the thread-migration trial moves a running worker between CPUs
//! with [`set_thread_affinity`], and the runner can pin itself to its current
//! CPU for a whole run through the RAII [`AffinityGuard`].
//!
//! # Platform Behavior
//!
//! - **Linux**: `pthread_setaffinity_np` for other threads, `sched_setaffinity`
//!   for the calling thread. No special privileges are required, but cgroup
//!   cpusets may reject CPUs outside the allowed set.
//! - **Other platforms**: affinity changes return [`AffinityError::Unsupported`]
//!   and pinning reports [`AffinityResult::NotPinned`].

use std::fmt;
use std::io;

/// Error returned when an affinity change is not applied.
#[derive(Debug)]
pub enum AffinityError {
    /// The platform has no thread affinity interface.
    Unsupported,
    /// The CPU index does not fit in a CPU set.
    InvalidCpu(usize),
    /// The kernel rejected the change.
    Rejected {
        /// Target CPU.
        cpu: usize,
        /// OS error.
        source: io::Error,
    },
}

impl fmt::Display for AffinityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "thread affinity is not supported on this platform"),
            Self::InvalidCpu(cpu) => write!(f, "CPU index {} is out of range", cpu),
            Self::Rejected { cpu, source } => {
                write!(f, "setting affinity to CPU {} failed: {}", cpu, source)
            }
        }
    }
}

impl std::error::Error for AffinityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// OS handle of a live thread, as seen by the affinity interface.
///
/// Obtained by the thread itself through [`NativeThread::current`] and handed
/// to whoever changes its affinity. The handle is only meaningful while the
/// thread is running.
#[derive(Debug, Clone, Copy)]
pub struct NativeThread {
    #[cfg(target_os = "linux")]
    raw: libc::pthread_t,
}

impl NativeThread {
    /// Handle of the calling thread.
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        {
            // SAFETY: pthread_self has no preconditions.
            Self {
                raw: unsafe { libc::pthread_self() },
            }
        }

        #[cfg(not(target_os = "linux"))]
        {
            Self {}
        }
    }
}

/// Restrict `thread` to the single CPU `cpu`.
#[cfg(target_os = "linux")]
pub fn set_thread_affinity(thread: NativeThread, cpu: usize) -> Result<(), AffinityError> {
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(AffinityError::InvalidCpu(cpu));
    }

    // SAFETY: the mask is a plain bit set, zero is a valid value, and `cpu`
    // is within CPU_SETSIZE. The caller keeps `thread` alive for the call.
    let rc = unsafe {
        let mut mask: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut mask);
        libc::CPU_SET(cpu, &mut mask);
        libc::pthread_setaffinity_np(thread.raw, std::mem::size_of::<libc::cpu_set_t>(), &mask)
    };

    // pthread functions return the error number instead of setting errno.
    if rc != 0 {
        return Err(AffinityError::Rejected {
            cpu,
            source: io::Error::from_raw_os_error(rc),
        });
    }
    Ok(())
}

/// Restrict `thread` to the single CPU `cpu`.
#[cfg(not(target_os = "linux"))]
pub fn set_thread_affinity(_thread: NativeThread, _cpu: usize) -> Result<(), AffinityError> {
    Err(AffinityError::Unsupported)
}

/// Number of CPUs this process may run on, or 1 if unknown.
pub fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Result of attempting to pin the runner thread.
#[derive(Debug)]
pub enum AffinityResult {
    /// Pinned to the current CPU; keep the guard alive for the run.
    Pinned(AffinityGuard),
    /// Could not pin; the run continues unpinned.
    NotPinned {
        /// Human-readable explanation of why pinning was not possible.
        reason: String,
    },
}

/// RAII guard that restores the original CPU affinity when dropped.
pub struct AffinityGuard {
    #[cfg(target_os = "linux")]
    original_mask: libc::cpu_set_t,
    pinned_cpu: usize,
}

impl AffinityGuard {
    /// Try to pin the calling thread to the CPU it is running on.
    pub fn try_pin() -> AffinityResult {
        #[cfg(target_os = "linux")]
        {
            Self::try_pin_linux()
        }

        #[cfg(not(target_os = "linux"))]
        {
            AffinityResult::NotPinned {
                reason: AffinityError::Unsupported.to_string(),
            }
        }
    }

    /// The CPU the thread is pinned to.
    pub fn cpu(&self) -> usize {
        self.pinned_cpu
    }

    #[cfg(target_os = "linux")]
    fn try_pin_linux() -> AffinityResult {
        use std::mem::MaybeUninit;

        unsafe {
            let mut original_mask = MaybeUninit::<libc::cpu_set_t>::uninit();
            let result = libc::sched_getaffinity(
                0,
                std::mem::size_of::<libc::cpu_set_t>(),
                original_mask.as_mut_ptr(),
            );
            if result != 0 {
                return AffinityResult::NotPinned {
                    reason: format!("sched_getaffinity failed: {}", io::Error::last_os_error()),
                };
            }
            let original_mask = original_mask.assume_init();

            let current_cpu = libc::sched_getcpu();
            if current_cpu < 0 {
                return AffinityResult::NotPinned {
                    reason: format!("sched_getcpu failed: {}", io::Error::last_os_error()),
                };
            }

            let mut new_mask: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut new_mask);
            libc::CPU_SET(current_cpu as usize, &mut new_mask);

            let result =
                libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &new_mask);
            if result != 0 {
                return AffinityResult::NotPinned {
                    reason: format!("sched_setaffinity failed: {}", io::Error::last_os_error()),
                };
            }

            tracing::debug!(cpu = current_cpu, "Pinned runner thread");

            AffinityResult::Pinned(AffinityGuard {
                original_mask,
                pinned_cpu: current_cpu as usize,
            })
        }
    }
}

#[cfg(target_os = "linux")]
impl Drop for AffinityGuard {
    fn drop(&mut self) {
        // SAFETY: restores a mask previously returned by sched_getaffinity.
        let result = unsafe {
            libc::sched_setaffinity(
                0,
                std::mem::size_of::<libc::cpu_set_t>(),
                &self.original_mask,
            )
        };

        if result != 0 {
            tracing::warn!(
                "Failed to restore CPU affinity: {}",
                io::Error::last_os_error()
            );
        } else {
            tracing::debug!("Restored original CPU affinity");
        }
    }
}

impl fmt::Debug for AffinityGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffinityGuard")
            .field("pinned_cpu", &self.pinned_cpu)
            .finish()
    }
}
