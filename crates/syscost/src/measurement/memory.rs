//! Memory access, allocation and deallocation trials.
//!
//! All four trials work on `i32` elements. Setup and teardown (filling the
//! buffer, freeing what the trial allocated) happen outside the timed
//! interval.

use std::alloc::{alloc, dealloc, Layout};
use std::mem::size_of;
use std::ptr::NonNull;
use std::thread;

use syscost_core::Measurement;

use super::clock::{black_box, Stopwatch};
use super::error::SampleError;

/// Largest element count the static access trial supports.
pub const MAX_STACK_ELEMENTS: usize = 1 << 24;

/// Extra stack for the host thread on top of the buffer itself.
const STACK_HEADROOM: usize = 256 * 1024;

/// Time a sequential read of `size` elements held on a call stack.
///
/// The buffer lives in the frame of a dedicated host thread whose stack is
/// sized for the smallest capacity bucket that fits `size`. Spawning and
/// joining the host is not timed.
pub fn static_access(size: usize) -> Result<Measurement, SampleError> {
    match size {
        0..=1_024 => on_stack::<1_024>(size),
        1_025..=16_384 => on_stack::<16_384>(size),
        16_385..=131_072 => on_stack::<131_072>(size),
        131_073..=1_048_576 => on_stack::<1_048_576>(size),
        1_048_577..=MAX_STACK_ELEMENTS => on_stack::<MAX_STACK_ELEMENTS>(size),
        _ => Err(SampleError::StackCapacity {
            requested: size,
            capacity: MAX_STACK_ELEMENTS,
        }),
    }
}

fn on_stack<const N: usize>(size: usize) -> Result<Measurement, SampleError> {
    let stack_bytes = 2 * N * size_of::<i32>() + STACK_HEADROOM;
    let host = thread::Builder::new()
        .name("static-access".into())
        .stack_size(stack_bytes)
        .spawn(move || read_stack_buffer::<N>(size))
        .map_err(SampleError::Spawn)?;
    host.join().map_err(|_| SampleError::WorkerPanicked)
}

#[inline(never)]
fn read_stack_buffer<const N: usize>(size: usize) -> Measurement {
    let mut buffer = [0i32; N];
    fill_with_indices(&mut buffer[..size]);
    let live = black_box(&buffer[..size]);

    let stopwatch = Stopwatch::start();
    black_box(sum_elements(live));
    let elapsed = stopwatch.elapsed_ns();

    Measurement::new(elapsed, size as u64)
}

/// Time a sequential read of `size` elements held in a heap buffer.
pub fn dynamic_access(size: usize) -> Result<Measurement, SampleError> {
    let mut buffer: Vec<i32> = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| SampleError::Allocation {
            bytes: size.saturating_mul(size_of::<i32>()),
        })?;
    buffer.resize(size, 0);
    fill_with_indices(&mut buffer);
    let live = black_box(buffer.as_slice());

    let stopwatch = Stopwatch::start();
    black_box(sum_elements(live));
    let elapsed = stopwatch.elapsed_ns();

    drop(buffer);
    Ok(Measurement::new(elapsed, size as u64))
}

/// Time `size` individual single-`i32` heap allocations.
pub fn allocation(size: usize) -> Result<Measurement, SampleError> {
    let mut objects = HeapObjects::with_capacity(size)?;

    let stopwatch = Stopwatch::start();
    for i in 0..size {
        objects.allocate(i as i32)?;
    }
    let elapsed = stopwatch.elapsed_ns();

    drop(objects);
    Ok(Measurement::new(elapsed, size as u64))
}

/// Time freeing `size` individually allocated single-`i32` heap objects.
pub fn deallocation(size: usize) -> Result<Measurement, SampleError> {
    let mut objects = HeapObjects::with_capacity(size)?;
    for i in 0..size {
        objects.allocate(i as i32)?;
    }

    let stopwatch = Stopwatch::start();
    objects.release();
    let elapsed = stopwatch.elapsed_ns();

    Ok(Measurement::new(elapsed, size as u64))
}

fn fill_with_indices(buffer: &mut [i32]) {
    for (i, slot) in buffer.iter_mut().enumerate() {
        *slot = i as i32;
    }
}

#[inline(always)]
fn sum_elements(buffer: &[i32]) -> i32 {
    buffer.iter().fold(0i32, |acc, &x| acc.wrapping_add(x))
}

/// Individually allocated `i32` objects, freed on drop.
struct HeapObjects {
    slots: Vec<NonNull<i32>>,
}

impl HeapObjects {
    const LAYOUT: Layout = Layout::new::<i32>();

    /// Reserve room for `count` pointers. Nothing is allocated yet.
    fn with_capacity(count: usize) -> Result<Self, SampleError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(count)
            .map_err(|_| SampleError::Allocation {
                bytes: count.saturating_mul(size_of::<NonNull<i32>>()),
            })?;
        Ok(Self { slots })
    }

    #[inline]
    fn allocate(&mut self, value: i32) -> Result<(), SampleError> {
        // SAFETY: the layout has non-zero size.
        let raw = unsafe { alloc(Self::LAYOUT) } as *mut i32;
        let ptr = NonNull::new(raw).ok_or(SampleError::Allocation {
            bytes: Self::LAYOUT.size(),
        })?;
        // SAFETY: freshly allocated, properly aligned for i32.
        unsafe { ptr.as_ptr().write(value) };
        self.slots.push(ptr);
        Ok(())
    }

    fn release(&mut self) {
        for ptr in self.slots.drain(..) {
            // SAFETY: every slot came from `alloc` with the same layout and
            // is freed exactly once because `drain` removes it.
            unsafe { dealloc(ptr.as_ptr() as *mut u8, Self::LAYOUT) };
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for HeapObjects {
    fn drop(&mut self) {
        self.release();
    }
}
