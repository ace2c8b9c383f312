//! Memory sampling around a unit of work.
//!
//! Samples are approximate. Threads that are still winding down, or that
//! belong to a previous run, allocate and free concurrently with sampling, so
//! the delta between two samples may be skewed either way, including below
//! zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use parking_lot::Mutex;

/// Live heap bytes before and after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub before: u64,
    pub after: u64,
}

impl MemorySample {
    /// Growth over the run. Negative when more was freed than allocated.
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

pub trait MemorySampler {
    /// Bytes currently in use.
    fn sample(&self) -> u64;

    /// A best-effort hint to settle outstanding frees before sampling. May
    /// pause the caller briefly.
    fn reclaim(&self) {}
}

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Wraps the system allocator, keeping a running count of live heap bytes.
/// Install it in a binary to make [`HeapSampler`] meaningful:
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: TrackingAllocator = TrackingAllocator;
/// ```
pub struct TrackingAllocator;

impl TrackingAllocator {
    pub fn live_bytes() -> usize {
        LIVE_BYTES.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                LIVE_BYTES.fetch_add(new_size - layout.size(), Ordering::Relaxed);
            } else {
                LIVE_BYTES.fetch_sub(layout.size() - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

/// How long [`HeapSampler::reclaim`] yields for.
const RECLAIM_PAUSE: Duration = Duration::from_millis(20);

/// Samples live heap bytes as counted by [`TrackingAllocator`]. Reads zero
/// unless that allocator is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapSampler;

impl MemorySampler for HeapSampler {
    fn sample(&self) -> u64 {
        TrackingAllocator::live_bytes() as u64
    }

    /// Yields so that threads torn down by the previous run get to exit and
    /// hand their memory back.
    fn reclaim(&self) {
        thread::sleep(RECLAIM_PAUSE);
    }
}

/// A deterministic sampler that replays a fixed script of readings, then
/// repeats the last one. Counts the reclaim hints it receives.
#[derive(Debug, Default)]
pub struct ScriptedSampler {
    readings: Mutex<Vec<u64>>,
    reclaims: AtomicU64,
}

impl ScriptedSampler {
    pub fn new(readings: impl IntoIterator<Item = u64>) -> Self {
        let mut readings = readings.into_iter().collect::<Vec<_>>();
        readings.reverse();
        Self {
            readings: Mutex::new(readings),
            reclaims: AtomicU64::default(),
        }
    }

    pub fn reclaims(&self) -> u64 {
        self.reclaims.load(Ordering::Relaxed)
    }
}

impl MemorySampler for ScriptedSampler {
    fn sample(&self) -> u64 {
        let mut readings = self.readings.lock();
        match readings.len() {
            0 => 0,
            1 => readings[0],
            _ => readings.pop().unwrap_or_default(),
        }
    }

    fn reclaim(&self) {
        self.reclaims.fetch_add(1, Ordering::Relaxed);
    }
}

/// The output of a measured closure, alongside what it cost.
#[derive(Debug)]
pub struct Measured<R> {
    pub memory: MemorySample,
    pub elapsed: Duration,
    pub output: R,
}

/// Runs `f`, sampling memory immediately before and after. A reclaim hint is
/// issued first, outside the timed region.
pub fn measure<S, F, R>(sampler: &S, f: F) -> Measured<R>
where
    S: MemorySampler + ?Sized,
    F: FnOnce() -> R,
{
    sampler.reclaim();
    let before = sampler.sample();
    let start = Instant::now();
    let output = f();
    let elapsed = start.elapsed();
    let after = sampler.sample();
    Measured {
        memory: MemorySample { before, after },
        elapsed,
        output,
    }
}

#[cfg(test)]
mod tests;
