//! Allocation accounting for the memory diagnoser.
//!
//! Binaries opt in with:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: hashbench::alloc::CountingAllocator = hashbench::alloc::CountingAllocator;
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// System allocator wrapper counting every allocation and the bytes requested.
/// Frees are not subtracted: the figures are totals allocated, not live memory.
pub struct CountingAllocator;

impl CountingAllocator {
    #[inline]
    fn record(size: usize) {
        ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        INSTALLED.store(true, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            Self::record(new_size);
        }
        new_ptr
    }
}

/// Whether any allocation has gone through `CountingAllocator`.
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocSnapshot {
    pub bytes: u64,
    pub count: u64,
}

impl AllocSnapshot {
    pub fn now() -> Self {
        Self {
            bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
            count: ALLOCATIONS.load(Ordering::Relaxed),
        }
    }

    /// Totals allocated between `earlier` and `self`.
    pub fn since(&self, earlier: &AllocSnapshot) -> AllocSnapshot {
        AllocSnapshot {
            bytes: self.bytes.saturating_sub(earlier.bytes),
            count: self.count.saturating_sub(earlier.count),
        }
    }
}

/// Run `op` `iterations` times and return the mean allocation per run,
/// or `None` when the counting allocator is not installed.
pub fn measure<F>(iterations: u32, mut op: F) -> Option<AllocSnapshot>
where
    F: FnMut(),
{
    if iterations == 0 {
        return None;
    }
    let start = AllocSnapshot::now();
    for _ in 0..iterations {
        op();
    }
    if !is_installed() {
        return None;
    }
    let total = AllocSnapshot::now().since(&start);
    Some(AllocSnapshot {
        bytes: total.bytes / u64::from(iterations),
        count: total.count / u64::from(iterations),
    })
}

/// Human-readable byte count, binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
